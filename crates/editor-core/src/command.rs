//! JSON command protocol for scripted hosts and tests.

use serde::{Deserialize, Serialize};

use crate::backend::GraphicsBackend;
use crate::editor::Editor;
use crate::error::{EditorError, EditorResult};

/// A command the editor can execute
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Spawn a shape by kind name
    AddShape { kind: String },
    /// Click at a viewport pixel
    Click { x: f32, y: f32 },
    /// Press a key
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
    },
    Resize { width: f32, height: f32 },
    /// Select an object by ID
    Select { id: String },
    ClearSelection,
    /// Delete the selected object
    Delete,
    /// Duplicate the selected object
    Duplicate,
    SetMode { mode: String },
    /// Inspect the scene: list all objects and the selection
    Inspect,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(e: EditorError) -> Self {
        Self {
            success: false,
            error: Some(e.to_string()),
            data: None,
        }
    }
}

impl<T: Into<serde_json::Value>> From<EditorResult<T>> for CommandResponse {
    fn from(result: EditorResult<T>) -> Self {
        match result {
            Ok(value) => Self::ok_with_data(value.into()),
            Err(e) => Self::err(e),
        }
    }
}

/// Execute a single command on the editor.
pub fn execute_command<B: GraphicsBackend>(editor: &mut Editor<B>, cmd: EditorCommand) -> CommandResponse {
    match cmd {
        EditorCommand::AddShape { kind } => editor
            .add_shape_named(&kind)
            .map(|id| serde_json::json!({ "id": id }))
            .into(),

        EditorCommand::Click { x, y } => {
            let selected = editor.click(x, y);
            CommandResponse::ok_with_data(serde_json::json!({ "selected": selected }))
        }

        EditorCommand::Key { key, ctrl } => editor
            .key_down(&key, ctrl)
            .map(|action| serde_json::json!({ "handled": action.is_some() }))
            .into(),

        EditorCommand::Resize { width, height } => match editor.resize(width, height) {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::err(e),
        },

        EditorCommand::Select { id } => {
            let selected = editor.select(&id);
            CommandResponse::ok_with_data(serde_json::json!({ "selected": selected }))
        }

        EditorCommand::ClearSelection => {
            editor.clear_selection();
            CommandResponse::ok()
        }

        EditorCommand::Delete => {
            let removed = editor.delete_selected().map(|o| o.id);
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        EditorCommand::Duplicate => {
            let id = editor.duplicate_selected();
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        EditorCommand::SetMode { mode } => match editor.set_mode_named(&mode) {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::err(e),
        },

        EditorCommand::Inspect => CommandResponse::ok_with_data(inspect(editor)),
    }
}

/// Scene summary: objects, selection and mode
pub fn inspect<B: GraphicsBackend>(editor: &Editor<B>) -> serde_json::Value {
    let objects: Vec<serde_json::Value> = editor
        .store()
        .objects()
        .iter()
        .map(|o| {
            serde_json::json!({
                "id": o.id,
                "name": o.name,
                "kind": o.kind,
                "position": o.transform.position,
                "rotation": o.transform.rotation,
                "scale": o.transform.scale,
                "color": format!("#{:06x}", o.color.to_hex()),
                "selectable": o.selectable,
            })
        })
        .collect();
    serde_json::json!({
        "object_count": objects.len(),
        "objects": objects,
        "selected": editor.selected(),
        "mode": editor.mode(),
    })
}

/// Parse and execute a single JSON command string.
pub fn execute_json<B: GraphicsBackend>(editor: &mut Editor<B>, json: &str) -> EditorResult<CommandResponse> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| EditorError::InvalidCommand(e.to_string()))?;
    Ok(execute_command(editor, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch<B: GraphicsBackend>(
    editor: &mut Editor<B>,
    json: &str,
) -> EditorResult<Vec<CommandResponse>> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| EditorError::InvalidCommand(e.to_string()))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(editor, cmd))
        .collect())
}
