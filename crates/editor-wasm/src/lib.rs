//! Browser bindings for the scene editor.
//!
//! The host page owns the canvas and forwards pointer, keyboard and resize
//! events; `frame()` hands back everything needed to draw the next frame.

use editor_core::command::execute_json;
use editor_core::render_driver::FrameInfo;
use editor_core::{Editor, EditorSettings, GraphicsBackend};
use serde::Serialize;
use shared::{ShapeKind, TransformMode};
use wasm_bindgen::prelude::*;

/// Initialize WASM module with panic hook and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("Scene editor WASM module initialized");
}

/// Serialize to plain objects (no JS `Map`s), matching the JSON shape
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// One object as the host should draw it
#[derive(Debug, Serialize)]
pub struct ObjectView {
    pub id: String,
    pub kind: ShapeKind,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    /// `#rrggbb`
    pub color: String,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct GizmoView {
    pub target: String,
    pub mode: TransformMode,
}

/// Everything the host needs to draw one frame
#[derive(Debug, Serialize)]
pub struct FrameDescription {
    #[serde(flatten)]
    pub info: FrameInfo,
    pub mode: TransformMode,
    pub objects: Vec<ObjectView>,
    pub gizmo: Option<GizmoView>,
}

pub fn describe_frame<B: GraphicsBackend>(editor: &Editor<B>, info: FrameInfo) -> FrameDescription {
    let selected = editor.selected();
    let objects = editor
        .store()
        .objects()
        .iter()
        .map(|o| ObjectView {
            id: o.id.clone(),
            kind: o.kind,
            position: o.transform.position,
            rotation: o.transform.rotation,
            scale: o.transform.scale,
            color: format!("#{:06x}", o.color.to_hex()),
            selected: selected == Some(&o.id),
        })
        .collect();
    let gizmo = editor.backend().gizmo_target().map(|target| GizmoView {
        target: target.to_string(),
        mode: editor.backend().gizmo().mode,
    });

    FrameDescription {
        info,
        mode: editor.mode(),
        objects,
        gizmo,
    }
}

/// Editor handle exported to JavaScript
#[wasm_bindgen]
pub struct WebEditor {
    editor: Editor,
}

impl Default for WebEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WebEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            editor: Editor::new(),
        }
    }

    /// Build an editor from a settings JSON document
    #[wasm_bindgen(js_name = withSettings)]
    pub fn with_settings(settings_json: &str) -> Result<WebEditor, JsError> {
        let settings = EditorSettings::from_json(settings_json)?;
        Ok(Self {
            editor: Editor::with_settings(settings),
        })
    }

    #[wasm_bindgen(js_name = addCube)]
    pub fn add_cube(&mut self) -> String {
        self.editor.add_shape(ShapeKind::Cube)
    }

    #[wasm_bindgen(js_name = addSphere)]
    pub fn add_sphere(&mut self) -> String {
        self.editor.add_shape(ShapeKind::Sphere)
    }

    #[wasm_bindgen(js_name = addCylinder)]
    pub fn add_cylinder(&mut self) -> String {
        self.editor.add_shape(ShapeKind::Cylinder)
    }

    #[wasm_bindgen(js_name = addPlane)]
    pub fn add_plane(&mut self) -> String {
        self.editor.add_shape(ShapeKind::Plane)
    }

    #[wasm_bindgen(js_name = addPyramid)]
    pub fn add_pyramid(&mut self) -> String {
        self.editor.add_shape(ShapeKind::Pyramid)
    }

    /// Spawn a shape by kind name (`cube`, `sphere`, ...)
    #[wasm_bindgen(js_name = addShape)]
    pub fn add_shape(&mut self, kind: &str) -> Result<String, JsError> {
        Ok(self.editor.add_shape_named(kind)?)
    }

    /// Click at a canvas-relative pixel; returns the selection afterwards
    pub fn click(&mut self, client_x: f32, client_y: f32) -> Option<String> {
        self.editor.click(client_x, client_y)
    }

    /// Returns whether the key was bound to an action
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str, ctrl: bool) -> Result<bool, JsError> {
        Ok(self.editor.key_down(key, ctrl)?.is_some())
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsError> {
        Ok(self.editor.resize(width, height)?)
    }

    /// Advance one frame and describe it as a plain JS object.
    /// Call from `requestAnimationFrame` on every refresh.
    pub fn frame(&mut self) -> Result<JsValue, JsError> {
        let info = self.editor.frame();
        to_js(&describe_frame(&self.editor, info))
    }

    /// Execute one JSON command and return the response object
    pub fn execute(&mut self, command_json: &str) -> Result<JsValue, JsError> {
        let response = execute_json(&mut self.editor, command_json)?;
        to_js(&response)
    }

    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsError> {
        Ok(self.editor.set_mode_named(mode)?)
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        self.editor.mode().name().to_string()
    }

    #[wasm_bindgen(getter, js_name = objectCount)]
    pub fn object_count(&self) -> usize {
        self.editor.object_count()
    }

    #[wasm_bindgen(getter)]
    pub fn selected(&self) -> Option<String> {
        self.editor.selected().cloned()
    }
}

/// Version info
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
