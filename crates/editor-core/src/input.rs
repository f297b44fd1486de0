//! Input routing: raw host events in, editor actions out.

use std::collections::HashMap;

use shared::TransformMode;

/// A raw event from the host window or page
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary click at a position in viewport pixels
    PointerClick { x: f32, y: f32 },
    /// Key press; `key` uses DOM-style names ("Delete", "Escape", "d")
    KeyDown { key: String, ctrl: bool },
    Resize { width: f32, height: f32 },
    /// Display refresh tick
    Frame,
}

/// What the editor should do in response to an event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorAction {
    /// Pick at a position in viewport pixels and select the hit
    Pick { x: f32, y: f32 },
    DeleteSelected,
    DuplicateSelected,
    SetMode(TransformMode),
    ClearSelection,
    Resize { width: f32, height: f32 },
    Frame,
}

/// Key plus modifier state.
/// Single-character keys are stored lowercase so `T` and `t` match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    key: String,
    ctrl: bool,
}

impl KeyChord {
    pub fn new(key: &str, ctrl: bool) -> Self {
        let key = if key.chars().count() == 1 {
            key.to_lowercase()
        } else {
            key.to_string()
        };
        Self { key, ctrl }
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    pub fn ctrl(&self) -> bool {
        self.ctrl
    }
}

/// Dispatch table from key chords to actions
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    bindings: HashMap<KeyChord, EditorAction>,
}

impl InputRouter {
    /// Delete, Ctrl+D, T/R/S and Escape
    pub fn with_defaults() -> Self {
        let mut router = Self::default();
        router.bind(KeyChord::new("Delete", false), EditorAction::DeleteSelected);
        router.bind(KeyChord::new("d", true), EditorAction::DuplicateSelected);
        router.bind(KeyChord::new("t", false), EditorAction::SetMode(TransformMode::Translate));
        router.bind(KeyChord::new("r", false), EditorAction::SetMode(TransformMode::Rotate));
        router.bind(KeyChord::new("s", false), EditorAction::SetMode(TransformMode::Scale));
        router.bind(KeyChord::new("Escape", false), EditorAction::ClearSelection);
        router
    }

    /// Add or replace a binding. Returns the action previously bound, if any.
    pub fn bind(&mut self, chord: KeyChord, action: EditorAction) -> Option<EditorAction> {
        self.bindings.insert(chord, action)
    }

    pub fn unbind(&mut self, chord: &KeyChord) -> Option<EditorAction> {
        self.bindings.remove(chord)
    }

    pub fn binding(&self, chord: &KeyChord) -> Option<EditorAction> {
        self.bindings.get(chord).copied()
    }

    /// Map an event to an action. Unbound keys yield `None`.
    pub fn route(&self, event: &InputEvent) -> Option<EditorAction> {
        match event {
            InputEvent::PointerClick { x, y } => Some(EditorAction::Pick { x: *x, y: *y }),
            InputEvent::KeyDown { key, ctrl } => self.binding(&KeyChord::new(key, *ctrl)),
            InputEvent::Resize { width, height } => Some(EditorAction::Resize {
                width: *width,
                height: *height,
            }),
            InputEvent::Frame => Some(EditorAction::Frame),
        }
    }
}
