//! Renderer-agnostic editor logic: scene, picking, selection, input and frames.
//! Front-ends (native window, browser) drive it through `Editor`.

pub mod backend;
pub mod command;
pub mod editor;
pub mod error;
pub mod factory;
pub mod fixtures;
pub mod input;
pub mod render_driver;
pub mod state;

pub mod viewport {
    pub mod camera;
    pub mod gizmo;
    pub mod mesh;
    pub mod picking;
}

pub use backend::{GraphicsBackend, MeshBackend};
pub use editor::Editor;
pub use error::{EditorError, EditorResult};
pub use input::{EditorAction, InputEvent, InputRouter, KeyChord};
pub use render_driver::FrameInfo;
pub use state::settings::EditorSettings;
