use thiserror::Error;

/// Editor errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("Unrecognized shape kind: '{0}'")]
    InvalidShapeKind(String),
    #[error("Unrecognized transform mode: '{0}'")]
    InvalidTransformMode(String),
    #[error("Invalid viewport size {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("Invalid command JSON: {0}")]
    InvalidCommand(String),
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
