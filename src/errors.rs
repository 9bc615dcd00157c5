use thiserror::Error;

/// Errors that can occur while serving notes over MCP.
#[derive(Error, Debug)]
pub enum NotesError {
    #[error("invalid params: {message}")]
    InvalidParams { message: String },

    #[error("duplicate note id: {id}")]
    DuplicateId { id: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NotesError {
    /// Shorthand for building an `InvalidParams` error.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }
}

/// Convenience alias for results using `NotesError`.
pub type Result<T> = std::result::Result<T, NotesError>;
