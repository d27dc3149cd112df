//! Error types for loading the input model.

use std::path::PathBuf;

/// Errors that can occur while reading register descriptions.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// JSON deserialization error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading description files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Description file not found.
    #[error("description file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Two block definitions share the same name.
    #[error("block `{name}` is defined more than once")]
    DuplicateBlock {
        /// The repeated block name.
        name: String,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
