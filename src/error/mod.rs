//! Error handling module for the batch encoder

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors that stop a batch from starting or abort it before completion.
///
/// Per-file failures are not represented here; they end up as
/// [`TaskStatus::Failed`](crate::domain::model::TaskStatus) entries of the
/// batch result.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Bad or missing directory, unparsable duration/size, malformed config
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Encoder executable missing
    #[error("Encoder not found: {tool}")]
    ToolNotFound { tool: String },

    /// The `trimmed` output directory could not be created
    #[error("Failed to prepare output directory {}: {message}", path.display())]
    DestinationSetup { path: PathBuf, message: String },

    /// A batch is already running
    #[error("A batch is already running")]
    Busy,

    /// Any other fault outside the per-file boundary
    #[error("An unexpected error occurred: {message}")]
    Unexpected { message: String },
}

impl ConvertError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        ConvertError::Config {
            message: message.into(),
        }
    }
}

impl From<DomainError> for ConvertError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::BadArgs(message) => ConvertError::Config { message },
            DomainError::ToolNotFound(tool) => ConvertError::ToolNotFound { tool },
            other => ConvertError::Unexpected {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias for batch operations
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
