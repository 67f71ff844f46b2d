// Domain errors - Error types raised by ports and adapters

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File system operation failed
    FsFail(String),
    /// Encoder executable could not be located or spawned
    ToolNotFound(String),
    /// Child process could not be run to completion
    ProcessFail(String),
    /// Task state machine misuse
    InvalidTransition(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::ToolNotFound(msg) => write!(f, "Encoder not found: {}", msg),
            DomainError::ProcessFail(msg) => write!(f, "Process error: {}", msg),
            DomainError::InvalidTransition(msg) => write!(f, "Invalid task transition: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
