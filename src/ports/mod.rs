// Ports - Interface definitions (contracts)

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for running the external encoder
#[async_trait]
pub trait EncodePort: Send + Sync {
    /// Resolve the encoder executable, failing with `ToolNotFound` when absent
    async fn locate_encoder(&self) -> Result<PathBuf, DomainError>;

    /// Run one encode to completion and report exit code and stderr
    ///
    /// A non-zero exit is not an error; `Err` means the process could not be run.
    async fn encode(&self, job: &EncodeJob) -> Result<EncodeReport, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if directory exists
    async fn directory_exists(&self, dir_path: &Path) -> Result<bool, DomainError>;

    /// Names of the regular files directly inside a directory, sorted by name
    ///
    /// Names are returned as found on disk, whether or not they are UTF-8.
    async fn list_file_names(&self, dir_path: &Path) -> Result<Vec<OsString>, DomainError>;

    /// Create directory (including parent directories)
    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Create an empty, uniquely named file in `dir_path` and keep it on disk
    async fn create_temp_file(
        &self,
        dir_path: &Path,
        prefix: &OsStr,
        suffix: &OsStr,
    ) -> Result<PathBuf, DomainError>;

    /// Check if file exists
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError>;

    /// Delete file
    async fn delete_file(&self, file_path: &Path) -> Result<(), DomainError>;

    /// Rename a file within the same file system
    async fn move_file(&self, from: &Path, to: &Path) -> Result<(), DomainError>;
}

/// Port for the batch log sink
///
/// Append-only; a sink never fails the batch.
#[async_trait]
pub trait LogPort: Send + Sync {
    /// Append one line
    async fn append(&self, line: &str);
}

/// Port for configuration management
pub trait ConfigPort: Send + Sync {
    /// Get configuration value
    fn get_config(&self, key: &str) -> Option<String>;

    /// Get configuration value with default
    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config(key).unwrap_or_else(|| default.to_string())
    }

    /// Path the configuration was loaded from, if any
    fn config_file_path(&self) -> Option<PathBuf>;
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
