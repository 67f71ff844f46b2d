// Local filesystem adapter - File system operations on the host OS

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::ports::*;

/// Local filesystem adapter
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

impl Default for FsLocalAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn directory_exists(&self, dir_path: &Path) -> Result<bool, DomainError> {
        Ok(dir_path.is_dir())
    }

    async fn list_file_names(&self, dir_path: &Path) -> Result<Vec<OsString>, DomainError> {
        let mut names = Vec::new();

        for entry in WalkDir::new(dir_path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                DomainError::FsFail(format!(
                    "Failed to read directory {}: {}",
                    dir_path.display(),
                    e
                ))
            })?;

            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            names.push(entry.file_name().to_os_string());
        }

        Ok(names)
    }

    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(dir_path)
            .map_err(|e| DomainError::FsFail(format!("Failed to create directory: {}", e)))?;
        Ok(())
    }

    async fn create_temp_file(
        &self,
        dir_path: &Path,
        prefix: &OsStr,
        suffix: &OsStr,
    ) -> Result<PathBuf, DomainError> {
        let temp_file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(dir_path)
            .map_err(|e| DomainError::FsFail(format!("Failed to create temp file: {}", e)))?;

        temp_file
            .into_temp_path()
            .keep()
            .map_err(|e| DomainError::FsFail(format!("Failed to keep temp file: {}", e)))
    }

    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        Ok(file_path.exists())
    }

    async fn delete_file(&self, file_path: &Path) -> Result<(), DomainError> {
        fs::remove_file(file_path).map_err(|e| DomainError::FsFail(e.to_string()))?;
        Ok(())
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
        fs::rename(from, to).map_err(|e| DomainError::FsFail(e.to_string()))?;
        Ok(())
    }
}
