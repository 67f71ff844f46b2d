//! FFmpeg execution adapter
//!
//! Runs the external `ffmpeg` executable as a child process, one encode at a
//! time, and reports its exit code together with everything it wrote to stderr.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Executable name searched for when nothing is configured
pub const DEFAULT_ENCODER: &str = "ffmpeg";

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// FFmpeg-based encode adapter
pub struct FfmpegAdapter {
    explicit_path: Option<PathBuf>,
}

impl FfmpegAdapter {
    /// Create adapter that resolves `ffmpeg` from the bundle or `PATH`
    pub fn new() -> Self {
        Self {
            explicit_path: None,
        }
    }

    /// Create adapter bound to a configured executable path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            explicit_path: Some(path.into()),
        }
    }

    /// Path of an `ffmpeg` shipped next to the running executable
    fn bundled_encoder() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        let candidate = exe
            .parent()?
            .join(format!("{}{}", DEFAULT_ENCODER, std::env::consts::EXE_SUFFIX));
        candidate.is_file().then_some(candidate)
    }

    fn resolve_explicit(path: &Path) -> Result<PathBuf, DomainError> {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }

        // Bare names such as "ffmpeg-6" are looked up on PATH
        which::which(path).map_err(|_| DomainError::ToolNotFound(path.display().to_string()))
    }
}

impl Default for FfmpegAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EncodePort for FfmpegAdapter {
    async fn locate_encoder(&self) -> Result<PathBuf, DomainError> {
        if let Some(path) = &self.explicit_path {
            let resolved = Self::resolve_explicit(path)?;
            debug!("Using configured encoder: {}", resolved.display());
            return Ok(resolved);
        }

        if let Some(bundled) = Self::bundled_encoder() {
            info!("Using bundled encoder: {}", bundled.display());
            return Ok(bundled);
        }

        match which::which(DEFAULT_ENCODER) {
            Ok(path) => {
                debug!("Using encoder from PATH: {}", path.display());
                Ok(path)
            }
            Err(e) => {
                warn!("{} not found on PATH: {}", DEFAULT_ENCODER, e);
                Err(DomainError::ToolNotFound(format!(
                    "{} could not be found. Put it next to this program, on PATH, or pass --ffmpeg",
                    DEFAULT_ENCODER
                )))
            }
        }
    }

    async fn encode(&self, job: &EncodeJob) -> Result<EncodeReport, DomainError> {
        let mut command = Command::new(&job.program);
        command
            .args(job.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let started = Instant::now();
        let output = command.output().await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DomainError::ToolNotFound(job.program.display().to_string()),
            _ => DomainError::ProcessFail(format!(
                "Failed to run {}: {}",
                job.program.display(),
                e
            )),
        })?;

        let report = EncodeReport {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed: started.elapsed(),
        };
        debug!(
            "Encoder exited with {:?} after {:?}",
            report.exit_code, report.elapsed
        );

        Ok(report)
    }
}
