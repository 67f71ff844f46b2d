// Domain models - Core types and data structures

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Extensions (lowercase, without the dot) picked up by a batch
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "flv", "wmv"];

/// Sub-folder that receives the outputs when originals are kept
pub const TRIMMED_DIR_NAME: &str = "trimmed";

/// Marker embedded in every temporary output name
pub const TEMP_MARKER: &str = ".skraper-tmp-";

/// Output frame rate passed to the encoder
pub const OUTPUT_FRAME_RATE: u32 = 30;

/// Target frame size, rendered as `WIDTHxHEIGHT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Create a new resolution; both sides must be non-zero
    pub fn new(width: u32, height: u32) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::BadArgs(
                "Resolution width and height must be greater than zero".to_string(),
            ));
        }
        Ok(Self { width, height })
    }

    /// Parse `WIDTHxHEIGHT` (e.g. `640x480`, `320X240`)
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let trimmed = text.trim();
        let (width, height) = trimmed
            .split_once(['x', 'X'])
            .ok_or_else(|| {
                DomainError::BadArgs(format!(
                    "Invalid size '{}'. Expected WIDTHxHEIGHT, e.g. 640x480",
                    trimmed
                ))
            })?;

        let width = width
            .trim()
            .parse::<u32>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid width in size '{}'", trimmed)))?;
        let height = height
            .trim()
            .parse::<u32>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid height in size '{}'", trimmed)))?;

        Self::new(width, height)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Where converted files end up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Write to `<source>/trimmed/<name>`, originals untouched
    #[default]
    Trimmed,
    /// Replace each original with its converted version
    Overwrite,
}

impl OutputMode {
    /// Parse output mode from string
    pub fn parse(mode_str: &str) -> Result<Self, DomainError> {
        match mode_str.trim().to_lowercase().as_str() {
            "trimmed" => Ok(OutputMode::Trimmed),
            "overwrite" => Ok(OutputMode::Overwrite),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid output mode: {}. Valid modes: trimmed, overwrite",
                mode_str
            ))),
        }
    }

    pub fn is_overwrite(&self) -> bool {
        matches!(self, OutputMode::Overwrite)
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Trimmed => write!(f, "trimmed"),
            OutputMode::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// Everything a batch needs to know, fixed before the batch starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub source_directory: PathBuf,
    pub resolution: Resolution,
    pub include_audio: bool,
    pub duration_seconds: u32,
    pub output_mode: OutputMode,
}

impl ConversionRequest {
    /// Create a new conversion request
    pub fn new(
        source_directory: impl Into<PathBuf>,
        resolution: Resolution,
        include_audio: bool,
        duration_seconds: u32,
        output_mode: OutputMode,
    ) -> Self {
        Self {
            source_directory: source_directory.into(),
            resolution,
            include_audio,
            duration_seconds,
            output_mode,
        }
    }

    /// Parse the textual clip length; only whole, non-negative seconds are accepted
    pub fn parse_duration(text: &str) -> Result<u32, DomainError> {
        let trimmed = text.trim();
        trimmed.parse::<u32>().map_err(|_| {
            DomainError::BadArgs(format!(
                "Please enter a valid number for video length (got '{}')",
                trimmed
            ))
        })
    }

    pub fn is_overwrite(&self) -> bool {
        self.output_mode.is_overwrite()
    }

    /// `<source>/trimmed` when originals are kept, `None` in overwrite mode
    pub fn destination_directory(&self) -> Option<PathBuf> {
        match self.output_mode {
            OutputMode::Trimmed => Some(self.source_directory.join(TRIMMED_DIR_NAME)),
            OutputMode::Overwrite => None,
        }
    }
}

/// A single encoder invocation
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeJob {
    pub program: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub resolution: Resolution,
    pub duration_seconds: u32,
    pub include_audio: bool,
}

impl EncodeJob {
    /// Build the job for one file of a request
    pub fn for_request(
        program: &Path,
        request: &ConversionRequest,
        input: &Path,
        output: &Path,
    ) -> Self {
        Self {
            program: program.to_path_buf(),
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            resolution: request.resolution,
            duration_seconds: request.duration_seconds,
            include_audio: request.include_audio,
        }
    }

    /// Encoder arguments, without the program itself
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-y".into(),
            "-i".into(),
            self.input.clone().into_os_string(),
            "-r".into(),
            OUTPUT_FRAME_RATE.to_string().into(),
            "-s".into(),
            self.resolution.to_string().into(),
            "-ss".into(),
            "0".into(),
            "-to".into(),
            self.duration_seconds.to_string().into(),
        ];

        if !self.include_audio {
            args.push("-an".into());
        }

        args.push(self.output.clone().into_os_string());
        args
    }

    /// Human-readable command line for the log
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str().to_os_string())
            .chain(self.args())
            .map(|part| part.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What the encoder process left behind
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeReport {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stderr: String,
    pub elapsed: Duration,
}

impl EncodeReport {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Lifecycle of a file task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// One matched file moving through the batch
#[derive(Debug, Clone)]
pub struct FileTask {
    /// Display name; lossy when the on-disk name is not UTF-8
    pub filename: String,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    /// Set in overwrite mode; equals `destination_path`
    pub temp_path: Option<PathBuf>,
    state: TaskState,
    detail: String,
}

impl FileTask {
    /// Task writing to `<destination_directory>/<filename>`
    pub fn to_directory(
        filename: impl AsRef<OsStr>,
        source_directory: &Path,
        destination_directory: &Path,
    ) -> Self {
        let filename = filename.as_ref();
        Self {
            filename: filename.to_string_lossy().into_owned(),
            source_path: source_directory.join(filename),
            destination_path: destination_directory.join(filename),
            temp_path: None,
            state: TaskState::Pending,
            detail: String::new(),
        }
    }

    /// Task writing to a temp file that later replaces the original
    pub fn replacing(
        filename: impl AsRef<OsStr>,
        source_directory: &Path,
        temp_path: PathBuf,
    ) -> Self {
        let filename = filename.as_ref();
        Self {
            filename: filename.to_string_lossy().into_owned(),
            source_path: source_directory.join(filename),
            destination_path: temp_path.clone(),
            temp_path: Some(temp_path),
            state: TaskState::Pending,
            detail: String::new(),
        }
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Pending -> Running
    pub fn begin(&mut self) -> Result<(), DomainError> {
        match self.state {
            TaskState::Pending => {
                self.state = TaskState::Running;
                Ok(())
            }
            other => Err(self.transition_error(other, TaskState::Running)),
        }
    }

    /// Running -> Succeeded
    pub fn succeed(&mut self, detail: impl Into<String>) -> Result<(), DomainError> {
        self.finish(TaskState::Succeeded, detail.into())
    }

    /// Running -> Failed
    pub fn fail(&mut self, detail: impl Into<String>) -> Result<(), DomainError> {
        self.finish(TaskState::Failed, detail.into())
    }

    fn finish(&mut self, target: TaskState, detail: String) -> Result<(), DomainError> {
        if self.state != TaskState::Running {
            return Err(self.transition_error(self.state, target));
        }
        self.state = target;
        self.detail = detail;
        Ok(())
    }

    fn transition_error(&self, from: TaskState, to: TaskState) -> DomainError {
        DomainError::InvalidTransition(format!("{}: {:?} -> {:?}", self.filename, from, to))
    }

    /// Consume a finished task into its outcome record
    pub fn into_outcome(self) -> Result<TaskOutcome, DomainError> {
        let status = match self.state {
            TaskState::Succeeded => TaskStatus::Success,
            TaskState::Failed => TaskStatus::Failed,
            other => {
                return Err(DomainError::InvalidTransition(format!(
                    "{}: task still {:?}",
                    self.filename, other
                )))
            }
        };

        Ok(TaskOutcome {
            filename: self.filename,
            status,
            detail: self.detail,
        })
    }
}

/// Final status of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Success,
    Failed,
}

/// Per-file record kept in the batch result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub filename: String,
    pub status: TaskStatus,
    pub detail: String,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Success
    }
}

/// Ordered outcomes of one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub outcomes: Vec<TaskOutcome>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: TaskOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn processed_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.processed_count() - self.success_count()
    }

    pub fn had_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Totals reported once the batch completes
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            processed_count: self.processed_count(),
            succeeded_count: self.success_count(),
            failed_count: self.failure_count(),
            had_failures: self.had_failures(),
        }
    }
}

/// Totals of a finished batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub processed_count: usize,
    pub succeeded_count: usize,
    pub failed_count: usize,
    pub had_failures: bool,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} file(s): {} succeeded, {} failed",
            self.processed_count, self.succeeded_count, self.failed_count
        )
    }
}
