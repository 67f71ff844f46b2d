// Convert interactor - Orchestrates the batch conversion use case

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::error::{ConvertError, ConvertResult};
use crate::ports::*;
use crate::utils::format_duration;
use crate::utils::path::{is_candidate_name, temp_name_parts};

/// Interactor for the batch conversion use case
///
/// Files are processed strictly one after another. A failing file is recorded
/// and the loop moves on; only setup faults end the batch early.
pub struct BatchConverter {
    encode_port: Arc<dyn EncodePort>,
    fs_port: Arc<dyn FsPort>,
}

impl BatchConverter {
    /// Create new batch converter with injected ports
    pub fn new(encode_port: Arc<dyn EncodePort>, fs_port: Arc<dyn FsPort>) -> Self {
        Self {
            encode_port,
            fs_port,
        }
    }

    /// Video files directly inside `directory`, sorted by name
    pub async fn list_candidate_files(&self, directory: &Path) -> ConvertResult<Vec<OsString>> {
        let names = self.fs_port.list_file_names(directory).await?;
        Ok(names
            .into_iter()
            .filter(|name| is_candidate_name(name))
            .collect())
    }

    /// Check the request before anything is touched
    pub async fn validate_request(&self, request: &ConversionRequest) -> ConvertResult<()> {
        if request.source_directory.as_os_str().is_empty() {
            return Err(ConvertError::config("Please select a directory first."));
        }

        if !self
            .fs_port
            .directory_exists(&request.source_directory)
            .await?
        {
            return Err(ConvertError::config(format!(
                "Directory does not exist: {}",
                request.source_directory.display()
            )));
        }

        Ok(())
    }

    /// Convert every candidate file of the request's directory
    pub async fn run_batch(
        &self,
        request: &ConversionRequest,
        log: &dyn LogPort,
    ) -> ConvertResult<BatchResult> {
        self.validate_request(request).await?;
        let started = Instant::now();

        let files = self.list_candidate_files(&request.source_directory).await?;
        if files.is_empty() {
            log.append("No video files found in the selected directory.")
                .await;
            return Ok(BatchResult::new());
        }

        let encoder = self.encode_port.locate_encoder().await?;

        log.append(&format!(
            "Found {} video file(s). Starting conversion...",
            files.len()
        ))
        .await;

        let destination_directory = request.destination_directory();
        if let Some(dir) = &destination_directory {
            self.fs_port
                .create_directory(dir)
                .await
                .map_err(|e| ConvertError::DestinationSetup {
                    path: dir.clone(),
                    message: e.to_string(),
                })?;
            log.append(&format!("Output will be saved to: {}", dir.display()))
                .await;
        }

        let total = files.len();
        let mut result = BatchResult::new();

        for (index, filename) in files.iter().enumerate() {
            let display_name = filename.to_string_lossy();
            log.append(&format!(
                "({}/{}) Processing: {}",
                index + 1,
                total,
                display_name
            ))
            .await;

            let task = match self
                .prepare_task(request, filename, destination_directory.as_deref())
                .await
            {
                Ok(task) => task,
                Err(e) => {
                    log.append(&format!("ERROR preparing {}: {}", display_name, e))
                        .await;
                    result.push(TaskOutcome {
                        filename: display_name.into_owned(),
                        status: TaskStatus::Failed,
                        detail: e.to_string(),
                    });
                    continue;
                }
            };

            let outcome = self.process_task(task, request, &encoder, log).await?;
            result.push(outcome);
        }

        log.append("--- All conversions finished! ---").await;
        info!(
            "Batch finished in {}: {}",
            format_duration(started.elapsed()),
            result.summary()
        );

        Ok(result)
    }

    /// Build the task for one file, allocating its temp output in overwrite mode
    async fn prepare_task(
        &self,
        request: &ConversionRequest,
        filename: &OsStr,
        destination_directory: Option<&Path>,
    ) -> Result<FileTask, DomainError> {
        match destination_directory {
            Some(dir) => Ok(FileTask::to_directory(
                filename,
                &request.source_directory,
                dir,
            )),
            None => {
                let (prefix, suffix) = temp_name_parts(filename);
                let temp_path = self
                    .fs_port
                    .create_temp_file(&request.source_directory, &prefix, &suffix)
                    .await?;
                debug!("Allocated temp output {}", temp_path.display());
                Ok(FileTask::replacing(
                    filename,
                    &request.source_directory,
                    temp_path,
                ))
            }
        }
    }

    /// Run the encoder for one task and settle its outcome
    ///
    /// Returns `Err` only when the encoder disappeared, which ends the batch.
    async fn process_task(
        &self,
        mut task: FileTask,
        request: &ConversionRequest,
        encoder: &Path,
        log: &dyn LogPort,
    ) -> ConvertResult<TaskOutcome> {
        task.begin()?;

        let job = EncodeJob::for_request(encoder, request, &task.source_path, &task.destination_path);
        log.append(&format!("Executing command: {}", job.command_line()))
            .await;

        match self.encode_port.encode(&job).await {
            Ok(report) if report.succeeded() => {
                log.append(&format!("SUCCESS: Converted {}", task.filename))
                    .await;
                debug!(
                    "{} encoded in {}",
                    task.filename,
                    format_duration(report.elapsed)
                );

                match task.temp_path.clone() {
                    None => {
                        let detail = format!("Saved to {}", task.destination_path.display());
                        task.succeed(detail)?;
                    }
                    Some(temp_path) => {
                        match self.replace_original(&temp_path, &task.source_path).await {
                            Ok(()) => {
                                log.append(&format!("Replaced original file: {}", task.filename))
                                    .await;
                                task.succeed("Replaced original file")?;
                            }
                            Err(e) => {
                                log.append(&format!(
                                    "ERROR replacing file {}: {}",
                                    task.filename, e
                                ))
                                .await;
                                self.discard_output(&temp_path).await;
                                task.fail(e.to_string())?;
                            }
                        }
                    }
                }
            }
            Ok(report) => {
                let stderr = report.stderr.trim_end();
                log.append(&format!("ERROR converting {}:", task.filename))
                    .await;
                if !stderr.is_empty() {
                    log.append(stderr).await;
                }

                self.discard_output(&task.destination_path).await;

                let detail = if stderr.is_empty() {
                    match report.exit_code {
                        Some(code) => format!("Encoder exited with code {}", code),
                        None => "Encoder was terminated by a signal".to_string(),
                    }
                } else {
                    stderr.to_string()
                };
                task.fail(detail)?;
            }
            Err(DomainError::ToolNotFound(tool)) => {
                if let Some(temp_path) = &task.temp_path {
                    self.discard_output(temp_path).await;
                }
                return Err(ConvertError::ToolNotFound { tool });
            }
            Err(e) => {
                log.append(&format!("ERROR converting {}: {}", task.filename, e))
                    .await;
                if let Some(temp_path) = &task.temp_path {
                    self.discard_output(temp_path).await;
                }
                task.fail(e.to_string())?;
            }
        }

        Ok(task.into_outcome()?)
    }

    /// Delete the original, then move the encoded temp file into its place
    async fn replace_original(&self, temp_path: &Path, source_path: &Path) -> Result<(), DomainError> {
        self.fs_port.delete_file(source_path).await?;
        self.fs_port.move_file(temp_path, source_path).await
    }

    /// Best-effort removal of an output that will not be used
    ///
    /// Called for the temp file in overwrite mode, and for the destination
    /// file only after the encoder actually ran and failed.
    async fn discard_output(&self, output_path: &Path) {
        match self.fs_port.file_exists(output_path).await {
            Ok(true) => match self.fs_port.delete_file(output_path).await {
                Ok(()) => debug!("Removed unused output {}", output_path.display()),
                Err(e) => warn!("Could not remove {}: {}", output_path.display(), e),
            },
            Ok(false) => {}
            Err(e) => warn!("Could not inspect {}: {}", output_path.display(), e),
        }
    }
}
