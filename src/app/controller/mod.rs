// Batch controller - Runs one batch at a time on a worker task

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::adapters::ChannelLogAdapter;
use crate::app::convert_interactor::BatchConverter;
use crate::domain::model::*;
use crate::error::{ConvertError, ConvertResult};
use crate::ports::LogPort;

/// How a batch ended, delivered exactly once per started batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum BatchCompletion {
    /// Every candidate file was attempted
    Completed(BatchSummary),
    /// A setup fault stopped the batch
    Aborted { reason: String },
}

impl BatchCompletion {
    pub fn summary(&self) -> Option<&BatchSummary> {
        match self {
            BatchCompletion::Completed(summary) => Some(summary),
            BatchCompletion::Aborted { .. } => None,
        }
    }

    /// Completed with every file converted
    pub fn is_clean(&self) -> bool {
        matches!(self, BatchCompletion::Completed(summary) if !summary.had_failures)
    }
}

/// Completion plus the full per-file result when the batch was not aborted
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub completion: BatchCompletion,
    pub result: Option<BatchResult>,
}

/// Releases the busy flag when the worker ends, including by panic
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Starts batches and refuses new ones while a batch is running
pub struct BatchController {
    converter: Arc<BatchConverter>,
    running: Arc<AtomicBool>,
}

impl BatchController {
    pub fn new(converter: Arc<BatchConverter>) -> Self {
        Self {
            converter,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Validate the request and spawn the worker task for it
    ///
    /// Configuration errors and `Busy` are returned here; nothing is spawned
    /// in that case and no completion will follow.
    pub async fn start(&self, request: ConversionRequest) -> ConvertResult<BatchHandle> {
        self.converter.validate_request(&request).await?;

        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ConvertError::Busy);
        }
        let guard = RunningGuard(Arc::clone(&self.running));

        let (log, logs) = ChannelLogAdapter::channel();
        let (done_tx, done_rx) = oneshot::channel();
        let converter = Arc::clone(&self.converter);

        let task = tokio::spawn(async move {
            let report = match converter.run_batch(&request, &log).await {
                Ok(result) => BatchReport {
                    completion: BatchCompletion::Completed(result.summary()),
                    result: Some(result),
                },
                Err(e) => {
                    error!("Batch aborted: {}", e);
                    log.append(&format!("ERROR: {}", e)).await;
                    BatchReport {
                        completion: BatchCompletion::Aborted {
                            reason: e.to_string(),
                        },
                        result: None,
                    }
                }
            };

            // Close the log stream and free the controller before reporting
            drop(log);
            drop(guard);

            if done_tx.send(report).is_err() {
                debug!("Batch handle dropped before completion");
            }
        });

        Ok(BatchHandle {
            logs,
            done: done_rx,
            task,
        })
    }
}

/// Controller-side end of a running batch
pub struct BatchHandle {
    logs: UnboundedReceiver<String>,
    done: oneshot::Receiver<BatchReport>,
    task: JoinHandle<()>,
}

impl BatchHandle {
    /// Deliver every log line in order, then the completion exactly once
    pub async fn drive<L, C>(mut self, mut on_log: L, on_complete: C) -> BatchReport
    where
        L: FnMut(&str),
        C: FnOnce(&BatchCompletion),
    {
        while let Some(line) = self.logs.recv().await {
            on_log(&line);
        }

        let report = match self.done.await {
            Ok(report) => report,
            Err(_) => {
                let reason = match self.task.await {
                    Err(e) if e.is_panic() => "Batch worker panicked".to_string(),
                    _ => "Batch worker stopped without reporting".to_string(),
                };
                error!("{}", reason);
                BatchReport {
                    completion: BatchCompletion::Aborted { reason },
                    result: None,
                }
            }
        };

        on_complete(&report.completion);
        report
    }
}
