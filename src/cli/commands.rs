//! Command implementations

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::app::{AppContainer, BatchCompletion, DefaultAppContainer};
use crate::cli::args::{ConvertArgs, ListArgs};
use crate::config_initialization::resolve_convert_settings;
use crate::domain::model::BatchResult;
use crate::error::ConvertError;
use crate::ports::ConfigPort;

/// JSON document printed by `convert --json`
#[derive(Serialize)]
struct ConvertOutput<'a> {
    completion: &'a BatchCompletion,
    result: Option<&'a BatchResult>,
}

/// Execute the convert command
pub async fn convert(args: ConvertArgs, config: &dyn ConfigPort) -> Result<()> {
    let settings = resolve_convert_settings(&args, config)?;
    let json = args.json;
    let container = DefaultAppContainer::new(settings.encoder.clone());
    let request = settings.into_request(args.directory);

    info!("Starting conversion of {}", request.source_directory.display());
    info!(
        "Size: {}, length: {}s, audio: {}, mode: {}",
        request.resolution, request.duration_seconds, request.include_audio, request.output_mode
    );

    let handle = container.batch_controller().start(request).await?;
    let report = handle
        .drive(print_log_line, |completion| match completion {
            BatchCompletion::Completed(summary) => info!("Batch complete: {}", summary),
            BatchCompletion::Aborted { reason } => info!("Batch aborted: {}", reason),
        })
        .await;

    if json {
        let output = ConvertOutput {
            completion: &report.completion,
            result: report.result.as_ref(),
        };
        let text = serde_json::to_string_pretty(&output)
            .context("Failed to serialize batch result to JSON")?;
        println!("{}", text);
    }

    match &report.completion {
        BatchCompletion::Completed(summary) => {
            if !json {
                println!("{}", summary);
            }
            if summary.had_failures {
                return Err(anyhow::anyhow!(
                    "{} of {} file(s) failed to convert",
                    summary.failed_count,
                    summary.processed_count
                ));
            }
            Ok(())
        }
        BatchCompletion::Aborted { reason } => Err(anyhow::anyhow!("Batch aborted: {}", reason)),
    }
}

/// Execute the list command
pub async fn list(args: ListArgs) -> Result<()> {
    if !args.directory.is_dir() {
        return Err(ConvertError::config(format!(
            "Directory does not exist: {}",
            args.directory.display()
        ))
        .into());
    }

    let container = DefaultAppContainer::new(None);
    let files: Vec<String> = container
        .batch_converter()
        .list_candidate_files(&args.directory)
        .await?
        .iter()
        .map(|name| name.to_string_lossy().into_owned())
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&files)
            .context("Failed to serialize file list to JSON")?;
        println!("{}", json);
    } else {
        for name in &files {
            println!("{}", name);
        }
    }

    info!("{} video file(s) found", files.len());
    Ok(())
}

/// Print one batch log line, timestamping its first line
fn print_log_line(line: &str) {
    let stamp = Local::now().format("%H:%M:%S");
    let mut parts = line.lines();
    match parts.next() {
        Some(first) => println!("[{}] {}", stamp, first),
        None => println!("[{}]", stamp),
    }
    for rest in parts {
        println!("           {}", rest);
    }
}
