//! Skraper Video Encoder
//!
//! Trims and re-encodes every video of a folder with ffmpeg.
//!
//! # Features
//!
//! - Picks up .mp4, .avi, .mov, .mkv, .flv and .wmv files (non-recursive)
//! - Fixed 30 fps output at a chosen WIDTHxHEIGHT, first N seconds only
//! - Optional audio removal
//! - Results in a `trimmed` sub-folder, or safely replacing the originals
//!
//! # Usage
//!
//! ```bash
//! skraper-encoder convert ./videos --size 320x240 --duration 15
//! skraper-encoder convert ./videos --overwrite --no-audio
//! skraper-encoder list ./videos
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use skraper_encoder::cli::{commands, Cli, Commands};
use skraper_encoder::config_initialization::load_configuration;
use skraper_encoder::ports::LogLevel;

/// Main entry point for the Skraper encoder
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli)?;
    info!("Starting Skraper Video Encoder");

    // Execute the requested command
    match cli.command {
        Commands::Convert(args) => {
            debug!("Executing convert command");
            let config = load_configuration(cli.config.as_deref())?;
            commands::convert(args, &config).await?;
        }
        Commands::List(args) => {
            debug!("Executing list command");
            commands::list(args).await?;
        }
    }

    info!("Skraper Video Encoder completed successfully");
    Ok(())
}

/// Initialize logging; RUST_LOG wins over --log-level
fn init_tracing(cli: &Cli) -> Result<()> {
    let level = LogLevel::parse(&cli.log_level)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}
