//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Folder containing the videos
    pub directory: PathBuf,

    /// Output frame size as WIDTHxHEIGHT (default: 640x480)
    #[arg(short, long, env = "SKRAPER_SIZE")]
    pub size: Option<String>,

    /// Length to keep, in whole seconds (default: 20)
    #[arg(short, long, env = "SKRAPER_DURATION")]
    pub duration: Option<String>,

    /// Drop the audio stream
    #[arg(long, conflicts_with = "audio")]
    pub no_audio: bool,

    /// Keep the audio stream (overrides the config file)
    #[arg(long)]
    pub audio: bool,

    /// Where results go: trimmed or overwrite (default: trimmed)
    #[arg(long, conflicts_with = "overwrite")]
    pub mode: Option<String>,

    /// Replace the original files, same as --mode overwrite
    #[arg(long)]
    pub overwrite: bool,

    /// Path or name of the ffmpeg executable
    #[arg(long, env = "SKRAPER_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Print the batch result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Folder to scan
    pub directory: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
