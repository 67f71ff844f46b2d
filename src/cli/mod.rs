//! CLI module for the batch encoder
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// Skraper Video Encoder
///
/// Trims and re-encodes every video in a folder with ffmpeg, writing the
/// results to a `trimmed` sub-folder or over the originals.
#[derive(Parser, Debug)]
#[command(name = "skraper-encoder")]
#[command(about = "Skraper Video Encoder - batch trim and re-encode a folder of videos")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Diagnostic logging level (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Emit diagnostic logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (default: ./skraper.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trim and re-encode every video in a folder
    ///
    /// In trimmed mode an existing `trimmed/<name>` is overwritten without
    /// asking. When the encoder fails on a file, whatever it left at that path
    /// is removed, including an output kept from an earlier run.
    Convert(args::ConvertArgs),
    /// List the videos a conversion would pick up
    List(args::ListArgs),
}
