//! Skraper Video Encoder Library
//!
//! Batch trimming and re-encoding of every video in a folder by driving an
//! external `ffmpeg`, one file at a time, with an overwrite-safe replace of
//! the originals when requested.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{BatchCompletion, BatchController, BatchConverter, BatchHandle, BatchReport};
pub use domain::errors::DomainError;
pub use domain::model::{
    BatchResult, BatchSummary, ConversionRequest, OutputMode, Resolution, TaskOutcome, TaskStatus,
};
pub use error::{ConvertError, ConvertResult};
