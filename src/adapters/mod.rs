// Adapters - External system implementations

pub mod channel_log;
pub mod exec_ffmpeg;
pub mod fs_local;
pub mod toml_config;

// Re-export adapters
pub use channel_log::ChannelLogAdapter;
pub use exec_ffmpeg::FfmpegAdapter;
pub use fs_local::FsLocalAdapter;
pub use toml_config::TomlConfigAdapter;
