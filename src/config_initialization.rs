//! Configuration initialization and hierarchy management
//!
//! Precedence: CLI > Env > File > Defaults. Clap already folds the
//! environment into the CLI arguments, so only the file and the built-in
//! defaults are merged here.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::adapters::TomlConfigAdapter;
use crate::cli::args::ConvertArgs;
use crate::domain::model::{ConversionRequest, OutputMode, Resolution};
use crate::error::{ConvertError, ConvertResult};
use crate::ports::ConfigPort;

pub const DEFAULT_SIZE: &str = "640x480";
pub const DEFAULT_DURATION: &str = "20";
pub const DEFAULT_INCLUDE_AUDIO: bool = true;

/// Fully resolved options for a convert run
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSettings {
    pub resolution: Resolution,
    pub duration_seconds: u32,
    pub include_audio: bool,
    pub output_mode: OutputMode,
    pub encoder: Option<PathBuf>,
}

impl ConvertSettings {
    /// Immutable request for one batch over `directory`
    pub fn into_request(self, directory: PathBuf) -> ConversionRequest {
        ConversionRequest::new(
            directory,
            self.resolution,
            self.include_audio,
            self.duration_seconds,
            self.output_mode,
        )
    }
}

/// Load the configuration file named on the command line or found by discovery
pub fn load_configuration(explicit: Option<&Path>) -> ConvertResult<TomlConfigAdapter> {
    let config = TomlConfigAdapter::discover(explicit)?;
    match config.config_file_path() {
        Some(path) => info!("Configuration file: {}", path.display()),
        None => debug!("Running with built-in defaults"),
    }
    Ok(config)
}

/// Merge CLI/env arguments with the configuration file and defaults
pub fn resolve_convert_settings(
    args: &ConvertArgs,
    config: &dyn ConfigPort,
) -> ConvertResult<ConvertSettings> {
    let size = args
        .size
        .clone()
        .unwrap_or_else(|| config.get_config_or_default("defaults.size", DEFAULT_SIZE));
    let resolution = Resolution::parse(&size)?;

    let duration = args
        .duration
        .clone()
        .unwrap_or_else(|| config.get_config_or_default("defaults.duration", DEFAULT_DURATION));
    let duration_seconds = ConversionRequest::parse_duration(&duration)?;

    let include_audio = if args.no_audio {
        false
    } else if args.audio {
        true
    } else {
        match config.get_config("defaults.include_audio") {
            Some(value) => value.trim().parse::<bool>().map_err(|_| {
                ConvertError::config(format!(
                    "Invalid value for defaults.include_audio: {} (expected true or false)",
                    value
                ))
            })?,
            None => DEFAULT_INCLUDE_AUDIO,
        }
    };

    let output_mode = if args.overwrite {
        OutputMode::Overwrite
    } else if let Some(mode) = &args.mode {
        OutputMode::parse(mode)?
    } else {
        match config.get_config("defaults.output_mode") {
            Some(mode) => OutputMode::parse(&mode)?,
            None => OutputMode::default(),
        }
    };

    let encoder = args
        .ffmpeg
        .clone()
        .or_else(|| config.get_config("encoder.ffmpeg_path").map(PathBuf::from));

    let settings = ConvertSettings {
        resolution,
        duration_seconds,
        include_audio,
        output_mode,
        encoder,
    };
    debug!("Resolved settings: {:?}", settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn convert_args(extra: &[&str]) -> ConvertArgs {
        let mut argv = vec!["skraper-encoder", "convert", "/videos"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Convert(args) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    fn file_config() -> TomlConfigAdapter {
        TomlConfigAdapter::from_toml_str(
            r#"
            [encoder]
            ffmpeg_path = "/opt/ffmpeg"

            [defaults]
            size = "320x240"
            duration = "15"
            include_audio = false
            output_mode = "overwrite"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_without_file() {
        let settings =
            resolve_convert_settings(&convert_args(&[]), &TomlConfigAdapter::new()).unwrap();

        assert_eq!(settings.resolution, Resolution::new(640, 480).unwrap());
        assert_eq!(settings.duration_seconds, 20);
        assert!(settings.include_audio);
        assert_eq!(settings.output_mode, OutputMode::Trimmed);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let settings = resolve_convert_settings(&convert_args(&[]), &file_config()).unwrap();

        assert_eq!(settings.resolution, Resolution::new(320, 240).unwrap());
        assert_eq!(settings.duration_seconds, 15);
        assert!(!settings.include_audio);
        assert_eq!(settings.output_mode, OutputMode::Overwrite);
        assert_eq!(settings.encoder, Some(PathBuf::from("/opt/ffmpeg")));
    }

    #[test]
    fn test_cli_overrides_file() {
        let args = convert_args(&[
            "--size",
            "1280x720",
            "--duration",
            "5",
            "--audio",
            "--mode",
            "trimmed",
            "--ffmpeg",
            "/usr/local/bin/ffmpeg",
        ]);
        let settings = resolve_convert_settings(&args, &file_config()).unwrap();

        assert_eq!(settings.resolution, Resolution::new(1280, 720).unwrap());
        assert_eq!(settings.duration_seconds, 5);
        assert!(settings.include_audio);
        assert_eq!(settings.output_mode, OutputMode::Trimmed);
        assert_eq!(
            settings.encoder,
            Some(PathBuf::from("/usr/local/bin/ffmpeg"))
        );
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let result = resolve_convert_settings(
            &convert_args(&["--duration", "twenty"]),
            &TomlConfigAdapter::new(),
        );
        assert!(matches!(result, Err(ConvertError::Config { .. })));

        let result =
            resolve_convert_settings(&convert_args(&["--size", "big"]), &TomlConfigAdapter::new());
        assert!(matches!(result, Err(ConvertError::Config { .. })));

        let config = TomlConfigAdapter::from_toml_str("[defaults]\ninclude_audio = \"maybe\"\n")
            .unwrap();
        let result = resolve_convert_settings(&convert_args(&[]), &config);
        assert!(matches!(result, Err(ConvertError::Config { .. })));
    }

    #[test]
    fn test_conflicting_flags_rejected_by_parser() {
        assert!(Cli::try_parse_from([
            "skraper-encoder",
            "convert",
            "/videos",
            "--audio",
            "--no-audio"
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "skraper-encoder",
            "convert",
            "/videos",
            "--overwrite",
            "--mode",
            "trimmed"
        ])
        .is_err());
    }

    #[test]
    fn test_into_request() {
        let settings = resolve_convert_settings(
            &convert_args(&["--overwrite", "--no-audio"]),
            &TomlConfigAdapter::new(),
        )
        .unwrap();
        let request = settings.into_request(PathBuf::from("/videos"));

        assert!(request.is_overwrite());
        assert!(!request.include_audio);
        assert_eq!(request.source_directory, PathBuf::from("/videos"));
    }
}
