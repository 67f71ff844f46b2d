// TOML config adapter - Optional configuration file

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::errors::*;
use crate::ports::*;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "skraper.toml";

/// TOML configuration adapter
///
/// Values are flattened to `section.key` strings, e.g. `encoder.ffmpeg_path`.
#[derive(Debug, Default)]
pub struct TomlConfigAdapter {
    config: HashMap<String, String>,
    config_file_path: Option<PathBuf>,
}

impl TomlConfigAdapter {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(toml_content: &str) -> Result<Self, DomainError> {
        let parsed: toml::Table = toml::from_str(toml_content)
            .map_err(|e| DomainError::BadArgs(format!("Failed to parse TOML config: {}", e)))?;

        let mut config = HashMap::new();
        for (section, value) in parsed {
            match value {
                toml::Value::Table(table) => {
                    for (key, value) in table {
                        if let Some(text) = Self::scalar_to_string(&value) {
                            config.insert(format!("{}.{}", section, key), text);
                        }
                    }
                }
                other => {
                    if let Some(text) = Self::scalar_to_string(&other) {
                        config.insert(section, text);
                    }
                }
            }
        }

        Ok(Self {
            config,
            config_file_path: None,
        })
    }

    /// Load configuration from a file that must exist
    pub fn load_from_file(path: &Path) -> Result<Self, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::BadArgs(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut adapter = Self::from_toml_str(&content)?;
        adapter.config_file_path = Some(path.to_path_buf());
        info!("Loaded configuration from: {}", path.display());
        Ok(adapter)
    }

    /// Load the explicit file, or the first default location that exists
    ///
    /// Having no configuration file at all is fine and yields an empty config.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, DomainError> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(path) = Self::get_default_config_path() {
            candidates.push(path);
        }

        for path in candidates {
            if path.is_file() {
                return Self::load_from_file(&path);
            }
        }

        debug!("No configuration file found");
        Ok(Self::new())
    }

    /// Get default config file path
    fn get_default_config_path() -> Option<PathBuf> {
        // On Windows, use %APPDATA%/skraper/config.toml
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join("skraper").join("config.toml"));
        }

        let base = match std::env::var_os("XDG_CONFIG_HOME") {
            Some(xdg) => PathBuf::from(xdg),
            None => PathBuf::from(std::env::var_os("HOME")?).join(".config"),
        };
        Some(base.join("skraper").join("config.toml"))
    }

    fn scalar_to_string(value: &toml::Value) -> Option<String> {
        match value {
            toml::Value::String(s) => Some(s.clone()),
            toml::Value::Integer(i) => Some(i.to_string()),
            toml::Value::Boolean(b) => Some(b.to_string()),
            toml::Value::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }
}

impl ConfigPort for TomlConfigAdapter {
    fn get_config(&self, key: &str) -> Option<String> {
        self.config.get(key).cloned()
    }

    fn config_file_path(&self) -> Option<PathBuf> {
        self.config_file_path.clone()
    }
}
