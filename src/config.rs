use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "bencode.toml";

/// Hard ceiling on `max_depth`. The decoder recurses once per nesting level,
/// so larger limits would let deep input exhaust the thread stack.
pub const MAX_DEPTH_LIMIT: usize = 512;

/// Limits applied while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub max_depth: usize,          // nested lists/dicts allowed
    pub allow_trailing_data: bool, // accept bytes after the top-level value
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            allow_trailing_data: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub decode: DecodeOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            decode: DecodeOptions::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl Config {
    /// Reads `bencode.toml` from the working directory, falling back to the
    /// defaults when it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Path::new(DEFAULT_CONFIG_PATH);
        if config_path.exists() {
            Self::from_path(config_path)
        } else {
            log::debug!("no {} found, using defaults", DEFAULT_CONFIG_PATH);
            Ok(Self::default())
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.decode.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                reason: format!(
                    "decode.max_depth {} exceeds the limit of {}",
                    config.decode.max_depth, MAX_DEPTH_LIMIT
                ),
            });
        }
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}
