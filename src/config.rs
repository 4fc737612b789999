//! Runtime configuration.
//!
//! Stored as TOML, by default in `~/.kavach/config.toml`. Every field has a
//! default, so a partial file (or no file at all) is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::crypto::{KdfParams, PayloadCodec, DEFAULT_LEVEL};
use crate::stego::{BitPacker, LsbCodec};
use crate::MAX_PAYLOAD_BYTES;

/// Placeholder used when the narrative service cannot produce text.
pub const DEFAULT_NARRATIVE_PLACEHOLDER: &str = "Analysis unavailable at this time.";

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Codec and reporting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Largest payload (bytes) accepted on embed and trusted on extract.
    pub max_payload_bytes: usize,

    /// zlib level, 0-9.
    pub compression_level: u32,

    /// Re-read the embedded bits after encoding and report the measured accuracy.
    pub verify_embedding: bool,

    /// Text shown when narrative generation fails.
    pub narrative_placeholder: String,

    /// Argon2id cost used when packing. Decoding reads the cost from the blob.
    pub kdf: KdfParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_payload_bytes: MAX_PAYLOAD_BYTES,
            compression_level: DEFAULT_LEVEL,
            verify_embedding: true,
            narrative_placeholder: DEFAULT_NARRATIVE_PLACEHOLDER.to_string(),
            kdf: KdfParams::default(),
        }
    }
}

impl Config {
    /// Loads the config from the default location, or defaults if it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads and validates a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the config as TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Returns the default config file path.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(".kavach").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_payload_bytes == 0 || self.max_payload_bytes > u32::MAX as usize {
            return Err(ConfigError::Invalid(format!(
                "max_payload_bytes must be between 1 and {}",
                u32::MAX
            )));
        }
        if self.compression_level > 9 {
            return Err(ConfigError::Invalid(format!(
                "compression_level must be 0-9, got {}",
                self.compression_level
            )));
        }
        self.kdf
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn payload_codec(&self) -> PayloadCodec {
        PayloadCodec::new(self.compression_level, self.kdf)
    }

    pub fn lsb_codec(&self) -> LsbCodec {
        LsbCodec::new(BitPacker::new(self.max_payload_bytes))
    }
}
