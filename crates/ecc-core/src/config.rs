//! # Configuration
//!
//! YAML configuration for the coding engine: the block-code data length,
//! the convolutional encoder, logging and the display locale. This is the
//! layer that validates user parameters before they reach the coders.
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `ECC_CONFIG` environment variable
//! 2. `./ecc.yaml` (current directory)
//! 3. The user config directory (`~/.config/ecc/config.yaml` on Linux)
//! 4. `/etc/ecc/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! block:
//!   data_length: 11
//!   secded: true
//!
//! convolutional:
//!   v: 2
//!   generators: ["111", "101"]
//!
//! logging:
//!   level: debug
//!   format: compact
//!
//! locale: en
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::block::{BlockCode, HammingCode, SecdedCode};
use crate::convolutional::{EncoderConfig, Generator};
use crate::hamming::HammingLayout;
use crate::locale::Locale;
use crate::logging::LogConfig;
use crate::types::EccError;

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(String),

    #[error("failed to read config: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid code parameters: {0}")]
    Code(#[from] EccError),
}

/// Linear block code settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockSettings {
    /// Data bits per block
    pub data_length: usize,
    /// Append an overall parity bit (SECDED)
    pub secded: bool,
}

impl Default for BlockSettings {
    fn default() -> Self {
        Self {
            data_length: 4,
            secded: false,
        }
    }
}

/// Convolutional encoder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvolutionalSettings {
    /// Register length
    pub v: usize,
    /// Tap strings, tap 0 (current bit) first
    pub generators: Vec<String>,
}

impl Default for ConvolutionalSettings {
    fn default() -> Self {
        Self {
            v: 2,
            generators: vec!["111".to_string(), "101".to_string()],
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EccConfig {
    pub block: BlockSettings,
    pub convolutional: ConvolutionalSettings,
    pub logging: LogConfig,
    pub locale: Locale,
}

impl EccConfig {
    /// Load configuration from the default search path.
    ///
    /// Returns the default config if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("ECC_CONFIG") {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            return Self::load_from(&path);
        }

        match Self::config_search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        let config = Self::parse(&content)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./ecc.yaml")];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "ecc") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }
        paths.push(PathBuf::from("/etc/ecc/config.yaml"));
        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block.data_length == 0 {
            return Err(EccError::InvalidDataLength(0).into());
        }
        self.encoder_config()?;
        Ok(())
    }

    /// Build the convolutional encoder configuration.
    pub fn encoder_config(&self) -> Result<EncoderConfig, ConfigError> {
        let generators = self
            .convolutional
            .generators
            .iter()
            .enumerate()
            .map(|(i, s)| Generator::from_binary(format!("g{}", i), s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EncoderConfig::new(self.convolutional.v, generators)?)
    }

    /// Layout of the configured block code (without the SECDED bit).
    pub fn block_layout(&self) -> HammingLayout {
        HammingLayout::new(self.block.data_length)
    }

    /// The configured block code, Hamming or SECDED.
    pub fn block_code(&self) -> Box<dyn BlockCode> {
        if self.block.secded {
            Box::new(SecdedCode::new(self.block.data_length))
        } else {
            Box::new(HammingCode::new(self.block.data_length))
        }
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            block: BlockSettings {
                data_length: 11,
                secded: true,
            },
            convolutional: ConvolutionalSettings {
                v: 6,
                generators: vec!["1111001".to_string(), "1011011".to_string()],
            },
            locale: Locale::En,
            ..Default::default()
        };
        serde_yaml::to_string(&config).unwrap_or_default()
    }
}
