// SPDX-License-Identifier: GPL-3.0-only
//! Runtime configuration
//!
//! Timing and addressing tunables, read from an optional TOML file. Every
//! field has a default, so a missing file or a partial one is fine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::protocols::ddc_ci::frame::MAX_PAYLOAD;
use crate::protocols::ddc_ci::retry::RetryPolicy;
use crate::protocols::ddc_ci::{DEFAULT_ADDRESS, DEFAULT_CAPS_CHUNK_LEN, caps};

pub const APP_DIR: &str = "ddcci-tool";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// DDC/CI peripheral address
    pub address: u8,
    /// Wait after writes and between read attempts
    pub settle_delay_ms: u64,
    /// Attempts per guarded read
    pub retries: u32,
    /// Largest capabilities reply payload accepted
    pub caps_chunk_len: usize,
    /// Ceiling on capability chunk requests
    pub max_caps_chunks: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            settle_delay_ms: RetryPolicy::DEFAULT_SETTLE_DELAY.as_millis() as u64,
            retries: RetryPolicy::DEFAULT_ATTEMPTS,
            caps_chunk_len: DEFAULT_CAPS_CHUNK_LEN,
            max_caps_chunks: caps::DEFAULT_MAX_CHUNKS,
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/ddcci-tool/config.toml` or the platform equivalent
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one the default location is
    /// tried and silently skipped when absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("No config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.clone(),
                source,
            },
            other => other,
        })?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address > 0x7f {
            return Err(ConfigError::Invalid(format!(
                "address 0x{:02x} is not a 7-bit bus address",
                self.address
            )));
        }
        if self.retries == 0 {
            return Err(ConfigError::Invalid("retries must be at least 1".into()));
        }
        // Room for the chunk header and at least one data byte
        if !(caps::HEADER_LEN + 1..=MAX_PAYLOAD).contains(&self.caps_chunk_len) {
            return Err(ConfigError::Invalid(format!(
                "caps_chunk_len {} must be between {} and {}",
                self.caps_chunk_len,
                caps::HEADER_LEN + 1,
                MAX_PAYLOAD
            )));
        }
        if self.max_caps_chunks == 0 {
            return Err(ConfigError::Invalid(
                "max_caps_chunks must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, self.settle_delay())
    }
}
