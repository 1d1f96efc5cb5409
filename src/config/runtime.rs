use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::dispatch::Backend;
use crate::numerics::MAX_BIT_WIDTH;

pub const BACKEND_ENV: &str = "LANEWISE_BACKEND";
pub const MAX_BITS_ENV: &str = "LANEWISE_MAX_BITS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("runtime configuration was already installed")]
    AlreadyInstalled,
}

/// Process-wide settings: which backend runs by default, and the widest
/// register the platform is treated as having.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub backend: Backend,
    pub max_bit_width: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            backend: Backend::default(),
            max_bit_width: MAX_BIT_WIDTH,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `LANEWISE_BACKEND` and `LANEWISE_MAX_BITS`.
    /// Unusable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = RuntimeConfig::default();

        if let Some(raw) = lookup(BACKEND_ENV) {
            match Backend::from_name(&raw) {
                Some(backend) => config.backend = backend,
                None => warn!(key = BACKEND_ENV, value = %raw, "ignoring unknown backend"),
            }
        }

        if let Some(raw) = lookup(MAX_BITS_ENV) {
            let candidate = raw.trim().parse().ok().map(|max_bit_width| RuntimeConfig {
                max_bit_width,
                ..config.clone()
            });
            match candidate.filter(|c| c.validate().is_ok()) {
                Some(valid) => config = valid,
                None => warn!(key = MAX_BITS_ENV, value = %raw, "ignoring invalid maximum bit width"),
            }
        }

        config
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The maximum width must be a multiple of 64 in `[64, 512]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let width = self.max_bit_width;
        if (64..=MAX_BIT_WIDTH).contains(&width) && width.is_multiple_of(64) {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                key: "max_bit_width",
                value: width.to_string(),
            })
        }
    }
}
