//! Runtime configuration.
//!
//! The configuration is resolved once per process: either installed explicitly
//! with [`install`] before the first vector operation, or read lazily from the
//! environment on first use.

mod runtime;

use std::sync::OnceLock;

use tracing::debug;

pub use runtime::{BACKEND_ENV, ConfigError, MAX_BITS_ENV, RuntimeConfig};

static CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

/// The active configuration, read from the environment if none was installed.
pub fn current() -> &'static RuntimeConfig {
    CONFIG.get_or_init(|| {
        let config = RuntimeConfig::from_env();
        debug!(backend = %config.backend, max_bit_width = config.max_bit_width, "resolved runtime config");
        config
    })
}

/// Installs `config` for the rest of the process.
///
/// Fails if the configuration is invalid, or if one was already installed or
/// lazily resolved.
pub fn install(config: RuntimeConfig) -> Result<(), ConfigError> {
    config.validate()?;
    debug!(backend = %config.backend, max_bit_width = config.max_bit_width, "installing runtime config");
    CONFIG.set(config).map_err(|_| ConfigError::AlreadyInstalled)
}
