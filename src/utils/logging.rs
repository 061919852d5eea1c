//! Structured logging setup.
//!
//! The codec only emits `tracing` events. Binaries and tests that want to see
//! them call [`init_logging`] once at startup.

use crate::config::LoggingConfig;
use crate::error::{constants, HeaderError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global subscriber for `config`.
///
/// `RUST_LOG` takes precedence over the configured level. Returns `Ok(false)`
/// if a subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.log_level.as_str().to_ascii_lowercase())
            .map_err(|e| HeaderError::ConfigError(format!("{}: {e}", constants::ERR_LOG_FILTER)))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json_format {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
            .is_ok()
    } else {
        registry
            .with(fmt::layer().with_target(true))
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::debug!(app = %config.app_name, "Logging initialized");
    }
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_a_noop() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config).unwrap();
        assert!(!init_logging(&config).unwrap());
    }
}
