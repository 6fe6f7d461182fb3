//! Tracing subscriber setup for host applications.

use crate::{config::LoggingConfig, errors::ConfigError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the log filter: `RUST_LOG` when set, otherwise `config.level`.
pub fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global tracing subscriber.
///
/// Call once at startup, before the first request is handled.
///
/// # Errors
///
/// Returns [`ConfigError::Logging`] if a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ConfigError> {
    let registry = tracing_subscriber::registry().with(build_env_filter(config));

    let result = if config.json_format {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| ConfigError::Logging {
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
