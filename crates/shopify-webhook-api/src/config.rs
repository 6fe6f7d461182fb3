//! Configuration types for the webhook receiver

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Prefix of environment variables overriding configuration values.
///
/// `SHOPIFY_WEBHOOK__SERVER__ENDPOINT_PATH=/hooks` sets
/// `server.endpoint_path`.
pub const ENV_PREFIX: &str = "SHOPIFY_WEBHOOK";

/// Receiver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReceiverConfig {
    /// HTTP route settings
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ReceiverConfig {
    /// Load configuration.
    ///
    /// Sources, later ones overriding earlier ones:
    ///  1. built-in defaults
    ///  2. the YAML file at `path`, when given (it must exist)
    ///  3. environment variables prefixed `SHOPIFY_WEBHOOK__`, with `__`
    ///     separating nested keys
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source cannot be read or a value
    /// has the wrong type, and [`ConfigError::Invalid`] if the merged
    /// configuration fails [`validate`](Self::validate).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            info!(path = %path.display(), "Loading receiver configuration file");
            builder = builder.add_source(
                config::File::from(path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ReceiverConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logging.validate()
    }
}

/// HTTP route configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Path the webhook route is mounted on
    pub endpoint_path: String,

    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.endpoint_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                message: format!(
                    "server.endpoint_path '{}' must start with '/'",
                    self.endpoint_path
                ),
            });
        }

        if self.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_size must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint_path: "/webhooks/shopify".to_string(),
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directives used when `RUST_LOG` is not set, e.g. `info` or
    /// `shopify_webhook_core=debug,info`
    pub level: String,

    /// Emit JSON structured logs
    pub json_format: bool,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        tracing_subscriber::EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| ConfigError::Invalid {
                message: format!("logging.level '{}' is not a valid filter: {}", self.level, e),
            })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
