//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! an optional `config/default.toml`, an optional explicit file, and
//! `DIRVIEW__`-prefixed environment variables. Each sub-module represents a
//! logical configuration section.

pub mod app;
pub mod auth;
pub mod logging;
pub mod session;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig, WebConfig};
pub use self::auth::{AuthConfig, LoginThrottleConfig, UserEntry};
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "DIRVIEW";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Session lifetime settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// User registry and login settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Browsable directory settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Static web asset settings.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `config/default.toml` (if present), the explicit file at
    /// `path` (required when given), and environment variables prefixed
    /// with `DIRVIEW__`.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
