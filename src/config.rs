//! Process configuration loaded from the environment.
//!
//! Settings are read from variables prefixed with `TASKTRACK_` (for example
//! `TASKTRACK_PORT`). The database URL is also accepted through the plain
//! `DATABASE_URL` variable, which takes effect when the prefixed form is
//! absent.

use serde::Deserialize;
use thiserror::Error;

/// Environment variable prefix for all settings.
pub const ENV_PREFIX: &str = "TASKTRACK";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration sources could not be read or deserialised.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A setting has an unusable value.
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Setting name.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Service configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Interface the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// `PostgreSQL` connection URL. The in-memory store is used when unset.
    #[serde(default)]
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    #[serde(default = "default_database_pool_size")]
    pub database_pool_size: u32,
    /// Path prefix under which the task routes are mounted.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Name reported by the root endpoint.
    #[serde(default = "default_project_name")]
    pub project_name: String,
    /// Comma-separated CORS origins; empty or `*` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            database_pool_size: default_database_pool_size(),
            api_prefix: default_api_prefix(),
            project_name: default_project_name(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable cannot be parsed or a value
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(
            config::Environment::with_prefix(ENV_PREFIX),
            std::env::var("DATABASE_URL").ok(),
        )
    }

    /// Loads configuration from a prefixed environment source.
    ///
    /// `fallback_database_url` is used only when the source has no
    /// `database_url` entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value cannot be parsed or fails
    /// validation.
    pub fn from_sources(
        environment: config::Environment,
        fallback_database_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(database_url) = fallback_database_url {
            builder = builder.set_default("database_url", database_url)?;
        }
        let settings = builder.add_source(environment).build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded.validated()
    }

    /// Checks cross-field constraints and normalises the API prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero pool size or an API prefix
    /// that does not start with `/`.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.database_pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: "database_pool_size",
                reason: "must be at least 1".to_owned(),
            });
        }

        let trimmed_prefix = self.api_prefix.trim_end_matches('/').to_owned();
        if !trimmed_prefix.is_empty() && !trimmed_prefix.starts_with('/') {
            return Err(ConfigError::Invalid {
                key: "api_prefix",
                reason: format!("'{}' must start with '/'", self.api_prefix),
            });
        }
        self.api_prefix = trimmed_prefix;
        Ok(self)
    }

    /// Returns the `host:port` socket address string.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the configured CORS origins, or `None` when any origin is
    /// allowed.
    #[must_use]
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            None
        } else {
            Some(origins)
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8000
}

const fn default_database_pool_size() -> u32 {
    10
}

fn default_api_prefix() -> String {
    "/api/v1".to_owned()
}

fn default_project_name() -> String {
    "Task Manager API".to_owned()
}

fn default_cors_origins() -> String {
    "*".to_owned()
}
