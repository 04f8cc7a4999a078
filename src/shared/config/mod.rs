//! Application configuration module
//!
//! `AppConfig` is assembled in layers: built-in defaults, then an optional
//! TOML file, then environment variables. Each layer only overrides the keys
//! it sets. The final value is validated once in `AppConfigBuilder::build`.
//!
//! ```rust
//! use codenest::shared::config::AppConfig;
//!
//! let config = AppConfig::builder()
//!     .merge_toml("port = 9000\nlatest_limit = 5")
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! assert_eq!(config.port, 9000);
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BCRYPT_COST: u32 = 12;
pub const DEFAULT_SESSION_COOKIE: &str = "session";
pub const DEFAULT_LATEST_LIMIT: usize = 10;
pub const DEFAULT_JWT_SECRET: &str = "codenest-development-secret";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port the HTTP server binds to
    pub port: u16,
    /// PostgreSQL URL; `None` selects the in-memory store
    pub database_url: Option<String>,
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    /// Name of the session cookie
    pub session_cookie: String,
    /// Number of snippets returned by the latest listing
    pub latest_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            latest_limit: DEFAULT_LATEST_LIMIT,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder seeded with defaults
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("jwt_secret"));
        }
        if self.session_cookie.is_empty() {
            return Err(ConfigError::MissingValue("session_cookie"));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "bcrypt_cost",
                value: self.bcrypt_cost.to_string(),
            });
        }
        if self.latest_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "latest_limit",
                value: "0".to_string(),
            });
        }
        if let Some(url) = &self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        Ok(())
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

/// Keys accepted in the TOML file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    port: Option<u16>,
    database_url: Option<String>,
    jwt_secret: Option<String>,
    bcrypt_cost: Option<u32>,
    session_cookie: Option<String>,
    latest_limit: Option<usize>,
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.config.bcrypt_cost = cost;
        self
    }

    pub fn session_cookie(mut self, name: impl Into<String>) -> Self {
        self.config.session_cookie = name.into();
        self
    }

    pub fn latest_limit(mut self, limit: usize) -> Self {
        self.config.latest_limit = limit;
        self
    }

    /// Override with the keys present in a TOML document
    pub fn merge_toml(mut self, text: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(text)?;
        let c = &mut self.config;
        if let Some(v) = file.port {
            c.port = v;
        }
        if let Some(v) = file.database_url {
            c.database_url = Some(v);
        }
        if let Some(v) = file.jwt_secret {
            c.jwt_secret = v;
        }
        if let Some(v) = file.bcrypt_cost {
            c.bcrypt_cost = v;
        }
        if let Some(v) = file.session_cookie {
            c.session_cookie = v;
        }
        if let Some(v) = file.latest_limit {
            c.latest_limit = v;
        }
        Ok(self)
    }

    /// Override with a TOML file on disk
    pub fn merge_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.merge_toml(&text)
    }

    /// Override from environment-style variables
    ///
    /// `lookup` is usually `|k| std::env::var(k).ok()`; tests pass a map.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let c = &mut self.config;
        if let Some(v) = lookup("SERVER_PORT") {
            c.port = parse_var("SERVER_PORT", &v)?;
        }
        if let Some(v) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            c.database_url = Some(v);
        }
        if let Some(v) = lookup("JWT_SECRET") {
            c.jwt_secret = v;
        }
        if let Some(v) = lookup("BCRYPT_COST") {
            c.bcrypt_cost = parse_var("BCRYPT_COST", &v)?;
        }
        if let Some(v) = lookup("SESSION_COOKIE") {
            c.session_cookie = v;
        }
        if let Some(v) = lookup("LATEST_LIMIT") {
            c.latest_limit = parse_var("LATEST_LIMIT", &v)?;
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid database URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
