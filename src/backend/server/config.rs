/**
 * Server Configuration
 *
 * Builds the `AppConfig` the server runs with and opens the store it
 * describes.
 *
 * # Configuration Sources
 *
 * Later sources override earlier ones:
 *
 * 1. Built-in defaults (development secret, port 8080, no database)
 * 2. The TOML file named by `CODENEST_CONFIG`, if set
 * 3. Environment variables, after `.env` is loaded by `dotenv`
 *
 * # Store Selection
 *
 * With a `database_url` the server uses PostgreSQL and runs the embedded
 * migrations. Without one it falls back to the in-memory store and logs a
 * warning; nothing survives a restart in that mode.
 */

use std::sync::Arc;

use crate::backend::store::{MemoryStore, PgStore, Store, StoreError};
use crate::shared::config::{AppConfig, ConfigError};

/// Environment variable naming the optional TOML configuration file
pub const CONFIG_PATH_VAR: &str = "CODENEST_CONFIG";

/// Load configuration from defaults, the optional file and the environment
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, or if any
/// value is out of range.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenv::dotenv().ok();

    let mut builder = AppConfig::builder();
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        tracing::info!("Loading configuration file {}", path);
        builder = builder.merge_file(&path)?;
    }
    let config = builder.merge_env(|key| std::env::var(key).ok())?.build()?;

    if config.uses_default_secret() {
        tracing::warn!("JWT_SECRET not set; using the development secret");
    }
    Ok(config)
}

/// Open the store described by `config`
///
/// # Errors
///
/// Returns `StoreError::Unavailable` if the database cannot be reached or
/// migrated. A configured database that fails is an error, not a silent
/// fallback to memory.
pub async fn load_store(config: &AppConfig) -> Result<Arc<dyn Store>, StoreError> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let store = PgStore::connect(url).await?;
            tracing::info!("Database connected and migrations applied");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set. Using the in-memory store; data will not persist.");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
