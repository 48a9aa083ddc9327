//! Configuration management for the bookstore server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Include error debug details in responses (development only)
    pub expose_error_details: bool,
}

/// Which store backs the book repository
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub uri: String,
    pub name: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    /// Initial delay between connection attempts, doubled on each retry
    pub connect_retry_interval_ms: u64,
    pub connect_max_retries: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_for_mode(env::var("RUN_MODE").ok().as_deref())
    }

    /// Load configuration for an explicit run mode. Without one only
    /// `config/default` applies, so development settings never leak into a
    /// deployment that forgot to set `RUN_MODE`.
    pub fn load_for_mode(run_mode: Option<&str>) -> Result<Self, ConfigError> {
        // Start with default configuration
        let mut builder = Config::builder().add_source(File::with_name("config/default").required(false));

        // Layer on the environment-specific file
        if let Some(mode) = run_mode {
            builder = builder.add_source(File::with_name(&format!("config/{}", mode)).required(false));
        }

        let config = builder
            // Add environment variables (with prefix BOOKSTORE_)
            .add_source(
                Environment::with_prefix("BOOKSTORE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.uri", env::var("MONGO_URI").ok())?
            .set_override_option("database.name", env::var("DB_NAME").ok())?
            .set_override_option(
                "server.port",
                env::var("PORT").ok().and_then(|p| p.parse::<i64>().ok()),
            )?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            expose_error_details: false,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Mongo,
            uri: "mongodb://localhost:27017".to_string(),
            name: "bookstore".to_string(),
            max_pool_size: 10,
            min_pool_size: 0,
            connect_retry_interval_ms: 5000,
            connect_max_retries: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
