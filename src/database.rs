//! MongoDB connection management

use std::time::Duration;

use bson::doc;
use mongodb::{options::ClientOptions, Client, Database};

use crate::config::DatabaseConfig;

/// Owns the MongoDB client for the lifetime of the process.
///
/// Built explicitly in `main` and handed to the repository; nothing else holds
/// a global connection.
pub struct MongoConnector {
    config: DatabaseConfig,
    client: Option<Client>,
}

impl MongoConnector {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config, client: None }
    }

    /// Connect and verify the server answers, retrying with exponential backoff
    pub async fn connect(&mut self) -> mongodb::error::Result<Database> {
        let mut options = ClientOptions::parse(&self.config.uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.max_pool_size = Some(self.config.max_pool_size);
        options.min_pool_size = Some(self.config.min_pool_size);

        let client = Client::with_options(options)?;
        let database = client.database(&self.config.name);

        let attempts = self.config.connect_max_retries.max(1);
        let mut delay = Duration::from_millis(self.config.connect_retry_interval_ms);

        let mut attempt = 1;
        loop {
            match database.run_command(doc! { "ping": 1 }, None).await {
                Ok(_) => {
                    tracing::info!("Connected to MongoDB database {}", self.config.name);
                    self.client = Some(client);
                    return Ok(database);
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        "MongoDB connection attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt,
                        attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!("MongoDB connection failed after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    /// Close all pooled connections
    pub async fn disconnect(&mut self) {
        if let Some(client) = self.client.take() {
            client.shutdown().await;
            tracing::info!("MongoDB connection closed");
        }
    }
}
