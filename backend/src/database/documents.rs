use bson::doc;
use mongodb::{Client, Database as MongoDatabase};
use tracing::info;

use crate::error::AppError;

/// Document store (customers and vehicles).
#[derive(Clone)]
pub struct DocumentStore {
    database: MongoDatabase,
}

impl DocumentStore {
    /// Connect and verify the deployment answers a ping.
    pub async fn connect(url: &str, name: &str) -> Result<Self, AppError> {
        let client = Client::with_uri_str(url).await?;
        let database = client.database(name);
        database.run_command(doc! { "ping": 1 }, None).await?;
        info!("Connected to document store '{}'", name);

        Ok(Self { database })
    }

    /// Get the database handle
    pub fn handle(&self) -> &MongoDatabase {
        &self.database
    }
}
