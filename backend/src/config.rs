use serde::Deserialize;

/// Runtime configuration, loaded from the environment (`.env` supported).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// PostgreSQL connection string for contracts and billings.
    pub database_url: String,
    /// MongoDB connection string for customers and vehicles.
    pub document_store_url: String,
    /// MongoDB database name.
    pub document_store_name: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8000)?
            .set_default("document_store_name", "easyloc")?
            .add_source(config::Environment::default())
            .build()?;

        config.try_deserialize()
    }
}
