use std::time::{Duration, Instant};

use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};

use crate::{config::Config, errors::AppResult, models::domain::GeneratedContent};

const APP_NAME: &str = "study-forge";
const MAX_POOL_SIZE: u32 = 10;
const MIN_POOL_SIZE: u32 = 2;
const TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the study material database.
#[derive(Clone)]
pub struct Database {
    client: Client,
    database: mongodb::Database,
    content_collection: String,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ClientOptions::parse(&config.mongo_conn_string).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        options.max_pool_size = Some(MAX_POOL_SIZE);
        options.min_pool_size = Some(MIN_POOL_SIZE);
        options.connect_timeout = Some(TIMEOUT);
        options.server_selection_timeout = Some(TIMEOUT);

        let client = Client::with_options(options)?;
        let db = Self {
            database: client.database(&config.mongo_db_name),
            client,
            content_collection: config.content_collection.clone(),
        };

        let latency = db.ping().await?;
        log::info!(
            "Connected to MongoDB database {} ({} ms)",
            config.mongo_db_name,
            latency.as_millis()
        );
        Ok(db)
    }

    /// Collection holding generated study material records.
    pub fn content(&self) -> Collection<GeneratedContent> {
        self.database.collection(&self.content_collection)
    }

    /// Round-trip time of an admin `ping`.
    pub async fn ping(&self) -> AppResult<Duration> {
        let started = Instant::now();
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(started.elapsed())
    }
}
