use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::completions::CompletionClient;
use crate::config::Config;
use crate::database::Database;
use crate::embeddings::EmbeddingClient;
use crate::ingest::Ingestor;
use crate::memory::{InMemorySessionStore, SessionStore};
use crate::vector_store::VectorStoreClient;

/// Shared application state handed to every handler.
pub struct AppState {
    pub config: Config,
    pub database: Database,
    pub sessions: Arc<dyn SessionStore>,
    pub embeddings: EmbeddingClient,
    pub completions: CompletionClient,
    pub vectors: VectorStoreClient,
    pub ingestor: Ingestor,
}

impl AppState {
    #[inline]
    pub async fn new(config: Config) -> Result<Self> {
        config
            .ensure_secrets()
            .context("Provider credentials are missing")?;

        tokio::fs::create_dir_all(&config.base_dir)
            .await
            .context("Failed to create data directory")?;
        tokio::fs::create_dir_all(config.upload_dir_path())
            .await
            .context("Failed to create upload directory")?;

        let database = Database::new(config.database_path())
            .await
            .context("Failed to initialize database")?;

        info!("Application state initialized");

        let embeddings = EmbeddingClient::new(&config);
        let vectors = VectorStoreClient::new(&config);
        let completions = CompletionClient::new(&config);
        let ingestor = Ingestor::new(embeddings.clone(), vectors.clone());

        Ok(Self {
            config,
            database,
            sessions: Arc::new(InMemorySessionStore::new()),
            embeddings,
            completions,
            vectors,
            ingestor,
        })
    }
}
