// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component wiring shared by the subcommands.

use std::sync::Arc;

use folio_config::FolioConfig;
use folio_core::{EmbeddingAdapter, EmbeddingProvider, FolioError};
use folio_gateway::ModelGateway;
use folio_gemini::GeminiEmbedder;
use folio_memory::MemoryRanker;
use folio_openai::OpenAiEmbedder;
use folio_retrieval::{RetrievalService, VectorStore};
use folio_storage::Database;
use tracing::info;

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` wins when set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("folio={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

pub async fn open_database(config: &FolioConfig) -> Result<Database, FolioError> {
    Database::open_with(&config.storage.database_path, config.storage.wal_mode).await
}

/// The embedding backend for this process, chosen once from config.
pub fn build_embedder(config: &FolioConfig) -> Result<Arc<dyn EmbeddingAdapter>, FolioError> {
    let provider = config
        .embedding
        .resolve_provider(&config.provider)
        .ok_or_else(|| {
            FolioError::Config(
                "no embedding backend: set OPENAI_API_KEY, GOOGLE_API_KEY or embedding.provider"
                    .into(),
            )
        })?;
    info!(%provider, "embedding backend selected");
    Ok(match provider {
        EmbeddingProvider::OpenAi => {
            Arc::new(OpenAiEmbedder::new(&config.provider, &config.embedding)?)
        }
        EmbeddingProvider::Gemini => {
            Arc::new(GeminiEmbedder::new(&config.provider, &config.embedding)?)
        }
    })
}

/// Storage plus the services built on top of it.
pub struct Services {
    pub db: Database,
    pub retrieval: RetrievalService,
    pub memory: MemoryRanker,
}

impl Services {
    pub async fn open(config: &FolioConfig) -> Result<Self, FolioError> {
        let db = open_database(config).await?;
        let embedder = build_embedder(config)?;
        let store = VectorStore::new(db.clone(), Arc::clone(&embedder));
        Ok(Self {
            retrieval: RetrievalService::new(store, config.retrieval.clone()),
            memory: MemoryRanker::new(db.clone(), embedder),
            db,
        })
    }
}

pub fn gateway(config: &FolioConfig) -> Result<Arc<ModelGateway>, FolioError> {
    Ok(Arc::new(ModelGateway::from_config(&config.provider)?))
}
