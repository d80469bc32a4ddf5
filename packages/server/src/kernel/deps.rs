//! Server dependencies for handlers (using traits for testability)

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bill_search::ai::OpenAI;
use bill_search::{BillSearch, HttpReranker, PostgresStore};
use secrecy::{ExposeSecret, SecretString};

use crate::config::Config;
use crate::kernel::BaseBillSearch;

/// Concrete engine used in production
pub type ProductionSearch = BillSearch<OpenAI, PostgresStore>;

/// Dependencies shared by every request
#[derive(Clone)]
pub struct ServerDeps {
    pub searcher: Arc<dyn BaseBillSearch>,
    /// Expected bearer token
    pub api_key: Arc<SecretString>,
    pub pipeline_timeout: Duration,
}

impl ServerDeps {
    pub fn new(
        searcher: Arc<dyn BaseBillSearch>,
        api_key: SecretString,
        pipeline_timeout: Duration,
    ) -> Self {
        Self {
            searcher,
            api_key: Arc::new(api_key),
            pipeline_timeout,
        }
    }
}

/// Wire the engine to Postgres, OpenAI and (when configured) the reranker.
pub async fn build_search_engine(config: &Config) -> Result<ProductionSearch> {
    let store = PostgresStore::new(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let ai = OpenAI::new(config.openai_api_key.expose_secret())
        .with_model(config.llm_model.clone())
        .with_embedding_model(config.embedding_model.clone());

    let mut engine =
        BillSearch::with_config(store, ai, config.search.clone()).with_embedding_cache();

    if let Some(rerank) = &config.rerank {
        let mut reranker = HttpReranker::new(rerank.url.clone(), rerank.model.clone());
        if let Some(key) = &rerank.api_key {
            reranker = reranker.with_api_key(key.expose_secret());
        }
        tracing::info!(model = %rerank.model, "Reranker enabled");
        engine = engine.with_reranker(Arc::new(reranker));
    }

    Ok(engine)
}
