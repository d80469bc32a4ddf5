//! Hosted cross-encoder reranker.
//!
//! Speaks the `POST /rerank` shape shared by Cohere, Jina and most
//! self-hosted rerank servers.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SearchError};
use crate::traits::reranker::Reranker;

#[derive(Debug, Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: &'a [&'a str],
    top_n: usize,
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    results: Vec<RerankResult>,
}

#[derive(Debug, Deserialize)]
struct RerankResult {
    index: usize,
    relevance_score: f32,
}

/// Reranker backed by an HTTP rerank endpoint.
pub struct HttpReranker {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
}

impl HttpReranker {
    /// Create a reranker for `base_url` (the `/rerank` path is appended).
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            model: model.into(),
        }
    }

    /// Send a bearer token with each request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Reranker for HttpReranker {
    async fn score(&self, query: &str, passages: &[&str]) -> Result<Vec<f32>> {
        if passages.is_empty() {
            return Ok(Vec::new());
        }

        let request = RerankRequest {
            model: &self.model,
            query,
            documents: passages,
            top_n: passages.len(),
        };

        let mut builder = self
            .client
            .post(format!("{}/rerank", self.base_url))
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key.expose_secret()));
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Rerank request failed");
            SearchError::Rerank(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Rerank API error");
            return Err(SearchError::Rerank(format!("{}: {}", status, error_text)));
        }

        let body: RerankResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Rerank(e.to_string()))?;

        debug!(passages = passages.len(), scored = body.results.len(), "Reranked passages");
        align_scores(body.results, passages.len())
    }
}

/// Scores in passage order; every passage must be scored exactly once.
fn align_scores(results: Vec<RerankResult>, expected: usize) -> Result<Vec<f32>> {
    let mut scores: Vec<Option<f32>> = vec![None; expected];
    for r in results {
        let slot = scores
            .get_mut(r.index)
            .ok_or_else(|| SearchError::Rerank(format!("index {} out of range", r.index)))?;
        if slot.replace(r.relevance_score).is_some() {
            return Err(SearchError::Rerank(format!("index {} scored twice", r.index)));
        }
    }
    scores
        .into_iter()
        .enumerate()
        .map(|(i, s)| s.ok_or_else(|| SearchError::Rerank(format!("passage {} not scored", i))))
        .collect()
}
