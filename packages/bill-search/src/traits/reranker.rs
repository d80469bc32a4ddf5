//! Pairwise relevance model.

use async_trait::async_trait;

use crate::error::Result;

/// Scores (query, passage) pairs directly, without vectors.
///
/// Used on the topic path to replace the composite ranker's ordering.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// One score per passage, aligned with `passages`. Higher is more relevant.
    async fn score(&self, query: &str, passages: &[&str]) -> Result<Vec<f32>>;
}
