//! AI trait for LLM operations.
//!
//! The pipeline needs two things from a model provider: a chat call that
//! is asked to answer in JSON, and batched text embeddings.

use async_trait::async_trait;

use crate::error::{Result, SearchError};

/// AI trait for LLM operations.
///
/// Implementations wrap specific providers and surface transport failures
/// as [`SearchError`]. They never interpret the model's answer; the pipeline
/// parses it defensively.
#[async_trait]
pub trait AI: Send + Sync {
    /// Run a system/user prompt pair in JSON mode.
    ///
    /// Returns the raw text of the answer, or `None` when the model
    /// produced no content.
    async fn complete_json(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<Option<String>>;

    /// Generate embeddings for multiple texts, one vector per input in order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::Embedding("provider returned no vector".into()))
    }
}
