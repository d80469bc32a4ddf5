//! OpenAI implementation of the AI trait.
//!
//! Uses gpt-4o-mini in JSON mode and text-embedding-3-small. Retries on
//! rate limits and server errors happen inside `openai-client`.
//!
//! # Example
//!
//! ```rust,ignore
//! use bill_search::ai::OpenAI;
//!
//! let ai = OpenAI::from_env()?.with_model("gpt-4o");
//! let engine = BillSearch::new(store, ai);
//! ```

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError, RetryPolicy};

use crate::error::{Result, SearchError};
use crate::traits::ai::AI;

/// OpenAI-based AI implementation.
#[derive(Clone)]
pub struct OpenAI {
    client: OpenAIClient,
    model: String,
    embedding_model: String,
}

impl OpenAI {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_client(OpenAIClient::new(api_key))
    }

    /// Wrap an existing client.
    pub fn from_client(client: OpenAIClient) -> Self {
        Self {
            client,
            model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        OpenAIClient::from_env()
            .map(Self::from_client)
            .map_err(|e| SearchError::Config(e.to_string()))
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the embedding model (default: text-embedding-3-small).
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    /// Replace the client's retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.client = self.client.with_retry_policy(retry);
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the embedding model name.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }
}

#[async_trait]
impl AI for OpenAI {
    async fn complete_json(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<Option<String>> {
        let request = ChatRequest::new(&self.model)
            .message(Message::system(system))
            .message(Message::user(user))
            .temperature(temperature)
            .json_object();

        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(|e| SearchError::AI(Box::new(e)))?;

        Ok(response.content)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.client
            .create_embeddings(texts, &self.embedding_model)
            .await
            .map_err(embedding_error)
    }
}

fn embedding_error(e: OpenAIError) -> SearchError {
    SearchError::Embedding(e.to_string())
}
