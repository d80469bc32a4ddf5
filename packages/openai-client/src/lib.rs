//! Pure OpenAI REST API client
//!
//! A clean, minimal client for the OpenAI API with no domain-specific logic.
//! Supports JSON-mode chat completions and batched embeddings. Rate limits,
//! server errors and connection failures are retried with exponential backoff.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! let response = client.chat_completion(
//!     ChatRequest::new("gpt-4o-mini")
//!         .message(Message::system("Reply with a JSON object"))
//!         .message(Message::user("List three colors"))
//!         .json_object(),
//! ).await?;
//!
//! let vectors = client
//!     .create_embeddings(&["first".into(), "second".into()], "text-embedding-3-small")
//!     .await?;
//! ```

pub mod error;
pub mod retry;
pub mod types;

pub use error::{OpenAIError, Result};
pub use retry::RetryPolicy;
pub use types::*;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

/// Pure OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completion API and get a response. The
    /// content is `None` when the model returned no text.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let chat_response: types::ChatResponseRaw = self
            .retry
            .run("chat_completion", || self.post_json("chat/completions", &request))
            .await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OpenAIError::Parse("No choices in OpenAI response".into()))?
            .message
            .content;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis() as u64,
            empty = content.is_none(),
            "OpenAI chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }

    /// Create embeddings for a batch of texts in one request.
    ///
    /// Returns one vector per input, in input order.
    pub async fn create_embeddings(&self, texts: &[String], model: &str) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = types::EmbeddingRequest { model, input: texts };

        let response: types::EmbeddingResponse = self
            .retry
            .run("create_embeddings", || self.post_json("embeddings", &request))
            .await?;

        response.into_ordered(texts.len()).ok_or_else(|| {
            OpenAIError::Parse(format!(
                "Embedding response does not cover {} inputs",
                texts.len()
            ))
        })
    }

    /// One POST attempt, classified for the retry policy.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http_client
            .post(format!("{}/{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(path, error = %e, "OpenAI request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(path, status = %status, error = %error_text, "OpenAI API error");
            return Err(OpenAIError::from_status(status, error_text));
        }

        response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))
    }
}
