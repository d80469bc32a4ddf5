//! Typed errors for the search engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Only infrastructure failures are errors. Vague queries, empty searches
//! and malformed model output are recovered inside the pipeline and end in
//! an empty result instead.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Generative model unreachable or rejected the request
    #[error("AI service error: {0}")]
    AI(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Embedding provider failed
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Vector index or document store failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Reranker endpoint failed
    #[error("rerank error: {0}")]
    Rerank(String),

    /// Whole pipeline exceeded the caller's deadline
    #[error("search timed out after {0:?}")]
    Timeout(Duration),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
