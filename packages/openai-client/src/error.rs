//! Error types for OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// OpenAI client errors.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection refused, request timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limited or server-side failure (HTTP 429 / 5xx)
    #[error("Transient API error ({status}): {message}")]
    Transient { status: u16, message: String },

    /// API rejected the request (4xx other than 429)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OpenAIError {
    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Transient { .. })
    }

    /// Classify a non-success HTTP status.
    pub(crate) fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Self::Transient {
                status: status.as_u16(),
                message,
            }
        } else {
            Self::Api(format!("{}: {}", status, message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_classification() {
        assert!(OpenAIError::from_status(StatusCode::TOO_MANY_REQUESTS, "slow down".into()).is_retryable());
        assert!(OpenAIError::from_status(StatusCode::BAD_GATEWAY, "upstream".into()).is_retryable());
        assert!(!OpenAIError::from_status(StatusCode::UNAUTHORIZED, "bad key".into()).is_retryable());
        assert!(!OpenAIError::Parse("eof".into()).is_retryable());
        assert!(OpenAIError::Network("reset".into()).is_retryable());
    }
}
