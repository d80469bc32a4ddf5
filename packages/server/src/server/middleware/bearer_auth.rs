use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::server::error::ApiError;

/// Bearer token authentication middleware
///
/// Rejects the request with 401 unless the Authorization header carries
/// `Bearer <API_KEY>`.
pub async fn bearer_auth_middleware(
    api_key: Arc<SecretString>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !is_authorized(&request, &api_key) {
        debug!("Rejected request with missing or invalid bearer token");
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}

/// Check the bearer token on a request
fn is_authorized(request: &Request<Body>, api_key: &SecretString) -> bool {
    extract_bearer(request)
        .map(|token| token == api_key.expose_secret())
        .unwrap_or(false)
}

fn extract_bearer(request: &Request<Body>) -> Option<&str> {
    let auth_str = request.headers().get(AUTHORIZATION)?.to_str().ok()?;

    // Scheme is case-insensitive
    let (scheme, token) = auth_str.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretString {
        SecretString::from("test_key".to_string())
    }

    fn request_with(header: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder();
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_valid_bearer() {
        assert!(is_authorized(&request_with(Some("Bearer test_key")), &key()));
    }

    #[test]
    fn test_lowercase_scheme() {
        assert!(is_authorized(&request_with(Some("bearer test_key")), &key()));
    }

    #[test]
    fn test_wrong_token() {
        assert!(!is_authorized(&request_with(Some("Bearer other")), &key()));
    }

    #[test]
    fn test_raw_token_without_scheme() {
        assert!(!is_authorized(&request_with(Some("test_key")), &key()));
    }

    #[test]
    fn test_basic_scheme() {
        assert!(!is_authorized(&request_with(Some("Basic test_key")), &key()));
    }

    #[test]
    fn test_no_auth_header() {
        assert!(!is_authorized(&request_with(None), &key()));
    }

    #[test]
    fn test_empty_token() {
        assert!(!is_authorized(&request_with(Some("Bearer ")), &key()));
    }
}
