//! Test harness driving the router in-process with `tower::ServiceExt::oneshot`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bill_search::{SearchError, SynthesizedResult};
use search_api::kernel::{BaseBillSearch, ServerDeps};
use search_api::server::build_app;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";

/// What the stub searcher answers with
pub enum StubReply {
    Results(Vec<SynthesizedResult>),
    Fail(fn() -> SearchError),
}

/// Searcher that returns a scripted reply and records the queries it saw.
pub struct StubSearcher {
    reply: StubReply,
    queries: Mutex<Vec<(String, Duration)>>,
}

impl StubSearcher {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<(String, Duration)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseBillSearch for StubSearcher {
    async fn search(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<Vec<SynthesizedResult>, SearchError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), timeout));

        match &self.reply {
            StubReply::Results(results) => Ok(results.clone()),
            StubReply::Fail(make) => Err(make()),
        }
    }
}

/// Router wired to a test searcher and the test API key
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new(searcher: Arc<dyn BaseBillSearch>) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let deps = ServerDeps::new(
            searcher,
            SecretString::from(TEST_API_KEY.to_string()),
            Duration::from_secs(60),
        );

        Self {
            router: build_app(deps),
        }
    }

    /// POST `/search_bills` with an optional Authorization header value.
    pub async fn search(&self, auth: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/search_bills")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

pub fn bearer() -> String {
    format!("Bearer {}", TEST_API_KEY)
}

pub fn result(document_id: i64, summary_point: &str, relevance_score: u8) -> SynthesizedResult {
    SynthesizedResult {
        document_id,
        summary_point: summary_point.to_string(),
        relevance_score,
    }
}
