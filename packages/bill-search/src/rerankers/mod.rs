//! Reranker implementations.

pub mod http;

pub use http::HttpReranker;
