//! Core trait abstractions for the search engine.
//!
//! These traits define the external collaborators the pipeline consumes:
//! a generative model with embeddings, a chunk index with document
//! metadata, and an optional pairwise reranker.

pub mod ai;
pub mod reranker;
pub mod store;
