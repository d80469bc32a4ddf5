//! Facet-Driven Legislative Search
//!
//! Answers a free-text query, either a description of a person ("persona")
//! or a policy question ("topic"), with a short ranked list of bills. Each
//! bill comes with a one-sentence explanation and a 0-100 relevance score.
//!
//! # Design Philosophy
//!
//! - Similarity dominates, corroboration breaks ties: a bill matching more
//!   of the user's attributes beats a slightly closer single match
//! - Expensive steps see a bounded shortlist, never the full candidate set
//! - Generative output is parsed defensively; bad entries are dropped, never
//!   guessed at
//! - Only infrastructure failures are errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use bill_search::{BillSearch, MemoryStore, SearchConfig};
//! use bill_search::ai::OpenAI;
//!
//! let engine = BillSearch::with_config(store, OpenAI::from_env()?, SearchConfig::default())
//!     .with_embedding_cache();
//!
//! for result in engine.search("I'm a farmer worried about water rights").await? {
//!     println!("{} ({}): {}", result.document_id, result.relevance_score, result.summary_point);
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator abstractions (AI, ChunkIndex, DocumentStore, Reranker)
//! - [`types`] - Per-query data types and configuration
//! - [`pipeline`] - Pipeline stages and the [`BillSearch`] engine
//! - [`stores`] - Storage implementations (MemoryStore, PostgresStore)
//! - [`rerankers`] - HTTP reranker
//! - [`cache`] - Memo cache for provider outputs
//! - [`testing`] - Mock implementations for testing

pub mod cache;
pub mod error;
pub mod pipeline;
pub mod rerankers;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use cache::MemoCache;
pub use error::{Result, SearchError};
pub use traits::{
    ai::AI,
    reranker::Reranker,
    store::{BillStore, ChunkIndex, DocumentStore},
};
pub use types::{
    candidate::{Candidate, DetailedCandidate, RankedCandidate},
    config::{QueryStrategy, SearchConfig},
    document::{ChunkHit, DocumentDetail, DocumentId, Facet},
    result::SynthesizedResult,
};

// Re-export the engine
pub use pipeline::{BillSearch, EmptyReason, SearchOutcome, Terminal};

// Re-export stores
pub use stores::MemoryStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;

pub use rerankers::HttpReranker;

// Re-export testing utilities
pub use testing::{MockAI, MockReranker, MockStore, TestScenario};
