//! Search pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Decomposition of the query into facets or sub-questions
//! - Concurrent facet search against the chunk index
//! - Aggregation of hits into per-document candidates
//! - Composite ranking, or pairwise reranking on the topic path
//! - Batched synthesis and final ordering

pub mod aggregate;
pub mod decompose;
pub mod engine;
pub mod finalize;
pub mod json;
pub mod prompts;
pub mod rank;
pub mod rerank;
pub mod search;
pub mod synthesize;

pub use aggregate::{aggregate, Candidates};
pub use decompose::{decompose, parse_facets};
pub use engine::{BillSearch, EmptyReason, SearchOutcome, Terminal};
pub use finalize::finalize;
pub use json::{first_array, MalformedOutput};
pub use rank::rank;
pub use rerank::rerank;
pub use search::{search_facets, HitsByFacet};
pub use synthesize::{parse_synthesis, synthesize};
