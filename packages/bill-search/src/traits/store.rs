//! Storage traits for chunk search and document metadata.
//!
//! The storage layer is split into focused traits:
//! - `ChunkIndex`: Nearest-neighbour search over precomputed chunk embeddings
//! - `DocumentStore`: Canonical metadata lookup
//! - `BillStore`: Composite trait combining both

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::document::{ChunkHit, DocumentDetail, DocumentId};

/// Similarity search over indexed chunks.
#[async_trait]
pub trait ChunkIndex: Send + Sync {
    /// Search for chunks similar to `embedding`.
    ///
    /// Returns at most `limit` hits sorted by similarity (highest first).
    /// With `min_similarity`, hits below the floor are left out.
    async fn search_similar(
        &self,
        embedding: &[f32],
        limit: usize,
        min_similarity: Option<f32>,
    ) -> Result<Vec<ChunkHit>>;
}

/// Lookup of canonical document metadata.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch details for many documents in one round trip.
    ///
    /// Ids with no stored metadata are absent from the map.
    async fn fetch_details(
        &self,
        ids: &[DocumentId],
    ) -> Result<HashMap<DocumentId, DocumentDetail>>;
}

/// Composite storage trait combining search and metadata.
///
/// This is the main trait used by the search engine.
pub trait BillStore: ChunkIndex + DocumentStore {}

// Blanket implementation: anything implementing both traits is a BillStore
impl<T: ChunkIndex + DocumentStore> BillStore for T {}

/// Cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
