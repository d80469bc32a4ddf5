//! Per-query ranking state.

use indexmap::IndexSet;
use serde::Serialize;

use super::document::{DocumentDetail, DocumentId, Facet};

/// Everything one query learned about a document across all facet searches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub document_id: DocumentId,

    /// Highest similarity of any hit for this document
    pub max_similarity: f32,

    /// Facets whose search returned this document, in first-seen order
    pub matched_facets: IndexSet<Facet>,

    /// Chunk text of the hit that set `max_similarity`
    pub best_chunk_text: String,
}

impl Candidate {
    /// Fresh record: zero similarity, no facets, no snippet.
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            max_similarity: 0.0,
            matched_facets: IndexSet::new(),
            best_chunk_text: String::new(),
        }
    }

    /// Composite ranking score.
    pub fn composite_score(&self, facet_bonus: f32) -> f32 {
        self.max_similarity + facet_bonus * self.matched_facets.len() as f32
    }
}

/// A candidate together with the score it was ordered by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    pub score: f32,
}

/// A shortlisted candidate whose metadata was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedCandidate {
    pub candidate: Candidate,
    pub detail: DocumentDetail,
}
