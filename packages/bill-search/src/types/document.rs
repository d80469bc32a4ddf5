//! Search-side view of indexed documents.

use serde::{Deserialize, Serialize};

/// Primary key of a document in the store.
pub type DocumentId = i64;

/// A search facet: one atomic attribute or sub-question derived from a query.
pub type Facet = String;

/// One nearest-neighbour result from the chunk index.
///
/// The facet that produced a hit is the key it is filed under in
/// [`HitsByFacet`](crate::pipeline::search::HitsByFacet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkHit {
    /// Parent document of the chunk
    pub document_id: DocumentId,

    /// Cosine similarity to the query vector (higher is closer)
    pub similarity: f32,

    /// Text of the matching chunk
    pub chunk_text: String,
}

impl ChunkHit {
    pub fn new(document_id: DocumentId, similarity: f32, chunk_text: impl Into<String>) -> Self {
        Self {
            document_id,
            similarity,
            chunk_text: chunk_text.into(),
        }
    }
}

/// Canonical metadata for a shortlisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetail {
    pub document_id: DocumentId,

    /// Short identifier such as "H.R. 1234", when the store has one
    pub short_name: Option<String>,

    pub title: String,

    /// Plain-language summary of what the document does
    pub summary: String,
}

impl DocumentDetail {
    pub fn new(
        document_id: DocumentId,
        title: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            document_id,
            short_name: None,
            title: title.into(),
            summary: summary.into(),
        }
    }

    /// Set the short identifier.
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }
}
