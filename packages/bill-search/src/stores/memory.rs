//! In-memory storage implementation for testing and development.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::store::{cosine_similarity, ChunkIndex, DocumentStore};
use crate::types::document::{ChunkHit, DocumentDetail, DocumentId};

struct StoredChunk {
    document_id: DocumentId,
    text: String,
    embedding: Vec<f32>,
}

/// In-memory chunk index and document metadata.
///
/// Searches are brute-force cosine similarity. Useful for tests and small
/// local corpora; data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    chunks: Vec<StoredChunk>,
    documents: HashMap<DocumentId, DocumentDetail>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add document metadata.
    pub fn with_document(mut self, detail: DocumentDetail) -> Self {
        self.insert_document(detail);
        self
    }

    /// Add an embedded chunk.
    pub fn with_chunk(
        mut self,
        document_id: DocumentId,
        text: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        self.insert_chunk(document_id, text, embedding);
        self
    }

    pub fn insert_document(&mut self, detail: DocumentDetail) {
        self.documents.insert(detail.document_id, detail);
    }

    pub fn insert_chunk(
        &mut self,
        document_id: DocumentId,
        text: impl Into<String>,
        embedding: Vec<f32>,
    ) {
        self.chunks.push(StoredChunk {
            document_id,
            text: text.into(),
            embedding,
        });
    }

    /// Get the number of stored chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Get the number of stored documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

#[async_trait]
impl ChunkIndex for MemoryStore {
    async fn search_similar(
        &self,
        embedding: &[f32],
        limit: usize,
        min_similarity: Option<f32>,
    ) -> Result<Vec<ChunkHit>> {
        let mut hits: Vec<ChunkHit> = self
            .chunks
            .iter()
            .map(|c| {
                // Similarity is reported in [0, 1]
                let similarity = cosine_similarity(embedding, &c.embedding).clamp(0.0, 1.0);
                ChunkHit::new(c.document_id, similarity, c.text.clone())
            })
            .filter(|h| min_similarity.map_or(true, |min| h.similarity >= min))
            .collect();

        hits.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_details(
        &self,
        ids: &[DocumentId],
    ) -> Result<HashMap<DocumentId, DocumentDetail>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.documents.get(id).map(|d| (*id, d.clone())))
            .collect())
    }
}
