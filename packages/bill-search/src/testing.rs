//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the search engine
//! without making real AI, database or reranker calls.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{Result, SearchError};
use crate::traits::{
    ai::AI,
    reranker::Reranker,
    store::{ChunkIndex, DocumentStore},
};
use crate::types::document::{ChunkHit, DocumentDetail, DocumentId, Facet};

/// A mock AI implementation for testing.
///
/// JSON completions are served from a FIFO queue in the order they were
/// added; an exhausted queue answers `None`. Embeddings are predefined per
/// text or derived deterministically from the text.
#[derive(Default)]
pub struct MockAI {
    /// Queued JSON completions
    completions: Arc<RwLock<VecDeque<Option<String>>>>,

    /// Predefined embeddings by text
    embeddings: Arc<RwLock<HashMap<String, Vec<f32>>>>,

    /// Default embedding dimension
    embedding_dim: usize,

    /// Simulated provider outages
    fail_completions: bool,
    fail_embeddings: bool,

    /// Simulated latency per call
    delay: Option<Duration>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockAICall>>>,
}

/// Record of a call made to the mock AI.
#[derive(Debug, Clone, PartialEq)]
pub enum MockAICall {
    Complete {
        system: String,
        user: String,
        temperature: f32,
    },
    Embed {
        count: usize,
    },
}

impl MockAI {
    /// Create a new mock AI with default behavior.
    pub fn new() -> Self {
        Self {
            embedding_dim: 64,
            ..Default::default()
        }
    }

    /// Set the embedding dimension.
    pub fn with_embedding_dim(mut self, dim: usize) -> Self {
        self.embedding_dim = dim;
        self
    }

    /// Queue a JSON completion.
    pub fn with_completion(self, raw: impl Into<String>) -> Self {
        self.completions.write().unwrap().push_back(Some(raw.into()));
        self
    }

    /// Queue a completion with no content.
    pub fn with_empty_completion(self) -> Self {
        self.completions.write().unwrap().push_back(None);
        self
    }

    /// Add a predefined embedding for text.
    pub fn with_embedding(self, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        self.embeddings
            .write()
            .unwrap()
            .insert(text.into(), embedding);
        self
    }

    /// Fail every call as if the provider were down.
    pub fn failing(mut self) -> Self {
        self.fail_completions = true;
        self.fail_embeddings = true;
        self
    }

    /// Fail embedding calls only.
    pub fn failing_embeddings(mut self) -> Self {
        self.fail_embeddings = true;
        self
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockAICall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of embedding calls made.
    pub fn embed_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockAICall::Embed { .. }))
            .count()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    /// Generate a deterministic embedding based on text.
    fn generate_deterministic_embedding(&self, text: &str) -> Vec<f32> {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let hash = hasher.finalize();

        (0..self.embedding_dim)
            .map(|i| {
                let byte = hash[i % 32] as f32;
                (byte / 127.5) - 1.0
            })
            .collect()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AI for MockAI {
    async fn complete_json(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<Option<String>> {
        self.calls.write().unwrap().push(MockAICall::Complete {
            system: system.to_string(),
            user: user.to_string(),
            temperature,
        });
        self.pause().await;

        if self.fail_completions {
            return Err(SearchError::AI("mock provider unavailable".into()));
        }

        Ok(self.completions.write().unwrap().pop_front().flatten())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls
            .write()
            .unwrap()
            .push(MockAICall::Embed { count: texts.len() });
        self.pause().await;

        if self.fail_embeddings {
            return Err(SearchError::Embedding("mock provider unavailable".into()));
        }

        let embeddings = self.embeddings.read().unwrap();
        Ok(texts
            .iter()
            .map(|t| {
                embeddings
                    .get(t)
                    .cloned()
                    .unwrap_or_else(|| self.generate_deterministic_embedding(t))
            })
            .collect())
    }
}

/// A recorded chunk search.
#[derive(Debug, Clone, PartialEq)]
pub struct MockSearch {
    pub embedding: Vec<f32>,
    pub limit: usize,
    pub min_similarity: Option<f32>,
}

/// A mock store for testing.
///
/// Hits are scripted per query vector; unknown vectors find nothing.
#[derive(Default)]
pub struct MockStore {
    hits: Vec<(Vec<f32>, Vec<ChunkHit>)>,
    documents: HashMap<DocumentId, DocumentDetail>,
    fail: bool,
    searches: Arc<RwLock<Vec<MockSearch>>>,
    detail_lookups: Arc<RwLock<Vec<Vec<DocumentId>>>>,
}

impl MockStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `hits` for searches with exactly this vector.
    pub fn with_hits(mut self, embedding: Vec<f32>, hits: Vec<ChunkHit>) -> Self {
        self.hits.push((embedding, hits));
        self
    }

    /// Add document metadata.
    pub fn with_document(mut self, detail: DocumentDetail) -> Self {
        self.documents.insert(detail.document_id, detail);
        self
    }

    /// Fail every call as if the database were down.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Searches made so far.
    pub fn searches(&self) -> Vec<MockSearch> {
        self.searches.read().unwrap().clone()
    }

    /// Id batches passed to `fetch_details`.
    pub fn detail_lookups(&self) -> Vec<Vec<DocumentId>> {
        self.detail_lookups.read().unwrap().clone()
    }
}

#[async_trait]
impl ChunkIndex for MockStore {
    async fn search_similar(
        &self,
        embedding: &[f32],
        limit: usize,
        min_similarity: Option<f32>,
    ) -> Result<Vec<ChunkHit>> {
        self.searches.write().unwrap().push(MockSearch {
            embedding: embedding.to_vec(),
            limit,
            min_similarity,
        });

        if self.fail {
            return Err(SearchError::Storage("mock store unavailable".into()));
        }

        Ok(self
            .hits
            .iter()
            .find(|(e, _)| e.as_slice() == embedding)
            .map(|(_, hits)| {
                let mut matched: Vec<ChunkHit> = hits
                    .iter()
                    .filter(|h| min_similarity.map_or(true, |min| h.similarity >= min))
                    .cloned()
                    .collect();
                // Same contract as a real index: highest similarity first
                matched.sort_by(|a, b| {
                    b.similarity
                        .partial_cmp(&a.similarity)
                        .unwrap_or(Ordering::Equal)
                });
                matched.truncate(limit);
                matched
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn fetch_details(
        &self,
        ids: &[DocumentId],
    ) -> Result<HashMap<DocumentId, DocumentDetail>> {
        self.detail_lookups.write().unwrap().push(ids.to_vec());

        if self.fail {
            return Err(SearchError::Storage("mock store unavailable".into()));
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.documents.get(id).map(|d| (*id, d.clone())))
            .collect())
    }
}

/// A mock reranker scoring passages from a lookup table (default 0.0).
#[derive(Default)]
pub struct MockReranker {
    scores: HashMap<String, f32>,
    fail: bool,
    truncate: bool,
    calls: Arc<RwLock<Vec<Vec<String>>>>,
}

impl MockReranker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score for a passage.
    pub fn with_score(mut self, passage: impl Into<String>, score: f32) -> Self {
        self.scores.insert(passage.into(), score);
        self
    }

    /// Fail every call.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Return one score fewer than asked for.
    pub fn truncating(mut self) -> Self {
        self.truncate = true;
        self
    }

    /// Passage lists received so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Reranker for MockReranker {
    async fn score(&self, _query: &str, passages: &[&str]) -> Result<Vec<f32>> {
        self.calls
            .write()
            .unwrap()
            .push(passages.iter().map(|p| p.to_string()).collect());

        if self.fail {
            return Err(SearchError::Rerank("mock reranker unavailable".into()));
        }

        let mut scores: Vec<f32> = passages
            .iter()
            .map(|p| self.scores.get(*p).copied().unwrap_or(0.0))
            .collect();
        if self.truncate {
            scores.pop();
        }
        Ok(scores)
    }
}

/// Builder for end-to-end test scenarios.
///
/// Each declared facet gets a one-hot embedding, so hits can be scripted
/// per facet. The decomposition answer is queued before the synthesis one.
#[derive(Default)]
pub struct TestScenario {
    facets: Vec<Facet>,
    decomposition: Option<String>,
    hits: IndexMap<Facet, Vec<ChunkHit>>,
    documents: Vec<DocumentDetail>,
    synthesis: Option<String>,
}

/// Embedding dimension used by [`TestScenario`].
pub const SCENARIO_DIM: usize = 32;

impl TestScenario {
    /// Create a new test scenario.
    pub fn new() -> Self {
        Self::default()
    }

    /// The model decomposes the query into these facets.
    pub fn with_facets(mut self, facets: &[&str]) -> Self {
        self.facets = facets.iter().map(|f| f.to_string()).collect();
        self.decomposition = Some(serde_json::json!({ "result": self.facets }).to_string());
        self
    }

    /// The model answers decomposition with this raw text.
    pub fn with_raw_decomposition(mut self, raw: impl Into<String>) -> Self {
        self.decomposition = Some(raw.into());
        self
    }

    /// Searching `facet` returns this hit (hits keep insertion order).
    pub fn with_hit(
        mut self,
        facet: &str,
        document_id: DocumentId,
        similarity: f32,
        chunk_text: &str,
    ) -> Self {
        self.hits
            .entry(facet.to_string())
            .or_default()
            .push(ChunkHit::new(document_id, similarity, chunk_text));
        self
    }

    /// Add document metadata.
    pub fn with_document(mut self, document_id: DocumentId, title: &str) -> Self {
        self.documents.push(DocumentDetail::new(
            document_id,
            title,
            format!("Summary of {}", title),
        ));
        self
    }

    /// The model answers synthesis with this raw text.
    pub fn with_synthesis(mut self, raw: impl Into<String>) -> Self {
        self.synthesis = Some(raw.into());
        self
    }

    /// One-hot vector for a facet or any other text the scenario embeds.
    pub fn embedding_for(index: usize) -> Vec<f32> {
        let mut v = vec![0.0; SCENARIO_DIM];
        v[index % SCENARIO_DIM] = 1.0;
        v
    }

    /// Get both mocks.
    pub fn build(self) -> (MockAI, MockStore) {
        let mut ai = MockAI::new().with_embedding_dim(SCENARIO_DIM);
        let mut store = MockStore::new();

        // Facets first, then any other searched text (e.g. a raw-query fallback)
        let mut keys: Vec<Facet> = self.facets.clone();
        for key in self.hits.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }

        for (i, key) in keys.iter().enumerate() {
            let embedding = Self::embedding_for(i);
            ai = ai.with_embedding(key.clone(), embedding.clone());
            if let Some(hits) = self.hits.get(key) {
                store = store.with_hits(embedding, hits.clone());
            }
        }

        for detail in self.documents {
            store = store.with_document(detail);
        }

        ai = match self.decomposition {
            Some(raw) => ai.with_completion(raw),
            None => ai.with_empty_completion(),
        };
        if let Some(raw) = self.synthesis {
            ai = ai.with_completion(raw);
        }

        (ai, store)
    }
}
