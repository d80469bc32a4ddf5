//! The search engine - main entry point of the library.
//!
//! Runs one query through the pipeline:
//!
//! ```text
//! decompose -> search -> aggregate -> rank | rerank -> fetch details -> synthesize -> finalize
//! ```
//!
//! Any stage that comes up empty ends the run with an empty result and a
//! logged [`EmptyReason`]. Only provider failures are errors.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use super::aggregate::{aggregate, Candidates};
use super::decompose::decompose;
use super::finalize::finalize;
use super::rank::rank;
use super::rerank::rerank;
use super::search::{search_facets, HitsByFacet};
use super::synthesize::synthesize;
use crate::cache::MemoCache;
use crate::error::{Result, SearchError};
use crate::traits::{ai::AI, reranker::Reranker, store::BillStore};
use crate::types::{
    candidate::{DetailedCandidate, RankedCandidate},
    config::{QueryStrategy, SearchConfig},
    document::DocumentId,
    result::SynthesizedResult,
};

/// Why a run ended without results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// Query was blank
    BlankQuery,
    /// Decomposition found nothing searchable
    NoFacets,
    /// No facet search returned a hit
    NoCandidates,
    /// No shortlisted document had metadata
    NoDetails,
    /// Synthesis produced no usable entry
    NoSynthesis,
}

impl EmptyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlankQuery => "blank query",
            Self::NoFacets => "could not understand query",
            Self::NoCandidates => "no matching documents",
            Self::NoDetails => "no shortlisted document has details",
            Self::NoSynthesis => "synthesis produced no results",
        }
    }
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Finalized,
    Empty(EmptyReason),
}

/// Results of a run plus the state it ended in.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<SynthesizedResult>,
    pub terminal: Terminal,
}

impl SearchOutcome {
    fn empty(reason: EmptyReason) -> Self {
        info!(reason = %reason, "Search ended empty");
        Self {
            results: Vec::new(),
            terminal: Terminal::Empty(reason),
        }
    }
}

/// Facet-driven search over legislative documents.
///
/// Holds no per-query state, so one engine serves concurrent queries.
///
/// # Example
///
/// ```rust,ignore
/// let engine = BillSearch::new(store, ai);
/// let results = engine.search("I'm a farmer worried about water rights").await?;
/// ```
pub struct BillSearch<A: AI, S: BillStore> {
    ai: A,
    store: S,
    reranker: Option<Arc<dyn Reranker>>,
    embedding_cache: Option<MemoCache<Vec<f32>>>,
    config: SearchConfig,
}

impl<A: AI, S: BillStore> BillSearch<A, S> {
    /// Create a new engine with default configuration.
    pub fn new(store: S, ai: A) -> Self {
        Self::with_config(store, ai, SearchConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(store: S, ai: A, config: SearchConfig) -> Self {
        Self {
            ai,
            store,
            reranker: None,
            embedding_cache: None,
            config,
        }
    }

    /// Attach a pairwise reranker for the topic strategy.
    pub fn with_reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Memoize facet embeddings across queries.
    pub fn with_embedding_cache(mut self) -> Self {
        self.embedding_cache = Some(MemoCache::new(self.config.embedding_cache_capacity));
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the AI.
    pub fn ai(&self) -> &A {
        &self.ai
    }

    /// Get the embedding cache, if attached.
    pub fn embedding_cache(&self) -> Option<&MemoCache<Vec<f32>>> {
        self.embedding_cache.as_ref()
    }

    /// Search and return the ranked results.
    pub async fn search(&self, query: &str) -> Result<Vec<SynthesizedResult>> {
        Ok(self.run(query).await?.results)
    }

    /// Search with a deadline on the whole pipeline.
    pub async fn search_with_timeout(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<Vec<SynthesizedResult>> {
        tokio::time::timeout(timeout, self.search(query))
            .await
            .map_err(|_| {
                warn!(timeout_ms = timeout.as_millis() as u64, "Search timed out");
                SearchError::Timeout(timeout)
            })?
    }

    /// Run the full pipeline, reporting where it stopped.
    #[instrument(skip(self, query), fields(strategy = %self.config.strategy, query_len = query.len()))]
    pub async fn run(&self, query: &str) -> Result<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchOutcome::empty(EmptyReason::BlankQuery));
        }

        let mut strategy = self.config.strategy;
        let (mut limit, mut min_similarity) = self.config.search_bounds();

        let mut facets = decompose(
            &self.ai,
            query,
            strategy,
            self.config.decompose_temperature,
        )
        .await?;

        if facets.is_empty() {
            if !self.config.topic_fallback {
                return Ok(SearchOutcome::empty(EmptyReason::NoFacets));
            }
            info!("No facets, searching raw query as a topic");
            facets = vec![query.to_string()];
            strategy = QueryStrategy::Topic;
            limit = self.config.facet_limit * 2;
            min_similarity = None;
        }

        let hits = search_facets(
            &self.ai,
            &self.store,
            self.embedding_cache.as_ref(),
            &facets,
            limit,
            min_similarity,
        )
        .await?;

        let candidates = aggregate(&hits);
        if candidates.is_empty() {
            return Ok(SearchOutcome::empty(EmptyReason::NoCandidates));
        }

        let shortlist = self.shortlist(query, strategy, &hits, candidates).await;

        let detailed = self.fetch_details(shortlist).await?;
        if detailed.is_empty() {
            return Ok(SearchOutcome::empty(EmptyReason::NoDetails));
        }

        let synthesized = synthesize(
            &self.ai,
            query,
            strategy,
            &detailed,
            self.config.synthesis_temperature,
            self.config.snippet_max_bytes,
        )
        .await?;
        if synthesized.is_empty() {
            return Ok(SearchOutcome::empty(EmptyReason::NoSynthesis));
        }

        let results = finalize(synthesized, self.config.max_results);
        info!(
            facets = facets.len(),
            results = results.len(),
            top = ?results.first().map(|r| r.document_id),
            "Search complete"
        );

        Ok(SearchOutcome {
            results,
            terminal: Terminal::Finalized,
        })
    }

    /// Pick the synthesis shortlist: reranked on the topic path when a
    /// reranker is attached, composite score otherwise.
    async fn shortlist(
        &self,
        query: &str,
        strategy: QueryStrategy,
        hits: &HitsByFacet,
        candidates: Candidates,
    ) -> Vec<RankedCandidate> {
        let size = self.config.shortlist_size;

        if let (QueryStrategy::Topic, Some(reranker)) = (strategy, &self.reranker) {
            match rerank(reranker.as_ref(), query, hits, &candidates, size).await {
                Ok(shortlist) => return shortlist,
                Err(e) => warn!(error = %e, "Reranker failed, using composite ranking"),
            }
        }

        rank(candidates, self.config.facet_bonus, size)
    }

    /// Attach metadata to the shortlist in one lookup, dropping documents
    /// the store no longer has.
    async fn fetch_details(&self, shortlist: Vec<RankedCandidate>) -> Result<Vec<DetailedCandidate>> {
        let ids: Vec<DocumentId> = shortlist.iter().map(|r| r.candidate.document_id).collect();
        let mut details = self.store.fetch_details(&ids).await?;

        let detailed = shortlist
            .into_iter()
            .filter_map(|ranked| {
                let id = ranked.candidate.document_id;
                match details.remove(&id) {
                    Some(detail) => Some(DetailedCandidate {
                        candidate: ranked.candidate,
                        detail,
                    }),
                    None => {
                        warn!(document_id = id, "Shortlisted document has no details, skipping");
                        None
                    }
                }
            })
            .collect();

        Ok(detailed)
    }
}
