//! Precision reranking with a pairwise relevance model.
//!
//! Scores every distinct chunk from the facet searches against the raw
//! query. A document's score is its best chunk's score; that ordering
//! replaces the composite score when choosing the shortlist.

use std::collections::HashMap;

use indexmap::IndexSet;
use tracing::{debug, instrument};

use super::aggregate::Candidates;
use super::rank::shortlist_by_score;
use super::search::HitsByFacet;
use crate::error::{Result, SearchError};
use crate::traits::reranker::Reranker;
use crate::types::candidate::RankedCandidate;
use crate::types::document::DocumentId;

/// Rerank the chunk pool and shortlist the best documents.
#[instrument(skip_all, fields(candidates = candidates.len()))]
pub async fn rerank<R: Reranker + ?Sized>(
    reranker: &R,
    query: &str,
    hits_by_facet: &HitsByFacet,
    candidates: &Candidates,
    shortlist_size: usize,
) -> Result<Vec<RankedCandidate>> {
    let pool = chunk_pool(hits_by_facet);
    if pool.is_empty() {
        return Ok(Vec::new());
    }

    let passages: Vec<&str> = pool.iter().map(|(_, text)| *text).collect();
    let scores = reranker.score(query, &passages).await?;
    if scores.len() != pool.len() {
        return Err(SearchError::Rerank(format!(
            "expected {} scores, got {}",
            pool.len(),
            scores.len()
        )));
    }

    let mut best: HashMap<DocumentId, f32> = HashMap::new();
    for ((document_id, _), score) in pool.iter().zip(scores) {
        best.entry(*document_id)
            .and_modify(|s| *s = s.max(score))
            .or_insert(score);
    }

    let ranked = candidates
        .values()
        .filter_map(|candidate| {
            best.get(&candidate.document_id).map(|score| RankedCandidate {
                candidate: candidate.clone(),
                score: *score,
            })
        })
        .collect();

    let shortlist = shortlist_by_score(ranked, shortlist_size);
    debug!(
        pool = pool.len(),
        shortlist = ?shortlist.iter().map(|r| r.candidate.document_id).collect::<Vec<_>>(),
        "Reranked candidates"
    );
    Ok(shortlist)
}

/// Distinct (document, chunk text) pairs in first-seen order.
fn chunk_pool(hits_by_facet: &HitsByFacet) -> IndexSet<(DocumentId, &str)> {
    hits_by_facet
        .values()
        .flatten()
        .map(|hit| (hit.document_id, hit.chunk_text.as_str()))
        .collect()
}
