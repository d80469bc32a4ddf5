//! Composite ranking and shortlist selection.

use std::cmp::Ordering;

use tracing::{debug, instrument};

use super::aggregate::Candidates;
use crate::types::candidate::RankedCandidate;

/// Order candidates by `max_similarity + facet_bonus * |matched_facets|`
/// and keep the best `shortlist_size`.
///
/// The sort is stable: equal scores keep first-appearance order.
#[instrument(skip(candidates), fields(candidates = candidates.len()))]
pub fn rank(candidates: Candidates, facet_bonus: f32, shortlist_size: usize) -> Vec<RankedCandidate> {
    let ranked = candidates
        .into_values()
        .map(|candidate| RankedCandidate {
            score: candidate.composite_score(facet_bonus),
            candidate,
        })
        .collect();

    let shortlist = shortlist_by_score(ranked, shortlist_size);
    debug!(
        shortlist = ?shortlist.iter().map(|r| r.candidate.document_id).collect::<Vec<_>>(),
        "Ranked candidates"
    );
    shortlist
}

/// Stable descending sort by score, then truncate.
pub(crate) fn shortlist_by_score(
    mut ranked: Vec<RankedCandidate>,
    shortlist_size: usize,
) -> Vec<RankedCandidate> {
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.truncate(shortlist_size);
    ranked
}
