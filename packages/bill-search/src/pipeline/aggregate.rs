//! Candidate aggregation: one record per document across all facet hits.

use indexmap::IndexMap;
use tracing::{debug, instrument};

use super::search::HitsByFacet;
use crate::types::candidate::Candidate;
use crate::types::document::DocumentId;

/// Candidates keyed by document, in first-appearance order.
pub type Candidates = IndexMap<DocumentId, Candidate>;

/// Merge per-facet hits into per-document candidates.
///
/// Facet membership is recorded for every hit. A document's first hit sets
/// its similarity and snippet; later hits replace them only when strictly
/// better.
#[instrument(skip_all, fields(facets = hits_by_facet.len()))]
pub fn aggregate(hits_by_facet: &HitsByFacet) -> Candidates {
    let mut candidates = Candidates::new();

    for (facet, hits) in hits_by_facet {
        for hit in hits {
            let first_hit = !candidates.contains_key(&hit.document_id);
            let candidate = candidates
                .entry(hit.document_id)
                .or_insert_with(|| Candidate::new(hit.document_id));

            candidate.matched_facets.insert(facet.clone());

            // The first hit always seeds the snippet, whatever its similarity
            if first_hit || hit.similarity > candidate.max_similarity {
                candidate.max_similarity = hit.similarity;
                candidate.best_chunk_text = hit.chunk_text.clone();
            }
        }
    }

    debug!(candidates = candidates.len(), "Aggregated hits");
    candidates
}
