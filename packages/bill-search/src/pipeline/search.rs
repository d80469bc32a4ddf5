//! Facet search: embed every facet, then query the chunk index once per facet.

use futures::future::try_join_all;
use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::cache::MemoCache;
use crate::error::{Result, SearchError};
use crate::traits::{ai::AI, store::ChunkIndex};
use crate::types::document::{ChunkHit, Facet};

/// Hits per facet, in facet order.
pub type HitsByFacet = IndexMap<Facet, Vec<ChunkHit>>;

/// Embed `facets` in one batch and run their searches concurrently.
///
/// Zero facets means no provider or index calls at all.
#[instrument(skip_all, fields(facets = facets.len(), limit = limit, min_similarity = ?min_similarity))]
pub async fn search_facets<A, S>(
    ai: &A,
    store: &S,
    cache: Option<&MemoCache<Vec<f32>>>,
    facets: &[Facet],
    limit: usize,
    min_similarity: Option<f32>,
) -> Result<HitsByFacet>
where
    A: AI + ?Sized,
    S: ChunkIndex + ?Sized,
{
    if facets.is_empty() {
        return Ok(HitsByFacet::new());
    }

    let embeddings = embed_facets(ai, cache, facets).await?;

    let searches = facets
        .iter()
        .zip(embeddings.iter())
        .map(|(facet, embedding)| async move {
            let hits = store.search_similar(embedding, limit, min_similarity).await?;
            debug!(facet = %facet, hits = hits.len(), "Facet search");
            Ok::<_, SearchError>((facet.clone(), hits))
        });

    let results = try_join_all(searches).await?;

    let mut by_facet = HitsByFacet::with_capacity(results.len());
    for (facet, hits) in results {
        by_facet.entry(facet).or_default().extend(hits);
    }
    Ok(by_facet)
}

/// One vector per facet, served from `cache` where possible.
async fn embed_facets<A: AI + ?Sized>(
    ai: &A,
    cache: Option<&MemoCache<Vec<f32>>>,
    facets: &[Facet],
) -> Result<Vec<Vec<f32>>> {
    let mut vectors: Vec<Option<Vec<f32>>> = facets
        .iter()
        .map(|f| cache.and_then(|c| c.get(f)))
        .collect();

    let missing: Vec<String> = facets
        .iter()
        .zip(vectors.iter())
        .filter(|(_, v)| v.is_none())
        .map(|(f, _)| f.clone())
        .collect();

    if !missing.is_empty() {
        let fresh = ai.embed_batch(&missing).await?;
        if fresh.len() != missing.len() {
            return Err(SearchError::Embedding(format!(
                "expected {} vectors, provider returned {}",
                missing.len(),
                fresh.len()
            )));
        }

        let mut fresh = fresh.into_iter();
        for (facet, slot) in facets.iter().zip(vectors.iter_mut()) {
            if slot.is_none() {
                if let Some(vector) = fresh.next() {
                    if let Some(cache) = cache {
                        cache.insert(facet.clone(), vector.clone());
                    }
                    *slot = Some(vector);
                }
            }
        }
    }

    debug!(
        facets = facets.len(),
        embedded = missing.len(),
        cached = facets.len() - missing.len(),
        "Embedded facets"
    );

    vectors
        .into_iter()
        .map(|v| v.ok_or_else(|| SearchError::Embedding("missing facet vector".into())))
        .collect()
}
