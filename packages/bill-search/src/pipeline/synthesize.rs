//! Batched synthesis: one generative call explains the whole shortlist.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::json::first_array;
use super::prompts::{format_synthesis_prompt, synthesis_system_prompt};
use crate::error::Result;
use crate::traits::ai::AI;
use crate::types::candidate::DetailedCandidate;
use crate::types::config::QueryStrategy;
use crate::types::result::SynthesizedResult;

/// Explain and score every shortlisted document in a single call.
///
/// Entries the model got wrong are dropped, never repaired. Only a
/// provider failure is an error.
#[instrument(skip_all, fields(strategy = %strategy, shortlist = shortlist.len()))]
pub async fn synthesize<A: AI + ?Sized>(
    ai: &A,
    query: &str,
    strategy: QueryStrategy,
    shortlist: &[DetailedCandidate],
    temperature: f32,
    snippet_max_bytes: usize,
) -> Result<Vec<SynthesizedResult>> {
    if shortlist.is_empty() {
        return Ok(Vec::new());
    }

    let user = format_synthesis_prompt(query, strategy, shortlist, snippet_max_bytes);
    let raw = ai
        .complete_json(synthesis_system_prompt(strategy), &user, temperature)
        .await?;

    let results = parse_synthesis(raw.as_deref(), shortlist);
    debug!(results = results.len(), "Synthesized shortlist");
    Ok(results)
}

/// Pair model entries with the shortlist by position.
///
/// Pairs stop at the shorter of the two lists.
pub fn parse_synthesis(raw: Option<&str>, shortlist: &[DetailedCandidate]) -> Vec<SynthesizedResult> {
    let items = match first_array(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "Unusable synthesis output");
            return Vec::new();
        }
    };

    if items.len() != shortlist.len() {
        warn!(
            expected = shortlist.len(),
            received = items.len(),
            "Synthesis length mismatch"
        );
    }

    let paired = items.len().min(shortlist.len());
    let results: Vec<SynthesizedResult> = items
        .iter()
        .zip(shortlist)
        .filter_map(|(item, entry)| {
            let result = well_formed(item, entry);
            if result.is_none() {
                debug!(document_id = entry.detail.document_id, entry = %item, "Dropped synthesis entry");
            }
            result
        })
        .collect();

    if results.len() < paired {
        warn!(dropped = paired - results.len(), "Dropped malformed synthesis entries");
    }
    results
}

fn well_formed(item: &Value, entry: &DetailedCandidate) -> Option<SynthesizedResult> {
    let summary_point = item.get("summary_point")?.as_str()?.trim();
    if summary_point.is_empty() {
        return None;
    }

    let relevance_score = item.get("relevance_score")?.as_i64()?;
    if !(0..=100).contains(&relevance_score) {
        return None;
    }

    Some(SynthesizedResult {
        document_id: entry.detail.document_id,
        summary_point: summary_point.to_string(),
        relevance_score: u8::try_from(relevance_score).ok()?,
    })
}
