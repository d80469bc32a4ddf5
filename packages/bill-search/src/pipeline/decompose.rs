//! Query decomposition into search facets.

use indexmap::IndexSet;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::json::first_array;
use super::prompts::{decompose_system_prompt, format_decompose_prompt};
use crate::error::Result;
use crate::traits::ai::AI;
use crate::types::config::QueryStrategy;
use crate::types::document::Facet;

/// Ask the model for facets (persona) or sub-questions (topic).
///
/// An empty result means the query could not be understood. Only a
/// provider failure is an error.
#[instrument(skip(ai, query), fields(strategy = %strategy, query_len = query.len()))]
pub async fn decompose<A: AI + ?Sized>(
    ai: &A,
    query: &str,
    strategy: QueryStrategy,
    temperature: f32,
) -> Result<Vec<Facet>> {
    let raw = ai
        .complete_json(
            decompose_system_prompt(strategy),
            &format_decompose_prompt(query),
            temperature,
        )
        .await?;

    let facets = parse_facets(raw.as_deref());
    debug!(facets = ?facets, "Decomposed query");
    Ok(facets)
}

/// Extract facets from a model answer.
///
/// Non-string entries are discarded. Entries are trimmed, and blank or
/// repeated ones dropped, keeping first-seen order.
pub fn parse_facets(raw: Option<&str>) -> Vec<Facet> {
    let items = match first_array(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, raw = raw.unwrap_or_default(), "Unusable decomposition output");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
