use axum::{extract::Extension, Json};
use bill_search::SynthesizedResult;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::kernel::ServerDeps;
use crate::server::error::ApiError;

/// Request body for `/search_bills`
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Persona description or policy question
    pub query: String,
}

/// One entry of the response list
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillSummary {
    pub bill_id: i64,
    pub summary_point: String,
    pub relevance_score: u8,
}

impl From<SynthesizedResult> for BillSummary {
    fn from(result: SynthesizedResult) -> Self {
        Self {
            bill_id: result.document_id,
            summary_point: result.summary_point,
            relevance_score: result.relevance_score,
        }
    }
}

/// Search bills for a persona or policy question
///
/// An empty list is a successful answer: vague queries and queries with no
/// matching bills both return `[]`.
pub async fn search_handler(
    Extension(deps): Extension<ServerDeps>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<BillSummary>>, ApiError> {
    let results = deps
        .searcher
        .search(&request.query, deps.pipeline_timeout)
        .await
        .map_err(|e| {
            warn!(error = %e, "Search failed");
            ApiError::from(e)
        })?;

    info!(results = results.len(), "Search completed");

    Ok(Json(results.into_iter().map(BillSummary::from).collect()))
}
