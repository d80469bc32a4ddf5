//! Public output of a search.

use serde::{Deserialize, Serialize};

use super::document::DocumentId;

/// One explained, scored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesizedResult {
    pub document_id: DocumentId,

    /// One-sentence explanation of why the document matters to the query
    pub summary_point: String,

    /// 0-100
    pub relevance_score: u8,
}
