//! Configuration types for the search pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a query is decomposed and ranked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStrategy {
    /// Extract attribute facets ("military veteran", "rural small-business owner")
    /// and rank by similarity plus a bonus per matched facet.
    #[default]
    Persona,

    /// Generate 3-5 concrete sub-questions, search with a similarity floor,
    /// and rerank with a pairwise model when one is configured.
    Topic,
}

impl QueryStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persona => "persona",
            Self::Topic => "topic",
        }
    }
}

impl fmt::Display for QueryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "persona" => Ok(Self::Persona),
            "topic" => Ok(Self::Topic),
            other => Err(format!("unknown strategy '{}' (expected persona or topic)", other)),
        }
    }
}

/// Configuration for the search pipeline.
///
/// The numeric defaults are empirical, not algorithmic invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Decomposition and ranking strategy. Default: persona.
    pub strategy: QueryStrategy,

    /// Nearest-neighbour cap per facet on the persona path. Default: 5.
    pub facet_limit: usize,

    /// Nearest-neighbour cap per sub-question on the topic path. Default: 10.
    pub sub_question_limit: usize,

    /// Minimum cosine similarity on the topic path. Default: 0.3.
    pub sub_question_min_similarity: f32,

    /// Score added per matched facet. Default: 0.1.
    pub facet_bonus: f32,

    /// Candidates handed to synthesis. Default: 7.
    pub shortlist_size: usize,

    /// Results returned to the caller. Default: 5.
    pub max_results: usize,

    /// Search the raw query as a single topic when decomposition finds
    /// nothing, instead of returning empty. Default: false.
    pub topic_fallback: bool,

    /// Sampling temperature for decomposition. Default: 0.0.
    pub decompose_temperature: f32,

    /// Sampling temperature for synthesis. Default: 0.2.
    pub synthesis_temperature: f32,

    /// Byte cap on each supporting snippet in the synthesis prompt. Default: 1500.
    pub snippet_max_bytes: usize,

    /// Entries kept by an attached embedding cache. Default: 1024.
    pub embedding_cache_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: QueryStrategy::Persona,
            facet_limit: 5,
            sub_question_limit: 10,
            sub_question_min_similarity: 0.3,
            facet_bonus: 0.1,
            shortlist_size: 7,
            max_results: 5,
            topic_fallback: false,
            decompose_temperature: 0.0,
            synthesis_temperature: 0.2,
            snippet_max_bytes: 1500,
            embedding_cache_capacity: 1024,
        }
    }
}

impl SearchConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strategy.
    pub fn with_strategy(mut self, strategy: QueryStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the per-facet bonus.
    pub fn with_facet_bonus(mut self, bonus: f32) -> Self {
        self.facet_bonus = bonus;
        self
    }

    /// Set the synthesis shortlist size.
    pub fn with_shortlist_size(mut self, size: usize) -> Self {
        self.shortlist_size = size;
        self
    }

    /// Set the number of results returned.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Enable or disable the raw-query fallback.
    pub fn with_topic_fallback(mut self, enabled: bool) -> Self {
        self.topic_fallback = enabled;
        self
    }

    /// Set the per-facet nearest-neighbour cap (persona path).
    pub fn with_facet_limit(mut self, limit: usize) -> Self {
        self.facet_limit = limit;
        self
    }

    /// (limit, similarity floor) for facet searches under the active strategy.
    pub fn search_bounds(&self) -> (usize, Option<f32>) {
        match self.strategy {
            QueryStrategy::Persona => (self.facet_limit, None),
            QueryStrategy::Topic => {
                (self.sub_question_limit, Some(self.sub_question_min_similarity))
            }
        }
    }
}
