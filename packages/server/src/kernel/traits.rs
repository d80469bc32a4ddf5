// Trait definitions for dependency injection
//
// Naming convention: Base* for trait names (e.g., BaseBillSearch)

use std::time::Duration;

use async_trait::async_trait;
use bill_search::{AI, BillSearch, BillStore, SearchError, SynthesizedResult};

// =============================================================================
// Bill Search Trait (Infrastructure)
// =============================================================================

/// The search engine as seen by HTTP handlers and the CLI.
///
/// Handlers depend on this trait instead of a concrete `BillSearch<A, S>` so
/// tests can swap in a stub without a database or model provider.
#[async_trait]
pub trait BaseBillSearch: Send + Sync {
    /// Run one query with a deadline on the whole pipeline
    async fn search(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<Vec<SynthesizedResult>, SearchError>;
}

#[async_trait]
impl<A, S> BaseBillSearch for BillSearch<A, S>
where
    A: AI,
    S: BillStore,
{
    async fn search(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<Vec<SynthesizedResult>, SearchError> {
        self.search_with_timeout(query, timeout).await
    }
}
