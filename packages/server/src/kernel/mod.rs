//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod traits;

pub use deps::{build_search_engine, ProductionSearch, ServerDeps};
pub use traits::BaseBillSearch;
