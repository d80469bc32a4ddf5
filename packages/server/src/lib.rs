// Bill Search API
//
// Thin HTTP front for the bill-search engine: one authenticated search
// endpoint plus a health check. The engine itself lives in the bill-search
// crate; this crate only wires configuration, transport and logging.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,bill_search=debug,search_api=debug,sqlx=warn";

/// Initialize tracing with an env filter and the fmt layer
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
