//! CLI for running a single bill search
//!
//! Uses the same engine and environment configuration as the HTTP server,
//! without the bearer token.

use anyhow::{Context, Result};
use bill_search::{QueryStrategy, Terminal};
use clap::Parser;
use search_api::{init_tracing, kernel::build_search_engine, Config};

#[derive(Parser)]
#[command(name = "search_cli")]
#[command(about = "Search bills for a persona or policy question")]
struct Cli {
    /// Persona description or policy question
    query: String,

    /// Decomposition strategy (overrides SEARCH_STRATEGY)
    #[arg(long, value_parser = parse_strategy)]
    strategy: Option<QueryStrategy>,

    /// Treat a query with no persona facets as a topic
    #[arg(long)]
    topic_fallback: bool,

    /// Maximum number of results (overrides MAX_RESULTS)
    #[arg(long)]
    max_results: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn parse_strategy(raw: &str) -> Result<QueryStrategy, String> {
    raw.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(strategy) = cli.strategy {
        config.search = config.search.with_strategy(strategy);
    }
    if cli.topic_fallback {
        config.search = config.search.with_topic_fallback(true);
    }
    if let Some(max) = cli.max_results {
        config.search = config.search.with_max_results(max);
    }

    let engine = build_search_engine(&config).await?;

    let outcome = tokio::time::timeout(config.pipeline_timeout, engine.run(&cli.query))
        .await
        .with_context(|| {
            format!(
                "Search timed out after {}s",
                config.pipeline_timeout.as_secs()
            )
        })?
        .context("Search failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome.results).context("Failed to encode results")?
        );
        return Ok(());
    }

    if let Terminal::Empty(reason) = &outcome.terminal {
        println!("No results ({})", reason.as_str());
        return Ok(());
    }

    for (rank, result) in outcome.results.iter().enumerate() {
        println!(
            "{}. [bill {}] ({}) {}",
            rank + 1,
            result.document_id,
            result.relevance_score,
            result.summary_point
        );
    }

    Ok(())
}
