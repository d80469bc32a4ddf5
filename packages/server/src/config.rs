use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use bill_search::{QueryStrategy, SearchConfig};
use dotenvy::dotenv;
use secrecy::SecretString;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_RERANK_MODEL: &str = "rerank-v3.5";
const DEFAULT_PIPELINE_TIMEOUT_SECS: u64 = 60;

/// Pairwise reranker endpoint, enabled when `RERANK_API_URL` is set
#[derive(Debug)]
pub struct RerankConfig {
    pub url: String,
    pub api_key: Option<SecretString>,
    pub model: String,
}

/// Application configuration loaded from environment variables
#[derive(Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub openai_api_key: SecretString,
    /// Bearer token clients must present on `/search_bills`.
    /// Only the HTTP server requires it.
    pub api_key: Option<SecretString>,
    pub llm_model: String,
    pub embedding_model: String,
    pub rerank: Option<RerankConfig>,
    pub search: SearchConfig,
    pub pipeline_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| anyhow!("{} must be set", key))
        };

        let rerank = lookup("RERANK_API_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| RerankConfig {
                url,
                api_key: lookup("RERANK_API_KEY").map(SecretString::from),
                model: lookup("RERANK_MODEL").unwrap_or_else(|| DEFAULT_RERANK_MODEL.to_string()),
            });

        let timeout_secs: u64 = parse_or(
            &lookup,
            "PIPELINE_TIMEOUT_SECS",
            DEFAULT_PIPELINE_TIMEOUT_SECS,
        )?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            openai_api_key: SecretString::from(required("OPENAI_API_KEY")?),
            api_key: lookup("API_KEY")
                .filter(|value| !value.trim().is_empty())
                .map(SecretString::from),
            llm_model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            embedding_model: lookup("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            rerank,
            search: search_config(&lookup)?,
            pipeline_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Engine tuning: defaults from [`SearchConfig`], overridden per variable.
fn search_config<F>(lookup: &F) -> Result<SearchConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = SearchConfig::default();

    let strategy = match lookup("SEARCH_STRATEGY") {
        Some(raw) => raw
            .parse::<QueryStrategy>()
            .map_err(|e| anyhow!(e))
            .context("SEARCH_STRATEGY must be persona or topic")?,
        None => defaults.strategy,
    };

    Ok(SearchConfig::default()
        .with_strategy(strategy)
        .with_facet_bonus(parse_or(lookup, "FACET_BONUS", defaults.facet_bonus)?)
        .with_shortlist_size(parse_or(lookup, "SHORTLIST_SIZE", defaults.shortlist_size)?)
        .with_max_results(parse_or(lookup, "MAX_RESULTS", defaults.max_results)?)
        .with_topic_fallback(parse_or(lookup, "TOPIC_FALLBACK", defaults.topic_fallback)?))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid {}", key, std::any::type_name::<T>())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATABASE_URL", "postgres://localhost/bills"),
            ("OPENAI_API_KEY", "sk-test"),
            ("API_KEY", "secret-token"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&minimal())).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.llm_model, "gpt-4o-mini");
        assert_eq!(config.embedding_model, "text-embedding-3-small");
        assert_eq!(config.api_key.unwrap().expose_secret(), "secret-token");
        assert_eq!(config.pipeline_timeout, Duration::from_secs(60));
        assert!(config.rerank.is_none());
        assert_eq!(config.search.strategy, QueryStrategy::Persona);
        assert_eq!(config.search.max_results, 5);
        assert!(!config.search.topic_fallback);
    }

    #[test]
    fn test_missing_required() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]))
            .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let mut vars = minimal();
        vars.retain(|(k, _)| *k != "API_KEY");
        vars.push(("API_KEY", "  "));

        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_tuning_overrides() {
        let mut vars = minimal();
        vars.extend([
            ("PORT", "9100"),
            ("SEARCH_STRATEGY", "Topic"),
            ("FACET_BONUS", "0.25"),
            ("SHORTLIST_SIZE", "10"),
            ("MAX_RESULTS", "3"),
            ("TOPIC_FALLBACK", "true"),
            ("PIPELINE_TIMEOUT_SECS", "15"),
        ]);

        let config = Config::from_lookup(lookup_from(&vars)).unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.search.strategy, QueryStrategy::Topic);
        assert_eq!(config.search.facet_bonus, 0.25);
        assert_eq!(config.search.shortlist_size, 10);
        assert_eq!(config.search.max_results, 3);
        assert!(config.search.topic_fallback);
        assert_eq!(config.pipeline_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_number() {
        let mut vars = minimal();
        vars.push(("PORT", "eighty"));

        let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_unknown_strategy() {
        let mut vars = minimal();
        vars.push(("SEARCH_STRATEGY", "keyword"));

        let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(err.to_string().contains("SEARCH_STRATEGY"));
    }

    #[test]
    fn test_reranker_enabled_by_url() {
        let mut vars = minimal();
        vars.extend([
            ("RERANK_API_URL", "https://rerank.example.com/v1"),
            ("RERANK_API_KEY", "rk-test"),
        ]);

        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        let rerank = config.rerank.unwrap();

        assert_eq!(rerank.url, "https://rerank.example.com/v1");
        assert_eq!(rerank.model, "rerank-v3.5");
        assert_eq!(rerank.api_key.unwrap().expose_secret(), "rk-test");
    }
}
