//! Integration tests for the full search pipeline.
//!
//! Each test scripts the model, the chunk index and the document store,
//! then runs a query end to end through `BillSearch`.

use std::sync::Arc;
use std::time::Duration;

use bill_search::{
    testing::{MockAI, MockAICall, MockReranker, MockStore, TestScenario},
    BillSearch, ChunkHit, DocumentDetail, EmptyReason, QueryStrategy, SearchConfig, SearchError,
    Terminal,
};

/// Synthesis answer with one entry per (summary, score).
fn synthesis(entries: &[(&str, i64)]) -> String {
    let items: Vec<_> = entries
        .iter()
        .map(|(s, score)| serde_json::json!({ "summary_point": s, "relevance_score": score }))
        .collect();
    serde_json::json!({ "results": items }).to_string()
}

/// System and user prompt of every completion call, in order.
fn completions(ai: &MockAI) -> Vec<(String, String)> {
    ai.calls()
        .into_iter()
        .filter_map(|c| match c {
            MockAICall::Complete { system, user, .. } => Some((system, user)),
            _ => None,
        })
        .collect()
}

fn engine(
    (ai, store): (MockAI, MockStore),
    config: SearchConfig,
) -> BillSearch<MockAI, MockStore> {
    BillSearch::with_config(store, ai, config)
}

#[tokio::test]
async fn test_corroborated_document_outranks_higher_peak() {
    let engine = engine(
        TestScenario::new()
            .with_facets(&["farmer", "water rights", "international trade"])
            .with_hit("farmer", 42, 0.81, "Expands crop insurance for family farms")
            .with_hit("water rights", 42, 0.77, "Secures irrigation allocations")
            .with_hit("international trade", 7, 0.90, "Revises tariff schedules")
            .with_document(42, "Family Farm Water Security Act")
            .with_document(7, "Trade Modernization Act")
            .with_synthesis(synthesis(&[
                ("Protects your irrigation water.", 70),
                ("Changes tariffs on your exports.", 85),
            ]))
            .build(),
        SearchConfig::default(),
    );

    let outcome = engine
        .run("I'm a farmer worried about water rights and trade.")
        .await
        .unwrap();

    // Shortlist order follows the composite score: 42 (1.01) before 7 (1.00)
    let prompts = completions(engine.ai());
    assert_eq!(prompts.len(), 2);
    let synthesis_prompt = &prompts[1].1;
    let pos_42 = synthesis_prompt.find("- Bill ID: 42").unwrap();
    let pos_7 = synthesis_prompt.find("- Bill ID: 7").unwrap();
    assert!(pos_42 < pos_7);
    assert!(synthesis_prompt.contains("- Matched facets: farmer, water rights"));
    assert!(synthesis_prompt.contains("Expands crop insurance"));

    // Final order follows the synthesized score
    assert_eq!(outcome.terminal, Terminal::Finalized);
    let ids: Vec<i64> = outcome.results.iter().map(|r| r.document_id).collect();
    assert_eq!(ids, vec![7, 42]);
    assert_eq!(outcome.results[1].summary_point, "Protects your irrigation water.");
}

#[tokio::test]
async fn test_vague_query_touches_nothing() {
    let engine = engine(
        TestScenario::new().with_facets(&[]).build(),
        SearchConfig::default(),
    );

    let outcome = engine.run("hello").await.unwrap();

    assert!(outcome.results.is_empty());
    assert_eq!(outcome.terminal, Terminal::Empty(EmptyReason::NoFacets));
    assert_eq!(engine.ai().embed_calls(), 0);
    assert!(engine.store().searches().is_empty());
    assert!(engine.store().detail_lookups().is_empty());
}

#[tokio::test]
async fn test_unparseable_decomposition_is_vague() {
    let engine = engine(
        TestScenario::new()
            .with_raw_decomposition("Sorry, I can't help with that.")
            .build(),
        SearchConfig::default(),
    );

    let outcome = engine.run("asdf").await.unwrap();
    assert_eq!(outcome.terminal, Terminal::Empty(EmptyReason::NoFacets));
    assert!(engine.store().searches().is_empty());
}

#[tokio::test]
async fn test_invalid_synthesis_json_yields_empty() {
    let engine = engine(
        TestScenario::new()
            .with_facets(&["veteran"])
            .with_hit("veteran", 3, 0.8, "VA healthcare")
            .with_document(3, "Veterans Health Act")
            .with_synthesis("{\"results\": [ {\"summary_point\": ")
            .build(),
        SearchConfig::default(),
    );

    let outcome = engine.run("I served in the army").await.unwrap();

    assert!(outcome.results.is_empty());
    assert_eq!(outcome.terminal, Terminal::Empty(EmptyReason::NoSynthesis));
}

#[tokio::test]
async fn test_partial_synthesis_pairs_by_position() {
    let mut scenario = TestScenario::new().with_facets(&["small business"]);
    for (i, id) in (101..=107).enumerate() {
        scenario = scenario
            .with_hit("small business", id, 0.9 - i as f32 * 0.05, "text")
            .with_document(id, &format!("Bill {}", id));
    }

    // Positions 3 and 6 are malformed; the rest name their bill
    let raw = serde_json::json!({ "results": [
        { "summary_point": "About 101.", "relevance_score": 40 },
        { "summary_point": "About 102.", "relevance_score": 90 },
        { "summary_point": "About 103.", "relevance_score": 150 },
        { "summary_point": "About 104.", "relevance_score": 65 },
        { "summary_point": "About 105.", "relevance_score": 75 },
        { "summary_point": "About 106." },
        { "summary_point": "About 107.", "relevance_score": 10 },
    ]})
    .to_string();

    let engine = engine(
        scenario.with_synthesis(raw).build(),
        SearchConfig::default().with_facet_limit(12).with_max_results(7),
    );

    let results = engine.search("I run a bakery").await.unwrap();

    assert_eq!(results.len(), 5);
    for r in &results {
        assert_eq!(r.summary_point, format!("About {}.", r.document_id));
        assert!(r.relevance_score <= 100);
    }
    let ids: Vec<i64> = results.iter().map(|r| r.document_id).collect();
    assert_eq!(ids, vec![102, 105, 104, 101, 107]);
}

#[tokio::test]
async fn test_results_capped_at_max() {
    let mut scenario = TestScenario::new().with_facets(&["a"]);
    for id in 1..=7 {
        scenario = scenario
            .with_hit("a", id, 0.5, "text")
            .with_document(id, "Bill");
    }
    let entries: Vec<(&str, i64)> = (0..7).map(|i| ("Point.", i * 10)).collect();

    let engine = engine(
        scenario.with_synthesis(synthesis(&entries)).build(),
        SearchConfig::default().with_facet_limit(12),
    );

    let results = engine.search("q").await.unwrap();
    let scores: Vec<u8> = results.iter().map(|r| r.relevance_score).collect();
    assert_eq!(scores, vec![60, 50, 40, 30, 20]);
}

#[tokio::test]
async fn test_shortlist_bounded_before_detail_fetch() {
    let mut scenario = TestScenario::new().with_facets(&["parent", "teacher"]);
    for id in 1..=12 {
        scenario = scenario
            .with_hit("parent", id, 0.3 + id as f32 * 0.05, "chunk")
            .with_document(id, "Bill");
    }
    let engine = engine(
        scenario.with_synthesis(synthesis(&[("x.", 50)])).build(),
        SearchConfig::default().with_facet_limit(12),
    );

    engine.search("I teach and have kids").await.unwrap();

    // Single batched lookup for exactly the top 7 by composite score
    let lookups = engine.store().detail_lookups();
    assert_eq!(lookups, vec![vec![12, 11, 10, 9, 8, 7, 6]]);

    let prompt = &completions(engine.ai())[1].1;
    assert!(prompt.contains("Candidate 7:"));
    assert!(!prompt.contains("Candidate 8:"));
}

#[tokio::test]
async fn test_missing_details_skipped() {
    let engine = engine(
        TestScenario::new()
            .with_facets(&["retiree"])
            .with_hit("retiree", 42, 0.9, "deleted bill")
            .with_hit("retiree", 7, 0.8, "pension reform")
            .with_document(7, "Pension Reform Act")
            .with_synthesis(synthesis(&[("Protects your pension.", 88)]))
            .build(),
        SearchConfig::default(),
    );

    let results = engine.search("I'm retired").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document_id, 7);
    let prompt = &completions(engine.ai())[1].1;
    assert!(!prompt.contains("- Bill ID: 42"));
}

#[tokio::test]
async fn test_no_details_at_all_skips_synthesis() {
    let engine = engine(
        TestScenario::new()
            .with_facets(&["retiree"])
            .with_hit("retiree", 42, 0.9, "deleted bill")
            .build(),
        SearchConfig::default(),
    );

    let outcome = engine.run("I'm retired").await.unwrap();

    assert_eq!(outcome.terminal, Terminal::Empty(EmptyReason::NoDetails));
    assert_eq!(completions(engine.ai()).len(), 1);
}

#[tokio::test]
async fn test_no_hits_is_empty() {
    let engine = engine(
        TestScenario::new().with_facets(&["astronaut"]).build(),
        SearchConfig::default(),
    );

    let outcome = engine.run("I'm an astronaut").await.unwrap();
    assert_eq!(outcome.terminal, Terminal::Empty(EmptyReason::NoCandidates));
    assert!(engine.store().detail_lookups().is_empty());
}

#[tokio::test]
async fn test_blank_query_makes_no_calls() {
    let engine = engine(TestScenario::new().build(), SearchConfig::default());

    let outcome = engine.run("   ").await.unwrap();

    assert_eq!(outcome.terminal, Terminal::Empty(EmptyReason::BlankQuery));
    assert!(engine.ai().calls().is_empty());
}

#[tokio::test]
async fn test_store_outage_is_fatal() {
    let ai = MockAI::new().with_completion(r#"{"result": ["farmer"]}"#);
    let engine = BillSearch::new(MockStore::new().failing(), ai);

    let result = engine.search("I farm").await;
    assert!(matches!(result, Err(SearchError::Storage(_))));
}

#[tokio::test]
async fn test_embedding_outage_is_fatal() {
    let ai = MockAI::new()
        .with_completion(r#"{"result": ["farmer"]}"#)
        .failing_embeddings();
    let engine = BillSearch::new(MockStore::new(), ai);

    let result = engine.search("I farm").await;
    assert!(matches!(result, Err(SearchError::Embedding(_))));
    assert!(engine.store().searches().is_empty());
}

#[tokio::test]
async fn test_llm_outage_is_fatal() {
    let engine = BillSearch::new(MockStore::new(), MockAI::new().failing());
    assert!(matches!(engine.search("I farm").await, Err(SearchError::AI(_))));
}

#[tokio::test]
async fn test_topic_fallback_searches_raw_query() {
    let engine = engine(
        TestScenario::new()
            .with_facets(&[])
            .with_hit("water policy", 5, 0.7, "Western water compacts")
            .with_document(5, "Water Compact Act")
            .with_synthesis(synthesis(&[("Reshapes water compacts.", 77)]))
            .build(),
        SearchConfig::default().with_topic_fallback(true),
    );

    let results = engine.search("  water policy ").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document_id, 5);

    let searches = engine.store().searches();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].limit, 10);
    assert_eq!(searches[0].min_similarity, None);

    let (system, user) = &completions(engine.ai())[1];
    assert!(system.contains("policy question"));
    assert!(!user.contains("Matched facets"));
}

#[tokio::test]
async fn test_topic_strategy_uses_threshold_and_reranker() {
    let reranker = Arc::new(
        MockReranker::new()
            .with_score("Mentions irrigation once", 0.1)
            .with_score("Funds drought relief for farms", 0.9),
    );

    let (ai, store) = TestScenario::new()
        .with_facets(&["Which bills fund drought relief?"])
        .with_hit("Which bills fund drought relief?", 1, 0.95, "Mentions irrigation once")
        .with_hit("Which bills fund drought relief?", 2, 0.60, "Funds drought relief for farms")
        .with_document(1, "Omnibus")
        .with_document(2, "Drought Relief Act")
        .with_synthesis(synthesis(&[("Direct drought aid.", 90), ("Passing mention.", 20)]))
        .build();

    let engine = BillSearch::with_config(
        store,
        ai,
        SearchConfig::default().with_strategy(QueryStrategy::Topic),
    )
    .with_reranker(reranker.clone());

    let results = engine.search("drought help for farms").await.unwrap();

    let searches = engine.store().searches();
    assert_eq!(searches[0].limit, 10);
    assert_eq!(searches[0].min_similarity, Some(0.3));
    assert_eq!(reranker.calls().len(), 1);

    // Reranker order decides the shortlist, so position 1 is document 2
    assert_eq!(results[0].document_id, 2);
    assert_eq!(results[0].summary_point, "Direct drought aid.");
    assert_eq!(engine.store().detail_lookups(), vec![vec![2, 1]]);
}

#[tokio::test]
async fn test_reranker_failure_falls_back_to_composite() {
    let (ai, store) = TestScenario::new()
        .with_facets(&["q"])
        .with_hit("q", 1, 0.95, "a")
        .with_hit("q", 2, 0.60, "b")
        .with_document(1, "One")
        .with_document(2, "Two")
        .with_synthesis(synthesis(&[("One.", 50), ("Two.", 40)]))
        .build();

    let engine = BillSearch::with_config(
        store,
        ai,
        SearchConfig::default().with_strategy(QueryStrategy::Topic),
    )
    .with_reranker(Arc::new(MockReranker::new().failing()));

    let results = engine.search("question").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(engine.store().detail_lookups(), vec![vec![1, 2]]);
}

#[tokio::test]
async fn test_persona_strategy_ignores_reranker() {
    let reranker = Arc::new(MockReranker::new());
    let (ai, store) = TestScenario::new()
        .with_facets(&["farmer"])
        .with_hit("farmer", 1, 0.9, "a")
        .with_document(1, "One")
        .with_synthesis(synthesis(&[("One.", 50)]))
        .build();

    let engine = BillSearch::new(store, ai).with_reranker(reranker.clone());
    engine.search("I farm").await.unwrap();

    assert!(reranker.calls().is_empty());
}

#[tokio::test]
async fn test_timeout_wraps_pipeline() {
    let ai = MockAI::new()
        .with_completion(r#"{"result": ["farmer"]}"#)
        .with_delay(Duration::from_millis(200));
    let engine = BillSearch::new(MockStore::new(), ai);

    let result = engine
        .search_with_timeout("I farm", Duration::from_millis(10))
        .await;

    assert!(matches!(result, Err(SearchError::Timeout(_))));
}

#[tokio::test]
async fn test_embedding_cache_reused_across_queries() {
    let ai = MockAI::new()
        .with_completion(r#"{"result": ["farmer", "veteran"]}"#)
        .with_completion(r#"{"result": ["veteran", "farmer"]}"#);
    let store = MockStore::new().with_document(DocumentDetail::new(1, "t", "s"));
    let engine = BillSearch::new(store, ai).with_embedding_cache();

    engine.search("first").await.unwrap();
    engine.search("second").await.unwrap();

    assert_eq!(engine.ai().embed_calls(), 1);
    assert_eq!(engine.embedding_cache().map(|c| c.len()), Some(2));
    assert_eq!(engine.store().searches().len(), 4);
}

#[tokio::test]
async fn test_store_hit_limit_respected() {
    let mut hits = Vec::new();
    for id in 1..=9 {
        hits.push(ChunkHit::new(id, 0.5, "x"));
    }
    let ai = MockAI::new()
        .with_completion(r#"{"result": ["farmer"]}"#)
        .with_embedding("farmer", vec![1.0, 0.0]);
    let store = MockStore::new().with_hits(vec![1.0, 0.0], hits);
    let engine = BillSearch::new(store, ai);

    engine.search("I farm").await.unwrap();

    // Default per-facet cap is 5, so only five documents reach the lookup
    assert_eq!(engine.store().detail_lookups()[0].len(), 5);
}
