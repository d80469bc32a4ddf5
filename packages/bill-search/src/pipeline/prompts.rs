//! LLM prompts for the search pipeline.
//!
//! Decomposition prompts are few-shot: the examples establish both the JSON
//! wrapping and the "return an empty list for vague input" contract.

use crate::types::candidate::DetailedCandidate;
use crate::types::config::QueryStrategy;

/// System prompt for persona facet extraction.
pub const PERSONA_FACETS_PROMPT: &str = r#"You turn a person's description of themselves into search facets for a database of legislation.

Extract distinct, concise attributes such as demographics, occupations, interests, locations, family and financial situations, and concerns.
Attributes must be factual and suitable for semantic search.

- If the description is detailed, extract multiple attributes.
- If it is vague, nonsensical, or carries no usable information (e.g. "I'm a person"), return an empty list.

Persona: "I'm a 45-year-old software engineer living in California, married with two kids. I served in the army for 8 years and am very concerned about climate change."
Result: {"result": ["software engineer", "California resident", "parent", "military veteran", "concern about climate change"]}

Persona: "Tell me what's relevant to me."
Result: {"result": []}

Return ONLY a JSON object with the list of strings under the key "result"."#;

/// System prompt for topic sub-question generation.
pub const TOPIC_QUESTIONS_PROMPT: &str = r#"You turn a question about public policy into concrete search questions for a database of legislation.

Write 3 to 5 specific questions a person asking this would want answered by a bill, each self-contained and suitable for semantic search.

- If the input is vague, nonsensical, or not about any policy area, return an empty list.

Query: "How will new rules affect small farms that rely on river irrigation?"
Result: {"result": ["Which bills change water rights for agricultural irrigation?", "Which bills fund drought relief for small farms?", "Which bills regulate water withdrawals from rivers?"]}

Query: "hello"
Result: {"result": []}

Return ONLY a JSON object with the list of strings under the key "result"."#;

/// User prompt wrapping the raw query for decomposition.
pub const DECOMPOSE_USER_PROMPT: &str = r#"Input: "{query}""#;

/// System prompt for persona synthesis.
pub const PERSONA_SYNTHESIS_PROMPT: &str = r#"You are a concise US policy analyst. You receive a user's description of themselves and a numbered list of candidate bills.

For each candidate, write one sentence explaining why the bill matters to this person, and a relevance score.
Base the score on how direct and significant the impact on this specific person is. A bill naming a post office after a veteran matters less to a veteran than one changing their healthcare benefits.
Use only the information provided. Do not invent provisions, numbers, or effects.

Output a JSON object with one key "results" holding an array with exactly one object per candidate, in the order given.
Each object has two keys: "summary_point" (string) and "relevance_score" (integer 0-100)."#;

/// System prompt for topic synthesis.
pub const TOPIC_SYNTHESIS_PROMPT: &str = r#"You are a concise US policy analyst. You receive a user's policy question and a numbered list of candidate bills.

For each candidate, write one sentence explaining how the bill relates to the question, and a relevance score.
Base the score on how directly and significantly the bill addresses the question.
Use only the information provided. Do not invent provisions, numbers, or effects.

Output a JSON object with one key "results" holding an array with exactly one object per candidate, in the order given.
Each object has two keys: "summary_point" (string) and "relevance_score" (integer 0-100)."#;

/// User prompt for synthesis.
pub const SYNTHESIS_USER_PROMPT: &str = r#"{label}: "{query}"

Candidates:
{candidates}
Return one object per candidate, in the same order. Do not include bill ids in your output."#;

/// System prompt for the decomposition step of a strategy.
pub fn decompose_system_prompt(strategy: QueryStrategy) -> &'static str {
    match strategy {
        QueryStrategy::Persona => PERSONA_FACETS_PROMPT,
        QueryStrategy::Topic => TOPIC_QUESTIONS_PROMPT,
    }
}

/// Format the decomposition user prompt.
pub fn format_decompose_prompt(query: &str) -> String {
    fill_template(DECOMPOSE_USER_PROMPT, &[("query", query)])
}

/// System prompt for the synthesis step of a strategy.
pub fn synthesis_system_prompt(strategy: QueryStrategy) -> &'static str {
    match strategy {
        QueryStrategy::Persona => PERSONA_SYNTHESIS_PROMPT,
        QueryStrategy::Topic => TOPIC_SYNTHESIS_PROMPT,
    }
}

/// Format the synthesis user prompt.
///
/// Matched facets are listed only on the persona path.
pub fn format_synthesis_prompt(
    query: &str,
    strategy: QueryStrategy,
    candidates: &[DetailedCandidate],
    snippet_max_bytes: usize,
) -> String {
    let candidates_text = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format_candidate(i + 1, c, strategy, snippet_max_bytes))
        .collect::<String>();

    let label = match strategy {
        QueryStrategy::Persona => "User persona",
        QueryStrategy::Topic => "User query",
    };

    fill_template(
        SYNTHESIS_USER_PROMPT,
        &[("label", label), ("query", query), ("candidates", &candidates_text)],
    )
}

/// Substitute `{name}` placeholders in one pass over the template.
///
/// Substituted values are never rescanned, so braces inside a query or a
/// bill summary come through literally.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];

        let matched = values
            .iter()
            .find(|(name, _)| tail.starts_with(name) && tail[name.len()..].starts_with('}'));

        match matched {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

fn format_candidate(
    number: usize,
    entry: &DetailedCandidate,
    strategy: QueryStrategy,
    snippet_max_bytes: usize,
) -> String {
    let detail = &entry.detail;
    let mut out = format!("Candidate {}:\n- Bill ID: {}\n", number, detail.document_id);
    if let Some(short_name) = &detail.short_name {
        out.push_str(&format!("- Bill: {}\n", short_name));
    }
    out.push_str(&format!("- Title: {}\n- Summary: {}\n", detail.title, detail.summary));
    if strategy == QueryStrategy::Persona {
        let facets: Vec<&str> = entry.candidate.matched_facets.iter().map(String::as_str).collect();
        out.push_str(&format!("- Matched facets: {}\n", facets.join(", ")));
    }
    out.push_str(&format!(
        "- Most relevant snippet: \"{}\"\n\n",
        truncate_to_char_boundary(&entry.candidate.best_chunk_text, snippet_max_bytes)
    ));
    out
}

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}
