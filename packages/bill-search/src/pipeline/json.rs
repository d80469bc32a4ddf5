//! Defensive decoding of generative JSON output.
//!
//! Models asked for "a JSON array" in JSON mode wrap it in an object under
//! whatever key they like (`{"result": [...]}`, `{"facets": [...]}`, ...).
//! Every stage that reads model output goes through [`first_array`].

use serde_json::Value;
use thiserror::Error;

/// Why a model answer carried no usable array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedOutput {
    /// No content, or only whitespace
    #[error("empty response")]
    Empty,

    /// Not parseable as JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Valid JSON without an array at the top level
    #[error("no array in response")]
    NoArray,
}

/// Find the array a model answer carries.
///
/// Accepts a bare top-level array, or the first array-valued member of a
/// top-level object in the order the model wrote the keys. A surrounding
/// markdown code fence is ignored.
pub fn first_array(raw: Option<&str>) -> Result<Vec<Value>, MalformedOutput> {
    let text = strip_code_fence(raw.unwrap_or_default());
    if text.is_empty() {
        return Err(MalformedOutput::Empty);
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| MalformedOutput::InvalidJson(e.to_string()))?;

    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) => map
            .into_iter()
            .find_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .ok_or(MalformedOutput::NoArray),
        _ => Err(MalformedOutput::NoArray),
    }
}

/// Unwrap a markdown code fence, dropping its info string (`json`, `JSON`, ...).
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };

    // The info string runs to the end of the opening line
    let body = match body.find('\n') {
        Some(newline) if !body[..newline].trim_start().starts_with(['{', '[']) => {
            &body[newline + 1..]
        }
        Some(_) => body,
        None => body.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    body.trim_end().trim_end_matches("```").trim()
}
