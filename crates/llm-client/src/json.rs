//! Turning free-form completions into typed values.
//!
//! Chat models wrap JSON in Markdown fences, prepend "Here is the JSON:", or
//! trail an explanation. `parse_model_json` cuts the JSON body out of all of
//! those before deserializing. `format_instructions` is the other half: the
//! text appended to a prompt telling the model which shape to answer in.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::error::{LlmError, Result};

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("fenced block pattern is valid")
});

/// Locate the JSON document inside a model completion.
///
/// Preference order:
/// 1. The contents of the first fenced code block
/// 2. The `{ ... }` span, or the `[ ... ]` span when it encloses the object;
///    whichever of the two parses as JSON first
/// 3. The trimmed input as-is
pub fn extract_json(raw: &str) -> &str {
    if let Some(body) = FENCED_BLOCK.captures(raw).and_then(|c| c.get(1)) {
        return body.as_str().trim();
    }

    let candidates = match (span(raw, '{', '}'), span(raw, '[', ']')) {
        (Some(object), Some(array)) if array.0 < object.0 && array.1 > object.1 => {
            vec![array, object]
        }
        (Some(object), Some(array)) => vec![object, array],
        (Some(only), None) | (None, Some(only)) => vec![only],
        (None, None) => return raw.trim(),
    };

    let slices: Vec<&str> = candidates
        .into_iter()
        .map(|(start, end)| &raw[start..=end])
        .collect();
    slices
        .iter()
        .copied()
        .find(|slice| serde_json::from_str::<IgnoredAny>(slice).is_ok())
        .unwrap_or(slices[0])
}

/// Byte range from the first `open` to the last `close`, if well ordered.
fn span(raw: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    (end > start).then_some((start, end))
}

/// Deserialize a completion into `T`, tolerating surrounding prose and fences.
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let body = extract_json(raw);
    if body.is_empty() {
        return Err(LlmError::Parse("completion was empty".into()));
    }
    serde_json::from_str(body).map_err(|e| LlmError::Parse(e.to_string()))
}

/// Prompt suffix describing the JSON shape of `T`.
pub fn format_instructions<T: JsonSchema>() -> String {
    let schema = schemars::schema_for!(T);
    let schema = serde_json::to_string_pretty(&schema).unwrap_or_default();
    format!(
        "The output should be formatted as a JSON instance that conforms to the JSON schema below.\n\
         Return only the JSON, with no commentary.\n\n```json\n{schema}\n```"
    )
}
