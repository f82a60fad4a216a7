//! Pulls structured payloads out of free-form model output.
//!
//! Models are asked for strict JSON but regularly wrap it in prose or code
//! fences, so the outermost brace-delimited span is located first and only
//! that span is handed to `serde_json`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::models::exercise::ExerciseResult;

lazy_static! {
    static ref JSON_OBJECT: Regex = Regex::new(r"\{[\s\S]*\}").expect("valid regex");
    static ref HINT_FIELD: Regex =
        Regex::new(r#""hint"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid regex");
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResponseParseError {
    #[error("No JSON found in response")]
    NoJson,
    #[error("Malformed JSON in response: {0}")]
    Malformed(String),
    #[error("Missing {0} in response")]
    MissingField(&'static str),
    #[error("Empty response")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct RawExercise {
    #[serde(default)]
    exercise: Option<serde_json::Value>,
    #[serde(default)]
    answer: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawHint {
    #[serde(default)]
    hint: Option<serde_json::Value>,
}

/// Returns the span from the first `{` to the last `}`, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    JSON_OBJECT.find(text).map(|m| m.as_str())
}

pub fn parse_exercise(text: &str) -> Result<ExerciseResult, ResponseParseError> {
    let json = extract_json_object(text).ok_or(ResponseParseError::NoJson)?;
    let raw: RawExercise =
        serde_json::from_str(json).map_err(|e| ResponseParseError::Malformed(e.to_string()))?;

    let exercise = field_text(raw.exercise).ok_or(ResponseParseError::MissingField("exercise"))?;
    let answer = field_text(raw.answer).ok_or(ResponseParseError::MissingField("answer"))?;

    Ok(ExerciseResult { exercise, answer })
}

/// Accepts a JSON envelope with a `hint` field, a broken envelope from which
/// the `hint` value can still be recovered, or plain text.
pub fn parse_hint(text: &str) -> Result<String, ResponseParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ResponseParseError::Empty);
    }

    let Some(json) = extract_json_object(trimmed) else {
        return plain_text_hint(trimmed);
    };

    match serde_json::from_str::<RawHint>(json) {
        Ok(raw) => field_text(raw.hint).ok_or(ResponseParseError::MissingField("hint")),
        Err(e) => {
            if let Some(hint) = unwrap_hint_field(json) {
                return Ok(hint);
            }
            // Braces in ordinary prose, e.g. "group them like {3, 3}".
            tracing::debug!("Hint braces are not JSON ({}), using plain text", e);
            plain_text_hint(trimmed)
        }
    }
}

// Answers may legitimately be numbers ("answer": 8), so scalars are
// stringified; objects, arrays and blanks count as missing.
fn field_text(value: Option<serde_json::Value>) -> Option<String> {
    let text = match value? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn plain_text_hint(text: &str) -> Result<String, ResponseParseError> {
    if let Some(hint) = unwrap_hint_field(text) {
        return Ok(hint);
    }
    let hint = text
        .trim_matches(|c: char| c == '"' || c == '`' || c.is_whitespace())
        .to_string();
    if hint.is_empty() {
        Err(ResponseParseError::Empty)
    } else {
        Ok(hint)
    }
}

fn unwrap_hint_field(text: &str) -> Option<String> {
    let captured = HINT_FIELD.captures(text)?.get(1)?.as_str();
    // Reuse serde_json for escape handling.
    let decoded = serde_json::from_str::<String>(&format!("\"{}\"", captured))
        .unwrap_or_else(|_| captured.to_string());
    let decoded = decoded.trim();
    (!decoded.is_empty()).then(|| decoded.to_string())
}
