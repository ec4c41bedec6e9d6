//! Normalize model completions into categorized results
//!
//! Models are told to answer with bare JSON but regularly wrap it in markdown
//! fences or surround it with prose. The normalizer takes two passes:
//!
//! 1. strip an optional code fence and parse what is left;
//! 2. if that fails to parse or validate, look for an embedded JSON object.
//!
//! Embedded objects are found with a string-aware balanced-brace scan, so
//! stray braces in surrounding prose do not swallow the real object. The
//! greedy first-`{`-to-last-`}` span is tried last.

use crate::error::AnalysisError;
use serde_json::Value;
use std::fmt;
use termsense_domain::{CategorizedResult, SchemaViolation};
use tracing::{debug, warn};

/// Maximum number of characters of the completion kept in parse errors
pub const EXCERPT_CHARS: usize = 200;

const FENCE: &str = "```";

/// Turn raw completion text into a validated result
///
/// # Errors
///
/// [`AnalysisError::ResponseParse`] if neither pass yields a valid six-key
/// object. The error carries a bounded excerpt, never the full completion.
pub fn normalize_response(completion: &str) -> Result<CategorizedResult, AnalysisError> {
    let candidate = strip_code_fence(completion);

    let failure = match parse_and_validate(candidate) {
        Ok(result) => return Ok(result),
        Err(failure) => failure,
    };

    match &failure {
        ParseFailure::Schema(violation) => debug!(
            failed = ?violation.failed_categories(),
            missing_keys = violation.has_missing_keys(),
            "Direct parse failed schema validation, scanning for an embedded object"
        ),
        ParseFailure::Json(e) => debug!(
            "Direct parse failed ({}), scanning for an embedded object",
            e
        ),
    }

    if let Some(result) = extract_embedded_object(completion) {
        warn!("Recovered JSON object embedded in surrounding text");
        return Ok(result);
    }

    Err(AnalysisError::ResponseParse {
        reason: failure.to_string(),
        excerpt: excerpt(completion, EXCERPT_CHARS),
    })
}

/// Why a candidate string did not produce a result
#[derive(Debug)]
enum ParseFailure {
    Json(serde_json::Error),
    Schema(SchemaViolation),
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::Json(e) => write!(f, "invalid JSON: {}", e),
            ParseFailure::Schema(v) => write!(f, "{}", v),
        }
    }
}

fn parse_and_validate(candidate: &str) -> Result<CategorizedResult, ParseFailure> {
    let value: Value = serde_json::from_str(candidate).map_err(ParseFailure::Json)?;
    CategorizedResult::from_value(&value).map_err(ParseFailure::Schema)
}

/// Remove a surrounding markdown code fence, with or without a language tag
///
/// Text that does not start with a fence is returned trimmed and otherwise
/// untouched.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    // Language tag directly after the opening fence (```json, ```JSON, ```json5)
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let rest = rest.trim_end();
    let rest = rest.strip_suffix(FENCE).unwrap_or(rest);
    rest.trim()
}

/// Second pass: first embedded object that parses and validates
fn extract_embedded_object(text: &str) -> Option<CategorizedResult> {
    for span in balanced_object_spans(text) {
        if let Ok(result) = parse_and_validate(span) {
            return Some(result);
        }
    }

    // Same span the first-brace/last-brace heuristic would pick
    greedy_object_span(text).and_then(|span| parse_and_validate(span).ok())
}

/// Outermost balanced `{...}` spans, in order of appearance
///
/// Braces inside JSON string literals are ignored. An opening brace that is
/// never closed does not hide balanced objects that follow it. Runs in a
/// single pass over the text.
pub fn balanced_object_spans(text: &str) -> Vec<&str> {
    let mut open = Vec::new();
    let mut closed = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    // Bytes are fine here: every delimiter is ASCII, so indices always fall
    // on char boundaries.
    for (i, b) in text.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            // Quotes in prose outside any object are not string delimiters
            b'"' if !open.is_empty() => in_string = true,
            b'{' => open.push(i),
            b'}' => {
                if let Some(start) = open.pop() {
                    closed.push((start, i));
                }
            }
            _ => {}
        }
    }

    // Nested spans close before their parent; keep only the outermost
    closed.sort_unstable_by_key(|&(start, _)| start);
    let mut spans = Vec::new();
    let mut covered_to = None;
    for (start, end) in closed {
        if covered_to.is_some_and(|to| start < to) {
            continue;
        }
        spans.push(&text[start..=end]);
        covered_to = Some(end);
    }

    spans
}

/// Span from the first `{` to the last `}`, inclusive
pub fn greedy_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// First `max_chars` characters of `text`, with `...` when truncated
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
