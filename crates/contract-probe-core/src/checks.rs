// crates/contract-probe-core/src/checks.rs
// ============================================================================
// Module: Composable Checks
// Description: Small predicates over status codes, headers, and JSON bodies.
// Purpose: Share one implementation of every contract rule across contracts.
// Dependencies: reqwest (header types), semver, serde_json
// ============================================================================

//! ## Overview
//! Each function validates a single rule and returns [`CheckError`] naming the
//! location, the expected value, and the observed value. Body shapes and
//! contracts are composed from these functions rather than re-implementing
//! the rule per endpoint.
//!
//! Paths follow a dotted notation rooted at [`ROOT_PATH`], for example
//! `body.data[2].slug`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use reqwest::header::HeaderMap;
use serde_json::Map;
use serde_json::Value;

use crate::error::CheckError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path label of the response body root.
pub const ROOT_PATH: &str = "body";
/// CORS origin header every CORS-enabled response must carry.
pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
/// CORS preflight methods header.
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
/// CORS preflight headers header.
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
/// Maximum number of characters of an observed value echoed into diagnostics.
const MAX_PREVIEW_CHARS: usize = 120;

// ============================================================================
// SECTION: Status and Headers
// ============================================================================

/// Checks that the observed status code matches the contract.
///
/// # Errors
///
/// Returns [`CheckError::Protocol`] on mismatch.
pub const fn status_equals(expected: u16, actual: u16) -> Result<(), CheckError> {
    if expected == actual {
        Ok(())
    } else {
        Err(CheckError::Protocol {
            expected,
            actual,
        })
    }
}

/// Checks that a header is present, non-empty, and optionally contains a substring.
///
/// # Errors
///
/// Returns [`CheckError::Cors`] when the header is missing, blank, or lacks
/// the required substring.
pub fn has_header(
    headers: &HeaderMap,
    name: &str,
    must_contain: Option<&str>,
) -> Result<(), CheckError> {
    let Some(value) = headers.get(name) else {
        return Err(CheckError::cors(name, "is missing"));
    };
    let text = String::from_utf8_lossy(value.as_bytes());
    if text.trim().is_empty() {
        return Err(CheckError::cors(name, "is empty"));
    }
    if let Some(needle) = must_contain
        && !text.contains(needle)
    {
        return Err(CheckError::cors(
            name,
            format!("does not contain \"{needle}\" (got \"{}\")", preview_text(&text)),
        ));
    }
    Ok(())
}

/// Checks that the CORS origin header is present and non-empty.
///
/// # Errors
///
/// Returns [`CheckError::Cors`] when the origin header is missing or blank.
pub fn has_cors(headers: &HeaderMap) -> Result<(), CheckError> {
    has_header(headers, ALLOW_ORIGIN, None)
}

// ============================================================================
// SECTION: Body Accessors
// ============================================================================

/// Parses a response body as JSON.
///
/// # Errors
///
/// Returns [`CheckError::Schema`] when the body is empty or not valid JSON.
pub fn json_body(bytes: &[u8]) -> Result<Value, CheckError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(CheckError::schema(ROOT_PATH, "JSON document", "empty body"));
    }
    serde_json::from_slice(bytes).map_err(|err| {
        let text = String::from_utf8_lossy(bytes);
        CheckError::schema(
            ROOT_PATH,
            "JSON document",
            format!("invalid JSON ({err}): {}", preview_text(&text)),
        )
    })
}

/// Requires `value` to be a JSON object.
///
/// # Errors
///
/// Returns [`CheckError::Schema`] naming the observed JSON type otherwise.
pub fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, CheckError> {
    value.as_object().ok_or_else(|| CheckError::schema(path, "object", type_name(value)))
}

/// Requires `value` to be a JSON array.
///
/// # Errors
///
/// Returns [`CheckError::Schema`] naming the observed JSON type otherwise.
pub fn expect_array<'a>(value: &'a Value, path: &str) -> Result<&'a [Value], CheckError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| CheckError::schema(path, "array", type_name(value)))
}

/// Returns a field of `object`, failing when it is absent.
///
/// # Errors
///
/// Returns [`CheckError::Schema`] when `key` is missing.
pub fn expect_field<'a>(
    object: &'a Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<&'a Value, CheckError> {
    object
        .get(key)
        .ok_or_else(|| CheckError::schema(child_path(path, key), "field to be present", "missing"))
}

// ============================================================================
// SECTION: Body Predicates
// ============================================================================

/// Checks that `object` contains every key in `keys` (superset semantics).
///
/// # Errors
///
/// Returns [`CheckError::Schema`] listing all missing keys in sorted order.
pub fn has_keys(object: &Map<String, Value>, path: &str, keys: &[&str]) -> Result<(), CheckError> {
    let missing: BTreeSet<&str> =
        keys.iter().copied().filter(|key| !object.contains_key(*key)).collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(CheckError::schema(
        path,
        format!("keys {}", key_list(keys.iter().copied())),
        format!("missing {}", key_list(missing.into_iter())),
    ))
}

/// Checks that `object` has exactly the keys in `keys`.
///
/// # Errors
///
/// Returns [`CheckError::Schema`] when keys are missing or unexpected keys exist.
pub fn has_exact_keys(
    object: &Map<String, Value>,
    path: &str,
    keys: &[&str],
) -> Result<(), CheckError> {
    has_keys(object, path, keys)?;
    let expected: BTreeSet<&str> = keys.iter().copied().collect();
    let extra: BTreeSet<&str> =
        object.keys().map(String::as_str).filter(|key| !expected.contains(key)).collect();
    if extra.is_empty() {
        return Ok(());
    }
    Err(CheckError::schema(
        path,
        format!("exactly keys {}", key_list(expected.into_iter())),
        format!("unexpected {}", key_list(extra.into_iter())),
    ))
}

/// Checks that `object[key]` equals `expected`.
///
/// # Errors
///
/// Returns [`CheckError::Schema`] when the field is missing or differs.
pub fn field_equals(
    object: &Map<String, Value>,
    path: &str,
    key: &str,
    expected: &Value,
) -> Result<(), CheckError> {
    let actual = expect_field(object, path, key)?;
    if actual == expected {
        return Ok(());
    }
    Err(CheckError::schema(child_path(path, key), preview(expected), preview(actual)))
}

/// Checks that an array has exactly `expected` elements.
///
/// # Errors
///
/// Returns [`CheckError::Schema`] reporting the expected and observed counts.
pub fn array_len(items: &[Value], path: &str, expected: usize) -> Result<(), CheckError> {
    if items.len() == expected {
        return Ok(());
    }
    Err(CheckError::schema(
        path,
        format!("array length {expected}"),
        format!("array length {}", items.len()),
    ))
}

/// Checks that `value` is a string containing `needle`, ignoring case.
///
/// # Errors
///
/// Returns [`CheckError::Schema`] when `value` is not a string or lacks the needle.
pub fn string_contains_ci(value: &Value, path: &str, needle: &str) -> Result<(), CheckError> {
    let Some(text) = value.as_str() else {
        return Err(CheckError::schema(path, "string", type_name(value)));
    };
    if text.to_lowercase().contains(&needle.to_lowercase()) {
        return Ok(());
    }
    Err(CheckError::schema(
        path,
        format!("string containing \"{needle}\""),
        preview(value),
    ))
}

/// Checks that `value` is a semantic-version string such as `1.0.0`.
///
/// # Errors
///
/// Returns [`CheckError::Schema`] when `value` is not a string or not a version.
pub fn semver_like(value: &Value, path: &str) -> Result<(), CheckError> {
    let Some(text) = value.as_str() else {
        return Err(CheckError::schema(path, "semantic version string", type_name(value)));
    };
    semver::Version::parse(text)
        .map(|_| ())
        .map_err(|_| CheckError::schema(path, "semantic version string", preview(value)))
}

/// Checks that two string sets are equal.
///
/// # Errors
///
/// Returns [`CheckError::Schema`] listing both sets when they differ.
pub fn string_set_equals(
    actual: &BTreeSet<String>,
    expected: &BTreeSet<String>,
    path: &str,
) -> Result<(), CheckError> {
    if actual == expected {
        return Ok(());
    }
    Err(CheckError::schema(
        path,
        format!("set {}", key_list(expected.iter().map(String::as_str))),
        format!("set {}", key_list(actual.iter().map(String::as_str))),
    ))
}

// ============================================================================
// SECTION: Path and Preview Helpers
// ============================================================================

/// Returns the path of a named child of `parent`.
#[must_use]
pub fn child_path(parent: &str, key: &str) -> String {
    format!("{parent}.{key}")
}

/// Returns the path of an array element of `parent`.
#[must_use]
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// Renders a JSON value compactly, truncated for diagnostics.
#[must_use]
pub fn preview(value: &Value) -> String {
    preview_text(&value.to_string())
}

/// Returns the JSON type name of `value`.
#[must_use]
pub const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Truncates text to [`MAX_PREVIEW_CHARS`] characters.
fn preview_text(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(MAX_PREVIEW_CHARS).collect();
    if chars.next().is_some() { format!("{head}...") } else { head }
}

/// Formats keys as `[a, b, c]`.
fn key_list<'a>(keys: impl Iterator<Item = &'a str>) -> String {
    let joined: Vec<&str> = keys.collect();
    format!("[{}]", joined.join(", "))
}
