// crates/contract-probe-core/src/tests/checks.rs
// ============================================================================
// Module: Check Predicate Tests
// Description: Unit tests for status, header, and JSON body predicates.
// Purpose: Pin diagnostics to expected-vs-observed values.
// Dependencies: contract-probe-core checks
// ============================================================================

use std::collections::BTreeSet;

use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use serde_json::json;

use crate::checks;
use crate::checks::ALLOW_METHODS;
use crate::checks::ROOT_PATH;
use crate::error::CheckError;
use crate::error::FailureKind;

fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    map
}

#[test]
fn status_equals_reports_expected_and_actual() {
    assert!(checks::status_equals(200, 200).is_ok());
    let err = checks::status_equals(404, 200).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Protocol);
    assert_eq!(err.to_string(), "status mismatch: expected 404, got 200");
}

#[test]
fn has_cors_accepts_any_non_empty_origin() {
    let map = headers(&[("access-control-allow-origin", "*")]);
    assert!(checks::has_cors(&map).is_ok());
}

#[test]
fn has_cors_rejects_missing_and_blank_origin() {
    let err = checks::has_cors(&HeaderMap::new()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Cors);
    assert!(err.to_string().contains("Access-Control-Allow-Origin is missing"));

    let blank = headers(&[("access-control-allow-origin", " ")]);
    let err = checks::has_cors(&blank).unwrap_err();
    assert!(err.to_string().contains("is empty"));
}

#[test]
fn has_header_requires_substring_when_declared() {
    let map = headers(&[("access-control-allow-methods", "POST, PUT")]);
    let err = checks::has_header(&map, ALLOW_METHODS, Some("GET")).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Access-Control-Allow-Methods"), "{message}");
    assert!(message.contains("does not contain \"GET\""), "{message}");
    assert!(message.contains("POST, PUT"), "{message}");

    let ok = headers(&[("access-control-allow-methods", "GET, POST, OPTIONS")]);
    assert!(checks::has_header(&ok, ALLOW_METHODS, Some("GET")).is_ok());
}

#[test]
fn json_body_rejects_empty_and_malformed_bodies() {
    let err = checks::json_body(b"  ").unwrap_err();
    assert_eq!(err, CheckError::schema(ROOT_PATH, "JSON document", "empty body"));

    let err = checks::json_body(b"<html>oops</html>").unwrap_err();
    assert_eq!(err.kind(), FailureKind::Schema);
    assert!(err.to_string().contains("invalid JSON"));
    assert!(err.to_string().contains("<html>oops</html>"));

    assert_eq!(checks::json_body(br#"{"a":1}"#).unwrap(), json!({"a": 1}));
}

#[test]
fn expect_object_names_observed_type() {
    let value = json!([1, 2]);
    let err = checks::expect_object(&value, "body.data").unwrap_err();
    assert_eq!(err.to_string(), "schema error at body.data: expected object, got array");
}

#[test]
fn has_keys_lists_missing_keys_sorted() {
    let value = json!({"slug": "a", "title": "b"});
    let object = value.as_object().unwrap();
    assert!(checks::has_keys(object, "body.data", &["slug"]).is_ok());
    let err = checks::has_keys(object, "body.data", &["tags", "slug", "icon"]).unwrap_err();
    assert!(err.to_string().contains("missing [icon, tags]"), "{err}");
}

#[test]
fn has_exact_keys_rejects_extra_keys() {
    let value = json!({"success": true, "message": "x", "version": "1.0.0", "debug": 1});
    let object = value.as_object().unwrap();
    let err =
        checks::has_exact_keys(object, ROOT_PATH, &["success", "message", "version"]).unwrap_err();
    assert!(err.to_string().contains("unexpected [debug]"), "{err}");
}

#[test]
fn field_equals_shows_both_values() {
    let value = json!({"slug": "combat-system"});
    let object = value.as_object().unwrap();
    let err =
        checks::field_equals(object, "body.data", "slug", &json!("npc-factory")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "schema error at body.data.slug: expected \"npc-factory\", got \"combat-system\""
    );
}

#[test]
fn array_len_reports_counts() {
    let items = vec![json!({}), json!({})];
    let err = checks::array_len(&items, "body.data", 3).unwrap_err();
    assert_eq!(
        err.to_string(),
        "schema error at body.data: expected array length 3, got array length 2"
    );
}

#[test]
fn string_contains_ci_ignores_case() {
    assert!(checks::string_contains_ci(&json!("System Not Found"), "body.error", "not found").is_ok());
    let err = checks::string_contains_ci(&json!("gone"), "body.error", "not found").unwrap_err();
    assert!(err.to_string().contains("string containing \"not found\""));
    let err = checks::string_contains_ci(&json!(404), "body.error", "not found").unwrap_err();
    assert!(err.to_string().contains("expected string, got number"));
}

#[test]
fn semver_like_accepts_versions_only() {
    assert!(checks::semver_like(&json!("1.0.0"), "body.version").is_ok());
    assert!(checks::semver_like(&json!("2.10.3-beta.1"), "body.version").is_ok());
    assert!(checks::semver_like(&json!("v1"), "body.version").is_err());
    assert!(checks::semver_like(&json!(1), "body.version").is_err());
}

#[test]
fn string_set_equals_ignores_order() {
    let expected: BTreeSet<String> = ["a", "b"].iter().map(|s| (*s).to_string()).collect();
    let same: BTreeSet<String> = ["b", "a"].iter().map(|s| (*s).to_string()).collect();
    assert!(checks::string_set_equals(&same, &expected, "body.data[*].slug").is_ok());
    let other: BTreeSet<String> = ["a", "c"].iter().map(|s| (*s).to_string()).collect();
    let err = checks::string_set_equals(&other, &expected, "body.data[*].slug").unwrap_err();
    assert!(err.to_string().contains("expected set [a, b], got set [a, c]"), "{err}");
}

#[test]
fn preview_truncates_long_values() {
    let long = "x".repeat(500);
    let rendered = checks::preview(&json!(long));
    assert!(rendered.ends_with("..."));
    assert!(rendered.chars().count() <= 123);
}
