// crates/contract-probe-core/src/tests/catalog.rs
// ============================================================================
// Module: Catalog Tests
// Description: Unit tests for catalog loading, validation, and contract table.
// Purpose: Pin the contract order and the body shapes of each endpoint.
// Dependencies: contract-probe-core catalog, tempfile
// ============================================================================

use std::io::Write;

use serde_json::Value;
use serde_json::json;

use crate::catalog;
use crate::catalog::CatalogError;
use crate::catalog::CatalogSpec;
use crate::catalog::DEFAULT_SLUGS;
use crate::catalog::MAX_CATALOG_FILE_BYTES;
use crate::catalog::SYSTEM_FIELDS;
use crate::contract::HttpMethod;
use crate::error::FailureKind;

fn record(slug: &str) -> Value {
    let mut object = serde_json::Map::new();
    for field in SYSTEM_FIELDS {
        object.insert(field.to_string(), json!("x"));
    }
    object.insert("slug".to_string(), json!(slug));
    Value::Object(object)
}

fn fields() -> Vec<String> {
    SYSTEM_FIELDS.iter().map(|field| (*field).to_string()).collect()
}

fn slugs() -> Vec<String> {
    DEFAULT_SLUGS.iter().map(|slug| (*slug).to_string()).collect()
}

// ============================================================================
// SECTION: Validation
// ============================================================================

#[test]
fn default_catalog_validates() {
    CatalogSpec::default().validate().unwrap();
}

#[test]
fn empty_toml_yields_default_catalog() {
    assert_eq!(CatalogSpec::from_toml_str("").unwrap(), CatalogSpec::default());
}

#[test]
fn toml_overrides_selected_fields() {
    let catalog = CatalogSpec::from_toml_str(
        r#"
product_name = "Demo"
slugs = ["alpha", "beta"]
unknown_slug = "ghost-slug"
expected_version = "2.1.0"
"#,
    )
    .unwrap();
    assert_eq!(catalog.product_name, "Demo");
    assert_eq!(catalog.slugs, vec!["alpha".to_string(), "beta".to_string()]);
    assert_eq!(catalog.api_prefix, "/api");
    assert_eq!(catalog.required_fields.len(), SYSTEM_FIELDS.len());
    assert_eq!(catalog.expected_version.as_deref(), Some("2.1.0"));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = CatalogSpec::from_toml_str("produkt_name = \"typo\"").unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)), "{err}");
}

#[test]
fn validation_rejects_inconsistent_catalogs() {
    let cases: [(&str, &str); 8] = [
        ("product_name = \" \"", "product_name"),
        ("api_prefix = \"api\"", "api_prefix"),
        ("slugs = []", "at least one system"),
        ("slugs = [\"a\", \"a\"]", "listed twice"),
        ("slugs = [\"bad slug\"]", "must match"),
        ("required_fields = []", "at least one field"),
        ("unknown_slug = \"npc-factory\"", "is a known slug"),
        ("expected_version = \"v1\"", "not a semantic version"),
    ];
    for (toml, needle) in cases {
        let err = CatalogSpec::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)), "{toml}: {err}");
        assert!(err.to_string().contains(needle), "{toml}: {err}");
    }
}

#[test]
fn unregistered_path_must_be_a_route() {
    let err = CatalogSpec::from_toml_str("unregistered_path = \"nowhere\"").unwrap_err();
    assert!(err.to_string().contains("unregistered_path"));
}

#[test]
fn load_reads_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "product_name = \"File Hub\"").unwrap();
    let catalog = CatalogSpec::load(file.path()).unwrap();
    assert_eq!(catalog.product_name, "File Hub");
}

#[test]
fn load_rejects_oversized_and_missing_files() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&vec![b'#'; MAX_CATALOG_FILE_BYTES + 1]).unwrap();
    let err = CatalogSpec::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("size limit"));

    let dir = tempfile::tempdir().unwrap();
    let err = CatalogSpec::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, CatalogError::Io(_)));
}

// ============================================================================
// SECTION: Contract Table
// ============================================================================

#[test]
fn default_table_is_ordered() {
    let contracts = CatalogSpec::default().contracts();
    let names: Vec<&str> = contracts.iter().map(|contract| contract.name()).collect();
    assert_eq!(
        names,
        vec![
            "health endpoint",
            "systems list",
            "system detail: movement-system",
            "system detail: npc-factory",
            "system detail: combat-system",
            "unknown system: nonexistent-system",
            "unregistered route: /nonexistent-route",
            "cors preflight: /systems",
        ]
    );
    let paths: Vec<&str> = contracts.iter().map(|contract| contract.path()).collect();
    assert_eq!(paths[0], "/health");
    assert_eq!(paths[5], "/systems/nonexistent-system");
    assert_eq!(paths[6], "/nonexistent-route");
    assert!(contracts.iter().all(|contract| contract.requires_cors()));
}

#[test]
fn preflight_requires_permission_headers() {
    let contract = catalog::preflight_contract("/systems");
    assert_eq!(contract.method(), HttpMethod::Options);
    assert_eq!(contract.expected_status(), 204);
    assert!(contract.body_shape().is_none());
    let headers: Vec<(&str, Option<&str>)> = contract
        .required_headers()
        .iter()
        .map(|rule| (rule.name.as_str(), rule.must_contain.as_deref()))
        .collect();
    assert_eq!(
        headers,
        vec![("Access-Control-Allow-Methods", Some("GET")), ("Access-Control-Allow-Headers", None)]
    );
}

#[test]
fn health_shape_accepts_product_message() {
    let contract = catalog::health_contract("X", None);
    let shape = contract.body_shape().unwrap();
    shape.verify(&json!({"success": true, "message": "X API", "version": "1.0.0"})).unwrap();
}

#[test]
fn health_shape_rejects_extra_keys_and_wrong_message() {
    let shape = catalog::health_contract("X", None).body_shape().cloned().unwrap();
    let err = shape
        .verify(&json!({"success": true, "message": "X API", "version": "1.0.0", "uptime": 3}))
        .unwrap_err();
    assert!(err.to_string().contains("unexpected [uptime]"));

    let err =
        shape.verify(&json!({"success": true, "message": "Y API", "version": "1.0.0"})).unwrap_err();
    assert!(err.to_string().contains("body.message"));
}

#[test]
fn health_shape_honors_pinned_version() {
    let shape = catalog::health_contract("X", Some("1.0.0")).body_shape().cloned().unwrap();
    let err =
        shape.verify(&json!({"success": true, "message": "X API", "version": "1.2.0"})).unwrap_err();
    assert!(err.to_string().contains("expected \"1.0.0\", got \"1.2.0\""), "{err}");
}

#[test]
fn systems_list_shape_checks_count_slugs_and_fields() {
    let shape = catalog::systems_list_contract(&slugs(), &fields()).body_shape().cloned().unwrap();
    let data: Vec<Value> = DEFAULT_SLUGS.iter().map(|slug| record(slug)).collect();
    shape.verify(&json!({"success": true, "data": data})).unwrap();

    let short = json!({"success": true, "data": [record("movement-system"), record("npc-factory")]});
    let err = shape.verify(&short).unwrap_err();
    assert!(err.to_string().contains("expected array length 3, got array length 2"));

    let renamed = json!({"success": true, "data": [
        record("movement-system"), record("npc-factory"), record("wave-system")
    ]});
    let err = shape.verify(&renamed).unwrap_err();
    assert!(err.to_string().contains("body.data[*].slug"), "{err}");

    let mut thin = record("combat-system");
    thin.as_object_mut().unwrap().remove("brawlNotes");
    let missing = json!({"success": true, "data": [
        record("movement-system"), record("npc-factory"), thin
    ]});
    let err = shape.verify(&missing).unwrap_err();
    assert!(err.to_string().contains("body.data[2]"), "{err}");
    assert!(err.to_string().contains("missing [brawlNotes]"), "{err}");
}

#[test]
fn systems_list_shape_tolerates_extra_fields() {
    let shape = catalog::systems_list_contract(&slugs(), &fields()).body_shape().cloned().unwrap();
    let mut combat = record("combat-system");
    combat.as_object_mut().unwrap().insert("thumbnail".to_string(), json!("https://img"));
    let body = json!({"success": true, "data": [
        record("movement-system"), record("npc-factory"), combat
    ]});
    shape.verify(&body).unwrap();
}

#[test]
fn detail_shape_requires_matching_slug() {
    let shape =
        catalog::system_detail_contract("npc-factory", &fields()).body_shape().cloned().unwrap();
    shape.verify(&json!({"success": true, "data": record("npc-factory")})).unwrap();
    let err = shape.verify(&json!({"success": true, "data": record("combat-system")})).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Schema);
    assert!(err.to_string().contains("body.data.slug"), "{err}");
    assert!(err.to_string().contains("\"combat-system\""), "{err}");
}

#[test]
fn not_found_shape_matches_error_envelope() {
    let contract = catalog::not_found_contract("unknown", "/systems/ghost");
    assert_eq!(contract.expected_status(), 404);
    let shape = contract.body_shape().cloned().unwrap();
    shape.verify(&json!({"success": false, "error": "System not found"})).unwrap();
    shape.verify(&json!({"success": false, "error": "Route NOT FOUND"})).unwrap();
    let err = shape.verify(&json!({"success": true, "error": "System not found"})).unwrap_err();
    assert!(err.to_string().contains("body.success"));
    let err = shape.verify(&json!({"success": false, "error": "gone"})).unwrap_err();
    assert!(err.to_string().contains("body.error"));
}
