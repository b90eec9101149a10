// crates/contract-probe-core/src/catalog.rs
// ============================================================================
// Module: Systems Hub Catalog
// Description: Expected Systems Hub data and the contract table built from it.
// Purpose: Keep the fixed catalog as test data and derive every contract from it.
// Dependencies: serde, serde_json, thiserror, toml
// ============================================================================

//! ## Overview
//! [`CatalogSpec`] describes what the Systems Hub API is expected to serve:
//! the product name, the known system slugs, the per-system field schema, and
//! the probe paths used for negative checks. [`CatalogSpec::contracts`] turns
//! it into the ordered contract table:
//!
//! 1. health endpoint
//! 2. systems list
//! 3. one detail contract per known slug
//! 4. unknown slug (404)
//! 5. unregistered route (404)
//! 6. CORS preflight
//!
//! The built-in default mirrors the deployed catalog. A TOML file may replace
//! it; the catalog is never discovered from the server.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::checks;
use crate::checks::ALLOW_HEADERS;
use crate::checks::ALLOW_METHODS;
use crate::checks::ROOT_PATH;
use crate::contract::EndpointContract;
use crate::error::CheckError;
use crate::shape::BodyShape;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default product name; the health message is `"<product name> API"`.
pub const DEFAULT_PRODUCT_NAME: &str = "Roblox Systems Hub";
/// Default API prefix appended to the deployment URL.
pub const DEFAULT_API_PREFIX: &str = "/api";
/// Slugs served by the default catalog.
pub const DEFAULT_SLUGS: [&str; 3] = ["movement-system", "npc-factory", "combat-system"];
/// Fields every system record must carry.
pub const SYSTEM_FIELDS: [&str; 14] = [
    "slug",
    "title",
    "displayName",
    "description",
    "gradientFrom",
    "gradientTo",
    "icon",
    "devNotes",
    "repoUrl",
    "ytVideo",
    "waitTimeSeconds",
    "tags",
    "brawlNotes",
    "featured",
];
/// Default slug that must not exist.
pub const DEFAULT_UNKNOWN_SLUG: &str = "nonexistent-system";
/// Default path that no route serves.
pub const DEFAULT_UNREGISTERED_PATH: &str = "/nonexistent-route";
/// Maximum catalog file size in bytes.
pub const MAX_CATALOG_FILE_BYTES: usize = 64 * 1024;
/// Maximum number of slugs in a catalog.
const MAX_SLUGS: usize = 256;
/// Maximum number of required fields in a catalog.
const MAX_FIELDS: usize = 256;
/// Path of the systems collection.
const SYSTEMS_PATH: &str = "/systems";
/// Path of the health endpoint.
const HEALTH_PATH: &str = "/health";
/// Keys of the health body, which must match exactly.
const HEALTH_KEYS: [&str; 3] = ["success", "message", "version"];
/// Case-insensitive phrase every 404 error message contains.
const NOT_FOUND_PHRASE: &str = "not found";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Catalog loading and validation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// I/O failure while reading the catalog file.
    #[error("catalog io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("catalog parse error: {0}")]
    Parse(String),
    /// Invalid catalog data.
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Expected Systems Hub data.
///
/// # Invariants
/// - After [`CatalogSpec::validate`] succeeds: slugs are unique and non-empty,
///   the unknown slug is not a known slug, and all paths start with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSpec {
    /// Product name announced by the health endpoint.
    #[serde(default = "default_product_name")]
    pub product_name: String,
    /// API prefix appended to the deployment URL.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Known system slugs.
    #[serde(default = "default_slugs")]
    pub slugs: Vec<String>,
    /// Fields every system record must carry.
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<String>,
    /// Slug that must return 404.
    #[serde(default = "default_unknown_slug")]
    pub unknown_slug: String,
    /// Path that must return 404.
    #[serde(default = "default_unregistered_path")]
    pub unregistered_path: String,
    /// Exact version the health endpoint must report, when pinned.
    #[serde(default)]
    pub expected_version: Option<String>,
}

impl Default for CatalogSpec {
    fn default() -> Self {
        Self {
            product_name: default_product_name(),
            api_prefix: default_api_prefix(),
            slugs: default_slugs(),
            required_fields: default_required_fields(),
            unknown_slug: default_unknown_slug(),
            unregistered_path: default_unregistered_path(),
            expected_version: None,
        }
    }
}

impl CatalogSpec {
    /// Loads and validates a TOML catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file cannot be read, exceeds
    /// [`MAX_CATALOG_FILE_BYTES`], is not UTF-8, fails to parse, or is invalid.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = fs::read(path)
            .map_err(|err| CatalogError::Io(format!("{}: {err}", path.display())))?;
        if bytes.len() > MAX_CATALOG_FILE_BYTES {
            return Err(CatalogError::Invalid("catalog file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| CatalogError::Invalid("catalog file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates a TOML catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: Self =
            toml::from_str(content).map_err(|err| CatalogError::Parse(err.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validates the catalog for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] naming the first violated rule.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.product_name.trim().is_empty() {
            return Err(invalid("product_name must not be empty"));
        }
        if !self.api_prefix.is_empty() && !is_route_path(&self.api_prefix) {
            return Err(invalid("api_prefix must be empty or start with '/'"));
        }
        if self.slugs.is_empty() {
            return Err(invalid("slugs must list at least one system"));
        }
        if self.slugs.len() > MAX_SLUGS {
            return Err(invalid(format!("slugs exceeds {MAX_SLUGS} entries")));
        }
        let mut seen = BTreeSet::new();
        for slug in &self.slugs {
            if !is_slug(slug) {
                return Err(invalid(format!("slug \"{slug}\" must match [A-Za-z0-9_-]+")));
            }
            if !seen.insert(slug.as_str()) {
                return Err(invalid(format!("slug \"{slug}\" is listed twice")));
            }
        }
        if self.required_fields.is_empty() {
            return Err(invalid("required_fields must list at least one field"));
        }
        if self.required_fields.len() > MAX_FIELDS {
            return Err(invalid(format!("required_fields exceeds {MAX_FIELDS} entries")));
        }
        if self.required_fields.iter().any(|field| field.trim().is_empty()) {
            return Err(invalid("required_fields must not contain empty names"));
        }
        if !is_slug(&self.unknown_slug) {
            return Err(invalid("unknown_slug must match [A-Za-z0-9_-]+"));
        }
        if seen.contains(self.unknown_slug.as_str()) {
            return Err(invalid(format!(
                "unknown_slug \"{}\" is a known slug",
                self.unknown_slug
            )));
        }
        if !is_route_path(&self.unregistered_path) {
            return Err(invalid("unregistered_path must start with '/'"));
        }
        if let Some(version) = &self.expected_version
            && semver::Version::parse(version).is_err()
        {
            return Err(invalid(format!("expected_version \"{version}\" is not a semantic version")));
        }
        Ok(())
    }

    /// Builds the ordered contract table for this catalog.
    #[must_use]
    pub fn contracts(&self) -> Vec<EndpointContract> {
        let mut contracts = Vec::with_capacity(self.slugs.len() + 5);
        contracts.push(health_contract(&self.product_name, self.expected_version.as_deref()));
        contracts.push(systems_list_contract(&self.slugs, &self.required_fields));
        for slug in &self.slugs {
            contracts.push(system_detail_contract(slug, &self.required_fields));
        }
        contracts.push(not_found_contract(
            format!("unknown system: {}", self.unknown_slug),
            format!("{SYSTEMS_PATH}/{}", self.unknown_slug),
        ));
        contracts.push(not_found_contract(
            format!("unregistered route: {}", self.unregistered_path),
            self.unregistered_path.clone(),
        ));
        contracts.push(preflight_contract(SYSTEMS_PATH));
        contracts
    }
}

// ============================================================================
// SECTION: Contract Builders
// ============================================================================

/// `GET /health`: exact keys, success flag, product message, version.
#[must_use]
pub fn health_contract(product_name: &str, pinned_version: Option<&str>) -> EndpointContract {
    let message = Value::String(format!("{product_name} API"));
    let pinned = pinned_version.map(|version| Value::String(version.to_string()));
    let shape = BodyShape::new(move |body| {
        let object = checks::expect_object(body, ROOT_PATH)?;
        checks::has_exact_keys(object, ROOT_PATH, &HEALTH_KEYS)?;
        checks::field_equals(object, ROOT_PATH, "success", &Value::Bool(true))?;
        checks::field_equals(object, ROOT_PATH, "message", &message)?;
        let version = checks::expect_field(object, ROOT_PATH, "version")?;
        checks::semver_like(version, &checks::child_path(ROOT_PATH, "version"))?;
        if let Some(pinned) = &pinned {
            checks::field_equals(object, ROOT_PATH, "version", pinned)?;
        }
        Ok(())
    });
    EndpointContract::get("health endpoint", HEALTH_PATH).with_body(shape).require_cors()
}

/// `GET /systems`: envelope, record count, slug set, per-record fields.
#[must_use]
pub fn systems_list_contract(slugs: &[String], fields: &[String]) -> EndpointContract {
    let expected: BTreeSet<String> = slugs.iter().cloned().collect();
    let count = slugs.len();
    let fields = fields.to_vec();
    let shape = BodyShape::new(move |body| {
        let object = envelope(body, true, "data")?;
        let data_path = checks::child_path(ROOT_PATH, "data");
        let items = checks::expect_array(checks::expect_field(object, ROOT_PATH, "data")?, &data_path)?;
        checks::array_len(items, &data_path, count)?;
        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let item_path = checks::index_path(&data_path, index);
            records.push((item_path.clone(), checks::expect_object(item, &item_path)?));
        }
        let observed: BTreeSet<String> =
            records.iter().map(|(_, record)| slug_text(record.get("slug"))).collect();
        checks::string_set_equals(&observed, &expected, &format!("{data_path}[*].slug"))?;
        let field_names = as_strs(&fields);
        for (item_path, record) in &records {
            checks::has_keys(record, item_path, &field_names)?;
        }
        Ok(())
    });
    EndpointContract::get("systems list", SYSTEMS_PATH).with_body(shape).require_cors()
}

/// `GET /systems/{slug}`: envelope, matching slug, record fields.
#[must_use]
pub fn system_detail_contract(slug: &str, fields: &[String]) -> EndpointContract {
    let expected_slug = Value::String(slug.to_string());
    let fields = fields.to_vec();
    let shape = BodyShape::new(move |body| {
        let object = envelope(body, true, "data")?;
        let data_path = checks::child_path(ROOT_PATH, "data");
        let record =
            checks::expect_object(checks::expect_field(object, ROOT_PATH, "data")?, &data_path)?;
        checks::field_equals(record, &data_path, "slug", &expected_slug)?;
        checks::has_keys(record, &data_path, &as_strs(&fields))
    });
    EndpointContract::get(format!("system detail: {slug}"), format!("{SYSTEMS_PATH}/{slug}"))
        .with_body(shape)
        .require_cors()
}

/// `GET {path}` answering 404 with a "not found" error envelope.
#[must_use]
pub fn not_found_contract(name: impl Into<String>, path: impl Into<String>) -> EndpointContract {
    let shape = BodyShape::new(|body| {
        let object = envelope(body, false, "error")?;
        checks::string_contains_ci(
            checks::expect_field(object, ROOT_PATH, "error")?,
            &checks::child_path(ROOT_PATH, "error"),
            NOT_FOUND_PHRASE,
        )
    });
    EndpointContract::get(name, path).expect_status(404).with_body(shape).require_cors()
}

/// `OPTIONS {path}` answering 204 with CORS permission headers.
#[must_use]
pub fn preflight_contract(path: &str) -> EndpointContract {
    EndpointContract::options(format!("cors preflight: {path}"), path)
        .expect_status(204)
        .require_cors()
        .require_header(ALLOW_METHODS, Some("GET"))
        .require_header(ALLOW_HEADERS, None)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Checks the `{success, <payload_key>}` envelope and returns the object.
fn envelope<'a>(
    body: &'a Value,
    success: bool,
    payload_key: &str,
) -> Result<&'a Map<String, Value>, CheckError> {
    let object = checks::expect_object(body, ROOT_PATH)?;
    checks::has_keys(object, ROOT_PATH, &["success", payload_key])?;
    checks::field_equals(object, ROOT_PATH, "success", &Value::Bool(success))?;
    Ok(object)
}

/// Renders a slug value for set comparison; non-strings keep their JSON form.
fn slug_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "<missing>".to_string(),
    }
}

/// Borrows owned strings as `&str`.
fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}

/// Returns true for non-empty `[A-Za-z0-9_-]` identifiers.
fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

/// Returns true for paths starting with `/` without query or fragment.
fn is_route_path(value: &str) -> bool {
    value.starts_with('/') && !value.contains(['?', '#', ' '])
}

/// Builds an [`CatalogError::Invalid`].
fn invalid(message: impl Into<String>) -> CatalogError {
    CatalogError::Invalid(message.into())
}

/// Serde default for `product_name`.
fn default_product_name() -> String {
    DEFAULT_PRODUCT_NAME.to_string()
}

/// Serde default for `api_prefix`.
fn default_api_prefix() -> String {
    DEFAULT_API_PREFIX.to_string()
}

/// Serde default for `slugs`.
fn default_slugs() -> Vec<String> {
    DEFAULT_SLUGS.iter().map(|slug| (*slug).to_string()).collect()
}

/// Serde default for `required_fields`.
fn default_required_fields() -> Vec<String> {
    SYSTEM_FIELDS.iter().map(|field| (*field).to_string()).collect()
}

/// Serde default for `unknown_slug`.
fn default_unknown_slug() -> String {
    DEFAULT_UNKNOWN_SLUG.to_string()
}

/// Serde default for `unregistered_path`.
fn default_unregistered_path() -> String {
    DEFAULT_UNREGISTERED_PATH.to_string()
}
