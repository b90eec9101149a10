// crates/contract-probe-core/src/contract.rs
// ============================================================================
// Module: Endpoint Contracts
// Description: Declarative description of one endpoint's expected response.
// Purpose: Define the immutable unit of work consumed by the verifier.
// Dependencies: reqwest (method type), serde
// ============================================================================

//! ## Overview
//! An [`EndpointContract`] names a request (method and API-relative path) and
//! the rules its response must satisfy: status code, optional JSON body
//! shape, CORS origin, and additional required headers. Contracts are built
//! once with the consuming builder methods and never mutated afterwards.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::shape::BodyShape;

// ============================================================================
// SECTION: HTTP Method
// ============================================================================

/// Request methods used by read-only contracts.
///
/// # Invariants
/// - Variants are stable for report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET` request.
    Get,
    /// `HEAD` request.
    Head,
    /// `OPTIONS` request (CORS preflight).
    Options,
}

impl HttpMethod {
    /// Returns the canonical method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Converts to the HTTP client method type.
    #[must_use]
    pub const fn to_method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Header Rules
// ============================================================================

/// Requirement on a single response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRule {
    /// Header name (case-insensitive).
    pub name: String,
    /// Substring the header value must contain, when set.
    pub must_contain: Option<String>,
}

// ============================================================================
// SECTION: Contract
// ============================================================================

/// Expected request/response behavior of one endpoint.
///
/// # Invariants
/// - `path` is relative to the API base and starts with `/`.
/// - A contract without a body shape makes no body assertions.
#[derive(Debug, Clone)]
pub struct EndpointContract {
    /// Display name used in reports and filters.
    name: String,
    /// Request method.
    method: HttpMethod,
    /// Path relative to the API base.
    path: String,
    /// Required status code.
    expected_status: u16,
    /// Optional JSON body validator.
    body_shape: Option<BodyShape>,
    /// Whether `Access-Control-Allow-Origin` must be present.
    require_cors: bool,
    /// Additional header requirements, checked in order.
    required_headers: Vec<HeaderRule>,
}

impl EndpointContract {
    /// Starts a contract for `method` on `path` expecting `200 OK`.
    #[must_use]
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            expected_status: 200,
            body_shape: None,
            require_cors: false,
            required_headers: Vec::new(),
        }
    }

    /// Starts a `GET` contract.
    #[must_use]
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Get, path)
    }

    /// Starts an `OPTIONS` contract.
    #[must_use]
    pub fn options(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Options, path)
    }

    /// Sets the required status code.
    #[must_use]
    pub const fn expect_status(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }

    /// Requires a JSON body matching `shape`.
    #[must_use]
    pub fn with_body(mut self, shape: BodyShape) -> Self {
        self.body_shape = Some(shape);
        self
    }

    /// Requires a non-empty `Access-Control-Allow-Origin` header.
    #[must_use]
    pub const fn require_cors(mut self) -> Self {
        self.require_cors = true;
        self
    }

    /// Requires a non-empty header, optionally containing `must_contain`.
    #[must_use]
    pub fn require_header(mut self, name: impl Into<String>, must_contain: Option<&str>) -> Self {
        self.required_headers.push(HeaderRule {
            name: name.into(),
            must_contain: must_contain.map(str::to_owned),
        });
        self
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the request method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the API-relative path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the required status code.
    #[must_use]
    pub const fn expected_status(&self) -> u16 {
        self.expected_status
    }

    /// Returns the body shape, if any.
    #[must_use]
    pub const fn body_shape(&self) -> Option<&BodyShape> {
        self.body_shape.as_ref()
    }

    /// Returns whether the CORS origin header is required.
    #[must_use]
    pub const fn requires_cors(&self) -> bool {
        self.require_cors
    }

    /// Returns additional header requirements.
    #[must_use]
    pub fn required_headers(&self) -> &[HeaderRule] {
        &self.required_headers
    }
}
