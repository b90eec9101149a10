// crates/contract-probe-core/src/api.rs
// ============================================================================
// Module: API Base
// Description: Validated base URL plus API prefix for contract requests.
// Purpose: Resolve contract paths against one explicit, per-run base.
// Dependencies: thiserror, url
// ============================================================================

//! ## Overview
//! [`ApiBase`] joins a deployment URL with an API prefix (for example
//! `https://host` + `/api`) and appends contract paths verbatim. Only absolute
//! `http`/`https` URLs with a host and without query or fragment are accepted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Base URL or path resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiBaseError {
    /// Base URL failed to parse as an absolute URL.
    #[error("invalid base url {url}: {reason}")]
    Parse {
        /// Offending input.
        url: String,
        /// Parser message.
        reason: String,
    },
    /// Base URL scheme is not `http` or `https`.
    #[error("unsupported base url scheme: {0}")]
    UnsupportedScheme(String),
    /// Base URL has no host.
    #[error("base url must include a host")]
    MissingHost,
    /// Base URL carries a query string or fragment.
    #[error("base url must not include a query or fragment")]
    QueryNotAllowed,
    /// API prefix or contract path is malformed.
    #[error("invalid path \"{0}\": must be empty or start with '/' and contain no '?' or '#'")]
    InvalidPath(String),
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Root URL that contract paths are resolved against.
///
/// # Invariants
/// - `root` never ends with `/`.
/// - `root` is an absolute `http`/`https` URL without query or fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    /// Serialized API root.
    root: String,
}

impl ApiBase {
    /// Builds an API base from a deployment URL and an API prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ApiBaseError`] when the URL is not an absolute `http`/`https`
    /// URL with a host, or the prefix is malformed.
    pub fn new(base_url: &str, prefix: &str) -> Result<Self, ApiBaseError> {
        let mut url = Url::parse(base_url.trim()).map_err(|err| ApiBaseError::Parse {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(ApiBaseError::UnsupportedScheme(other.to_string())),
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ApiBaseError::MissingHost);
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ApiBaseError::QueryNotAllowed);
        }
        validate_path(prefix)?;
        let path = format!(
            "{}{}",
            url.path().trim_end_matches('/'),
            prefix.trim_end_matches('/')
        );
        url.set_path(&path);
        Ok(Self {
            root: url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the API root as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.root
    }

    /// Resolves an API-relative path.
    ///
    /// # Errors
    ///
    /// Returns [`ApiBaseError::InvalidPath`] when `path` does not start with `/`
    /// or does not form a valid URL.
    pub fn url_for(&self, path: &str) -> Result<Url, ApiBaseError> {
        if !path.starts_with('/') {
            return Err(ApiBaseError::InvalidPath(path.to_string()));
        }
        validate_path(path)?;
        Url::parse(&format!("{}{path}", self.root))
            .map_err(|_| ApiBaseError::InvalidPath(path.to_string()))
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects paths that are non-empty without a leading `/` or carry query/fragment markers.
fn validate_path(path: &str) -> Result<(), ApiBaseError> {
    let leading_ok = path.is_empty() || path.starts_with('/');
    if leading_ok && !path.contains(['?', '#']) {
        Ok(())
    } else {
        Err(ApiBaseError::InvalidPath(path.to_string()))
    }
}
