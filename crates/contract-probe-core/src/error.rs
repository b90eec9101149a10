// crates/contract-probe-core/src/error.rs
// ============================================================================
// Module: Check Errors
// Description: Failure taxonomy for a single contract probe.
// Purpose: Carry expected-vs-observed diagnostics from checks to outcomes.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every check returns [`CheckError`] on failure. The runner converts the first
//! error of a contract into a failed outcome; no variant escapes a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure raised by a single contract check.
///
/// # Invariants
/// - Display output is a single diagnostic line naming the failing check.
/// - String payloads may include untrusted server text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// Connection failure, timeout, or unreadable response body.
    #[error("network error: {0}")]
    Network(String),
    /// Status code did not match the contract.
    #[error("status mismatch: expected {expected}, got {actual}")]
    Protocol {
        /// Status code the contract requires.
        expected: u16,
        /// Status code the server returned.
        actual: u16,
    },
    /// Body was not JSON or violated the declared shape.
    #[error("schema error at {path}: expected {expected}, got {actual}")]
    Schema {
        /// Location of the violation inside the body (for example `body.data.slug`).
        path: String,
        /// Expected value or shape.
        expected: String,
        /// Observed value or shape.
        actual: String,
    },
    /// A required CORS header was missing or non-conforming.
    #[error("cors error: {header} {reason}")]
    Cors {
        /// Header name as declared by the contract.
        header: String,
        /// What was wrong with the header.
        reason: String,
    },
    /// A body validator panicked instead of returning a verdict.
    #[error("validator defect: {0}")]
    Defect(String),
}

impl CheckError {
    /// Builds a schema violation.
    #[must_use]
    pub fn schema(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Schema {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Builds a CORS header violation.
    #[must_use]
    pub fn cors(header: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Cors {
            header: header.into(),
            reason: reason.into(),
        }
    }

    /// Returns the failure category for this error.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Network(_) => FailureKind::Network,
            Self::Protocol {
                ..
            } => FailureKind::Protocol,
            Self::Schema {
                ..
            } => FailureKind::Schema,
            Self::Cors {
                ..
            } => FailureKind::Cors,
            Self::Defect(_) => FailureKind::Defect,
        }
    }
}

// ============================================================================
// SECTION: Failure Kinds
// ============================================================================

/// Failure category recorded on a failed outcome.
///
/// # Invariants
/// - Variants and labels are stable for report consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection or timeout failure.
    Network,
    /// Unexpected status code.
    Protocol,
    /// Missing or incorrect JSON content.
    Schema,
    /// Missing required CORS header.
    Cors,
    /// Validator defect caught at the contract boundary.
    Defect,
}

impl FailureKind {
    /// Returns a stable label for the failure kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Protocol => "protocol",
            Self::Schema => "schema",
            Self::Cors => "cors",
            Self::Defect => "defect",
        }
    }
}
