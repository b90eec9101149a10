// crates/contract-probe-core/src/shape.rs
// ============================================================================
// Module: Body Shapes
// Description: Shareable predicates over a parsed JSON response body.
// Purpose: Let contracts carry composed body validators as plain values.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A [`BodyShape`] wraps a validator closure built from the functions in
//! [`crate::checks`]. Shapes are cheap to clone and safe to share across
//! concurrently running contracts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::CheckError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Validator signature shared by all body shapes.
type ShapeFn = dyn Fn(&Value) -> Result<(), CheckError> + Send + Sync;

/// Composable validator over a parsed JSON body.
///
/// # Invariants
/// - Validators are pure: the same body always yields the same verdict.
#[derive(Clone)]
pub struct BodyShape {
    /// Validator closure.
    check: Arc<ShapeFn>,
}

impl BodyShape {
    /// Wraps a validator closure.
    #[must_use]
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), CheckError> + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
        }
    }

    /// Accepts any well-formed JSON document.
    #[must_use]
    pub fn any_json() -> Self {
        Self::new(|_| Ok(()))
    }

    /// Returns a shape that runs `self` and then `next`, stopping at the first failure.
    #[must_use]
    pub fn and(self, next: Self) -> Self {
        Self::new(move |body| {
            self.verify(body)?;
            next.verify(body)
        })
    }

    /// Validates `body` against this shape.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckError`] reported by the validator.
    pub fn verify(&self, body: &Value) -> Result<(), CheckError> {
        (self.check)(body)
    }
}

impl fmt::Debug for BodyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BodyShape(..)")
    }
}
