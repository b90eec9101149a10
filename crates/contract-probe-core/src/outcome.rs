// crates/contract-probe-core/src/outcome.rs
// ============================================================================
// Module: Outcomes and Summaries
// Description: Per-contract results and the aggregate of a run.
// Purpose: Replace ambient pass/total counters with explicit values.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`TestOutcome`] records the verdict of one contract. A [`RunSummary`]
//! owns the outcomes of a run in presentation order and derives its counts
//! from them, so `passed <= total` holds by construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;

use crate::error::CheckError;
use crate::error::FailureKind;

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Result of running one contract.
///
/// # Invariants
/// - `failure` is `None` iff `passed` is `true`.
/// - Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    /// Contract display name.
    name: String,
    /// Whether every check succeeded.
    passed: bool,
    /// Confirmation on success, first failing check otherwise.
    detail: String,
    /// Failure category when the contract failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<FailureKind>,
    /// Probe wall-clock time in milliseconds.
    elapsed_ms: u64,
}

impl TestOutcome {
    /// Builds a passing outcome.
    #[must_use]
    pub fn pass(name: impl Into<String>, detail: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: detail.into(),
            failure: None,
            elapsed_ms: millis(elapsed),
        }
    }

    /// Builds a failing outcome from the first failing check.
    #[must_use]
    pub fn fail(name: impl Into<String>, error: &CheckError, elapsed: Duration) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: error.to_string(),
            failure: Some(error.kind()),
            elapsed_ms: millis(elapsed),
        }
    }

    /// Returns the contract name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the contract passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.passed
    }

    /// Returns the diagnostic detail.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Returns the failure category, if the contract failed.
    #[must_use]
    pub const fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    /// Returns the probe duration in milliseconds.
    #[must_use]
    pub const fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Aggregate of all outcomes of one run.
///
/// # Invariants
/// - `passed <= total` and `total == outcomes.len()`.
/// - Outcomes appear in declared contract order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Number of contracts run.
    total: usize,
    /// Number of contracts that passed.
    passed: usize,
    /// Outcomes in presentation order.
    outcomes: Vec<TestOutcome>,
}

impl RunSummary {
    /// Builds a summary, deriving the counts from `outcomes`.
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<TestOutcome>) -> Self {
        let passed = outcomes.iter().filter(|outcome| outcome.passed).count();
        Self {
            total: outcomes.len(),
            passed,
            outcomes,
        }
    }

    /// Returns the number of contracts run.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Returns the number of passing contracts.
    #[must_use]
    pub const fn passed(&self) -> usize {
        self.passed
    }

    /// Returns the number of failing contracts.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.total.saturating_sub(self.passed)
    }

    /// Returns `true` when every contract passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// Returns all outcomes in presentation order.
    #[must_use]
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    /// Iterates over failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed)
    }
}

/// Maps a summary to a process exit status: `0` iff every contract passed.
#[must_use]
pub const fn exit_code(summary: &RunSummary) -> i32 {
    if summary.all_passed() { 0 } else { 1 }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a duration to whole milliseconds, saturating at `u64::MAX`.
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
