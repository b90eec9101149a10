//! Run summary property-based tests.
//!
//! ## Purpose
//! These tests check the tally and exit-code invariants of [`RunSummary`] over
//! randomized outcome lists, without network access.
//!
//! ## What is covered
//! - `passed <= total` and `passed + failed == total`.
//! - The exit code is zero exactly when every outcome passed.
//! - Permuting outcomes changes presentation order only.
//! - Catalog validation never panics on arbitrary slug lists.
// crates/contract-probe-core/tests/proptest_summary.rs
// ============================================================================
// Module: Run Summary Property-Based Tests
// Description: Randomized checks for summary tallies and exit codes.
// Purpose: Ensure counts derive from outcomes regardless of order.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::time::Duration;

use contract_probe_core::CatalogSpec;
use contract_probe_core::CheckError;
use contract_probe_core::RunSummary;
use contract_probe_core::TestOutcome;
use contract_probe_core::exit_code;
use proptest::prelude::*;

fn outcomes_from(verdicts: &[bool]) -> Vec<TestOutcome> {
    verdicts
        .iter()
        .enumerate()
        .map(|(index, passed)| {
            let name = format!("contract {index}");
            if *passed {
                TestOutcome::pass(name, "ok", Duration::ZERO)
            } else {
                let err = CheckError::Protocol {
                    expected: 200,
                    actual: 500,
                };
                TestOutcome::fail(name, &err, Duration::ZERO)
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn tallies_derive_from_outcomes(verdicts in prop::collection::vec(any::<bool>(), 0..64)) {
        let summary = RunSummary::from_outcomes(outcomes_from(&verdicts));
        let expected_passed = verdicts.iter().filter(|passed| **passed).count();
        prop_assert_eq!(summary.total(), verdicts.len());
        prop_assert_eq!(summary.passed(), expected_passed);
        prop_assert!(summary.passed() <= summary.total());
        prop_assert_eq!(summary.passed() + summary.failed(), summary.total());
        prop_assert_eq!(summary.failures().count(), summary.failed());
    }

    #[test]
    fn exit_code_is_zero_iff_all_passed(verdicts in prop::collection::vec(any::<bool>(), 0..64)) {
        let summary = RunSummary::from_outcomes(outcomes_from(&verdicts));
        let all_passed = verdicts.iter().all(|passed| *passed);
        prop_assert_eq!(exit_code(&summary) == 0, all_passed);
        prop_assert_eq!(exit_code(&summary) == 0, summary.passed() == summary.total());
    }

    #[test]
    fn permutation_preserves_tallies(
        verdicts in prop::collection::vec(any::<bool>(), 1..32),
        rotation in 0usize..64,
    ) {
        let outcomes = outcomes_from(&verdicts);
        let mut permuted = outcomes.clone();
        let len = permuted.len();
        permuted.rotate_left(rotation % len);
        permuted.reverse();

        let original = RunSummary::from_outcomes(outcomes);
        let reordered = RunSummary::from_outcomes(permuted);
        prop_assert_eq!(original.total(), reordered.total());
        prop_assert_eq!(original.passed(), reordered.passed());
        prop_assert_eq!(exit_code(&original), exit_code(&reordered));
    }

    #[test]
    fn catalog_validation_never_panics(slugs in prop::collection::vec(".{0,12}", 0..8)) {
        let catalog = CatalogSpec {
            slugs,
            ..CatalogSpec::default()
        };
        if catalog.validate().is_ok() {
            prop_assert_eq!(catalog.contracts().len(), catalog.slugs.len() + 5);
        }
    }
}
