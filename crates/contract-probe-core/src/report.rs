// crates/contract-probe-core/src/report.rs
// ============================================================================
// Module: Run Reports
// Description: Console and JSON renderings of a run summary.
// Purpose: Present per-contract verdicts and the final tally.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The text report prints one marker line per contract, an indented
//! diagnostic under each failure, then the tally and a banner. The JSON
//! report is a single document for machine consumers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;

use serde::Serialize;

use crate::outcome::RunSummary;
use crate::outcome::TestOutcome;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Horizontal rule separating report sections.
const RULE: &str = "============================================================";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Output format for a run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human-readable console report.
    #[default]
    Text,
    /// Pretty-printed JSON document.
    Json,
}

/// JSON report document.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    /// API root the run targeted.
    api_base: &'a str,
    /// Number of contracts run.
    total: usize,
    /// Number of passing contracts.
    passed: usize,
    /// Number of failing contracts.
    failed: usize,
    /// Per-contract outcomes in presentation order.
    outcomes: &'a [TestOutcome],
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Writes a report for `summary` in the requested format.
///
/// # Errors
///
/// Returns an I/O error when writing fails or JSON serialization fails.
pub fn write_report<W: Write>(
    out: &mut W,
    format: ReportFormat,
    api_base: &str,
    summary: &RunSummary,
) -> io::Result<()> {
    match format {
        ReportFormat::Text => write_text_report(out, api_base, summary),
        ReportFormat::Json => write_json_report(out, api_base, summary),
    }
}

/// Writes the console report.
///
/// # Errors
///
/// Returns an I/O error when writing fails.
pub fn write_text_report<W: Write>(
    out: &mut W,
    api_base: &str,
    summary: &RunSummary,
) -> io::Result<()> {
    writeln!(out, "Verifying API at {api_base}")?;
    writeln!(out, "{RULE}")?;
    for outcome in summary.outcomes() {
        if outcome.passed() {
            writeln!(out, "PASS - {}", outcome.name())?;
        } else {
            writeln!(out, "FAIL - {}", outcome.name())?;
            writeln!(out, "    {}", single_line(outcome.detail()))?;
        }
    }
    writeln!(out, "{RULE}")?;
    writeln!(out, "Results: {}/{} contracts passed", summary.passed(), summary.total())?;
    if summary.all_passed() {
        writeln!(out, "All contracts PASSED")
    } else {
        writeln!(out, "Some contracts FAILED")
    }
}

/// Writes the JSON report followed by a newline.
///
/// # Errors
///
/// Returns an I/O error when serialization or writing fails.
pub fn write_json_report<W: Write>(
    out: &mut W,
    api_base: &str,
    summary: &RunSummary,
) -> io::Result<()> {
    let report = JsonReport {
        api_base,
        total: summary.total(),
        passed: summary.passed(),
        failed: summary.failed(),
        outcomes: summary.outcomes(),
    };
    serde_json::to_writer_pretty(&mut *out, &report).map_err(io::Error::other)?;
    writeln!(out)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Collapses control characters so a diagnostic stays on one line.
fn single_line(detail: &str) -> String {
    detail.chars().map(|ch| if ch.is_control() { ' ' } else { ch }).collect()
}
