// crates/contract-probe-cli/src/telemetry.rs
// ============================================================================
// Module: Telemetry
// Description: Tracing subscriber setup for the probe binary.
// Purpose: Route diagnostics to stderr so stdout carries only the report.
// Dependencies: tracing-subscriber
// ============================================================================

//! ## Overview
//! Log verbosity follows `RUST_LOG`; the default keeps runs quiet apart from
//! contract failures.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Installs the global fmt subscriber writing to stderr.
///
/// An already installed subscriber is kept.
pub fn init_tracing(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
