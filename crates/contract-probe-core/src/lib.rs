// crates/contract-probe-core/src/lib.rs
// ============================================================================
// Module: Contract Probe Core
// Description: API contract verification over HTTP.
// Purpose: Model endpoint contracts, probe a live API, and summarize verdicts.
// Dependencies: reqwest, semver, serde, serde_json, thiserror, tokio, toml, tracing, url
// ============================================================================

//! ## Overview
//! Contract Probe verifies a deployed JSON API against a declarative contract
//! table. Each [`EndpointContract`] is probed once; every failure (network,
//! status, schema, CORS, or a validator defect) is captured in its
//! [`TestOutcome`] and the run always yields a complete [`RunSummary`].
//!
//! The [`catalog`] module builds the contract table for the Systems Hub API
//! from a [`CatalogSpec`].
//!
//! Security posture: server responses are untrusted; bodies are size-limited
//! and diagnostics truncate echoed server text.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod catalog;
pub mod checks;
pub mod client;
pub mod contract;
pub mod error;
pub mod outcome;
pub mod report;
pub mod runner;
pub mod shape;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use api::ApiBase;
pub use api::ApiBaseError;
pub use catalog::CatalogError;
pub use catalog::CatalogSpec;
pub use client::DEFAULT_TIMEOUT;
pub use client::ObservedResponse;
pub use client::ProbeClient;
pub use contract::EndpointContract;
pub use contract::HeaderRule;
pub use contract::HttpMethod;
pub use error::CheckError;
pub use error::FailureKind;
pub use outcome::RunSummary;
pub use outcome::TestOutcome;
pub use outcome::exit_code;
pub use report::ReportFormat;
pub use runner::Verifier;
pub use runner::run_all;
pub use runner::run_contract;
pub use shape::BodyShape;
