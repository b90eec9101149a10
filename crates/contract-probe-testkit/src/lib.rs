// crates/contract-probe-testkit/src/lib.rs
// ============================================================================
// Module: Contract Probe Testkit
// Description: Stub Systems Hub API for integration tests.
// Purpose: Share one conforming server and its fixtures across test suites.
// Dependencies: bytes, http-body-util, hyper, hyper-util, serde_json, tokio
// ============================================================================

//! ## Overview
//! Test support only; not published. [`StubServer`] serves the fixture
//! catalog under `/api` and accepts per-request overrides.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod fixtures;
pub mod server;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use server::API_PREFIX;
pub use server::StubRequest;
pub use server::StubResponse;
pub use server::StubServer;
pub use server::closed_port_url;
pub use server::hub_response;
