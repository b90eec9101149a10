// crates/contract-probe-core/src/runner.rs
// ============================================================================
// Module: Contract Runner
// Description: Executes contracts against an API base and collects outcomes.
// Purpose: Convert every per-contract failure into an outcome, never an error.
// Dependencies: tokio, tracing
// ============================================================================

//! ## Overview
//! [`Verifier`] binds an [`ApiBase`] to a [`ProbeClient`] for one run. Each
//! contract is checked in a fixed order (transport, status, body, CORS origin,
//! required headers) and the first failure becomes the outcome detail.
//! Validator panics are caught at the contract boundary and recorded as
//! [`CheckError::Defect`], so a run always produces a complete summary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use std::time::Instant;

use serde_json::Value;
use tokio::task::JoinSet;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::api::ApiBase;
use crate::checks;
use crate::client::ProbeClient;
use crate::contract::EndpointContract;
use crate::error::CheckError;
use crate::outcome::RunSummary;
use crate::outcome::TestOutcome;
use crate::shape::BodyShape;

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Runs contracts against one API base.
///
/// # Invariants
/// - Holds no mutable state; runs are independent and repeatable.
#[derive(Debug, Clone)]
pub struct Verifier {
    /// Root all contract paths resolve against.
    api: ApiBase,
    /// Single-attempt HTTP client.
    client: ProbeClient,
}

impl Verifier {
    /// Creates a verifier with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Network`] when the HTTP client cannot be built.
    pub fn new(api: ApiBase, timeout: Duration) -> Result<Self, CheckError> {
        Ok(Self {
            api,
            client: ProbeClient::new(timeout)?,
        })
    }

    /// Returns the API base.
    #[must_use]
    pub const fn api(&self) -> &ApiBase {
        &self.api
    }

    /// Runs a single contract and returns its outcome.
    pub async fn run_contract(&self, contract: &EndpointContract) -> TestOutcome {
        let started = Instant::now();
        let result = self.probe(contract).await;
        let elapsed = started.elapsed();
        match result {
            Ok(detail) => {
                let outcome = TestOutcome::pass(contract.name(), detail, elapsed);
                info!(contract = contract.name(), elapsed_ms = outcome.elapsed_ms(), "contract passed");
                outcome
            }
            Err(err) => {
                warn!(
                    contract = contract.name(),
                    kind = err.kind().as_str(),
                    detail = %err,
                    "contract failed"
                );
                TestOutcome::fail(contract.name(), &err, elapsed)
            }
        }
    }

    /// Runs every contract sequentially in declared order.
    pub async fn run_all(&self, contracts: &[EndpointContract]) -> RunSummary {
        let mut outcomes = Vec::with_capacity(contracts.len());
        for contract in contracts {
            outcomes.push(self.run_contract(contract).await);
        }
        RunSummary::from_outcomes(outcomes)
    }

    /// Runs every contract concurrently; outcomes keep declared order.
    pub async fn run_all_concurrent(&self, contracts: &[EndpointContract]) -> RunSummary {
        let mut tasks = JoinSet::new();
        for (index, contract) in contracts.iter().cloned().enumerate() {
            let verifier = self.clone();
            tasks.spawn(async move { (index, verifier.run_contract(&contract).await) });
        }
        let mut slots: Vec<Option<TestOutcome>> = contracts.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(outcome);
                    }
                }
                Err(err) => error!(error = %err, "contract task aborted"),
            }
        }
        let outcomes = slots
            .into_iter()
            .zip(contracts)
            .map(|(slot, contract)| {
                slot.unwrap_or_else(|| {
                    let err = CheckError::Defect("contract task aborted".to_string());
                    TestOutcome::fail(contract.name(), &err, Duration::ZERO)
                })
            })
            .collect();
        RunSummary::from_outcomes(outcomes)
    }

    /// Performs the request and every check, returning the success detail.
    async fn probe(&self, contract: &EndpointContract) -> Result<String, CheckError> {
        let url = self
            .api
            .url_for(contract.path())
            .map_err(|err| CheckError::Defect(err.to_string()))?;
        let response = self.client.send(contract.method(), url).await?;
        checks::status_equals(contract.expected_status(), response.status)?;
        if let Some(shape) = contract.body_shape() {
            let body = checks::json_body(&response.body)?;
            verify_shape(contract.name(), shape, &body)?;
        }
        if contract.requires_cors() {
            checks::has_cors(&response.headers)?;
        }
        for rule in contract.required_headers() {
            checks::has_header(&response.headers, &rule.name, rule.must_contain.as_deref())?;
        }
        Ok(format!(
            "{} {} -> {}",
            contract.method(),
            contract.path(),
            response.status
        ))
    }
}

// ============================================================================
// SECTION: One-Shot Entry Points
// ============================================================================

/// Runs one contract with a fresh client bounded by `timeout`.
///
/// A client construction failure is reported as a failed outcome.
pub async fn run_contract(
    api: &ApiBase,
    contract: &EndpointContract,
    timeout: Duration,
) -> TestOutcome {
    match Verifier::new(api.clone(), timeout) {
        Ok(verifier) => verifier.run_contract(contract).await,
        Err(err) => TestOutcome::fail(contract.name(), &err, Duration::ZERO),
    }
}

/// Runs every contract sequentially with a fresh client bounded by `timeout`.
///
/// A client construction failure fails every contract; the summary is always complete.
pub async fn run_all(api: &ApiBase, contracts: &[EndpointContract], timeout: Duration) -> RunSummary {
    match Verifier::new(api.clone(), timeout) {
        Ok(verifier) => verifier.run_all(contracts).await,
        Err(err) => RunSummary::from_outcomes(
            contracts
                .iter()
                .map(|contract| TestOutcome::fail(contract.name(), &err, Duration::ZERO))
                .collect(),
        ),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs a body shape, converting a validator panic into [`CheckError::Defect`].
fn verify_shape(name: &str, shape: &BodyShape, body: &Value) -> Result<(), CheckError> {
    match panic::catch_unwind(AssertUnwindSafe(|| shape.verify(body))) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(contract = name, panic = %message, "body validator panicked");
            Err(CheckError::Defect(format!("body validator panicked: {message}")))
        }
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
