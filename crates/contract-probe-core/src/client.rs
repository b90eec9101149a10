// crates/contract-probe-core/src/client.rs
// ============================================================================
// Module: Probe Client
// Description: Single-attempt HTTP client used to issue contract requests.
// Purpose: Capture status, headers, and a bounded body for each probe.
// Dependencies: reqwest, tracing, url
// ============================================================================

//! ## Overview
//! [`ProbeClient`] sends exactly one request per call with a fixed timeout and
//! without following redirects, so a redirect surfaces as its own status code.
//! Bodies are read chunk-wise under [`MAX_RESPONSE_BYTES`].
//!
//! Security posture: server responses are untrusted; bodies are size-limited
//! and never interpreted beyond JSON parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use tracing::debug;
use url::Url;

use crate::contract::HttpMethod;
use crate::error::CheckError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum response body size accepted from the API under test.
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// SECTION: Types
// ============================================================================

/// Response data captured for contract checks.
#[derive(Debug, Clone)]
pub struct ObservedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body bytes (at most [`MAX_RESPONSE_BYTES`]).
    pub body: Vec<u8>,
}

/// HTTP client for contract probes.
///
/// # Invariants
/// - No retries and no redirects are performed.
/// - Every request is bounded by `timeout`, body read included.
#[derive(Debug, Clone)]
pub struct ProbeClient {
    /// Reqwest client instance.
    client: Client,
    /// Per-request timeout.
    timeout: Duration,
}

impl ProbeClient {
    /// Builds a client with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Network`] when the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, CheckError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|err| CheckError::Network(format!("http client setup failed: {err}")))?;
        Ok(Self {
            client,
            timeout,
        })
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends one request and captures the response.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Network`] on connection failure, timeout, or when
    /// the body exceeds [`MAX_RESPONSE_BYTES`].
    pub async fn send(&self, method: HttpMethod, url: Url) -> Result<ObservedResponse, CheckError> {
        debug!(method = method.as_str(), url = %url, "sending probe request");
        let response = self
            .client
            .request(method.to_method(), url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|err| self.transport_error(&err))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = self.read_body_with_limit(response, MAX_RESPONSE_BYTES).await?;
        debug!(status, bytes = body.len(), "probe response received");
        Ok(ObservedResponse {
            status,
            headers,
            body,
        })
    }

    /// Reads a response body while enforcing a hard byte limit.
    async fn read_body_with_limit(
        &self,
        mut response: reqwest::Response,
        limit: usize,
    ) -> Result<Vec<u8>, CheckError> {
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|err| self.transport_error(&err))? {
            let next_total = body.len().saturating_add(chunk.len());
            if next_total > limit {
                return Err(CheckError::Network(format!(
                    "response body exceeds size limit ({next_total} > {limit} bytes)"
                )));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    /// Maps a transport failure, naming timeouts explicitly.
    fn transport_error(&self, err: &reqwest::Error) -> CheckError {
        if err.is_timeout() {
            CheckError::Network(format!(
                "request timed out after {} ms",
                self.timeout.as_millis()
            ))
        } else {
            let mut message = err.to_string();
            let mut source = std::error::Error::source(err);
            while let Some(cause) = source {
                message.push_str(": ");
                message.push_str(&cause.to_string());
                source = cause.source();
            }
            CheckError::Network(message)
        }
    }
}
