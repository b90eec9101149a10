// crates/contract-probe-testkit/src/server.rs
// ============================================================================
// Module: Stub Systems Hub Server
// Description: In-process HTTP/1 server emulating the Systems Hub API.
// Purpose: Let tests run contracts against conforming and broken responses.
// Dependencies: bytes, http-body-util, hyper, hyper-util, tokio
// ============================================================================

//! ## Overview
//! [`StubServer`] binds `127.0.0.1:0` and answers every request with
//! [`hub_response`] unless an override returns a replacement. Overrides make
//! single endpoints misbehave (wrong status, missing header, slow reply)
//! while the rest of the API stays conforming.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::Full;
use hyper::HeaderMap;
use hyper::Method;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Incoming;
use hyper::header::CONTENT_TYPE;
use hyper::header::HeaderName;
use hyper::header::HeaderValue;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::fixtures;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix every API route is mounted under.
pub const API_PREFIX: &str = "/api";
/// Allowed origin advertised on every API response.
const ALLOW_ORIGIN_VALUE: &str = "*";
/// Methods advertised by the preflight response.
const ALLOW_METHODS_VALUE: &str = "GET, POST, PUT, DELETE, OPTIONS";
/// Request headers advertised by the preflight response.
const ALLOW_HEADERS_VALUE: &str = "Content-Type, Authorization";

// ============================================================================
// SECTION: Requests and Responses
// ============================================================================

/// Request line observed by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubRequest {
    /// Request method.
    pub method: Method,
    /// Request path without query.
    pub path: String,
}

/// Response served by the stub.
#[derive(Debug, Clone)]
pub struct StubResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
    /// Delay before the response is sent.
    pub delay: Option<Duration>,
}

impl StubResponse {
    /// Builds a JSON response carrying the CORS origin header.
    #[must_use]
    pub fn json(status: StatusCode, value: &Value) -> Self {
        Self::raw(status, value.to_string())
            .with_header(CONTENT_TYPE.as_str(), "application/json")
            .with_header("access-control-allow-origin", ALLOW_ORIGIN_VALUE)
    }

    /// Builds a response with no headers.
    #[must_use]
    pub fn raw(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            delay: None,
        }
    }

    /// Builds the 204 preflight response with all CORS permission headers.
    #[must_use]
    pub fn preflight() -> Self {
        Self::raw(StatusCode::NO_CONTENT, Bytes::new())
            .with_header("access-control-allow-origin", ALLOW_ORIGIN_VALUE)
            .with_header("access-control-allow-methods", ALLOW_METHODS_VALUE)
            .with_header("access-control-allow-headers", ALLOW_HEADERS_VALUE)
    }

    /// Sets a header. Invalid names or values are ignored.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) =
            (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value))
        {
            self.headers.insert(name, value);
        }
        self
    }

    /// Removes a header.
    #[must_use]
    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    /// Delays the response.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Converts into a hyper response.
    fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

// ============================================================================
// SECTION: Conforming API
// ============================================================================

/// Answers `request` the way the deployed Systems Hub API does.
#[must_use]
pub fn hub_response(request: &StubRequest) -> StubResponse {
    let Some(path) = request.path.strip_prefix(API_PREFIX) else {
        return StubResponse::raw(StatusCode::NOT_FOUND, "not found");
    };
    if request.method == Method::OPTIONS {
        return StubResponse::preflight();
    }
    if request.method != Method::GET {
        return StubResponse::raw(StatusCode::METHOD_NOT_ALLOWED, Bytes::new());
    }
    match path {
        "/systems" | "/systems/" => {
            StubResponse::json(StatusCode::OK, &fixtures::data_body(Value::Array(fixtures::systems())))
        }
        "" | "/" | "/health" => StubResponse::json(StatusCode::OK, &fixtures::health_body()),
        _ => match path.strip_prefix("/systems/").filter(|slug| is_word(slug)) {
            Some(slug) => fixtures::system(slug).map_or_else(
                || StubResponse::json(StatusCode::NOT_FOUND, &fixtures::error_body("System not found")),
                |record| StubResponse::json(StatusCode::OK, &fixtures::data_body(record)),
            ),
            None => StubResponse::json(StatusCode::NOT_FOUND, &fixtures::error_body("Route not found")),
        },
    }
}

/// Returns true for non-empty `[A-Za-z0-9_-]` segments.
fn is_word(segment: &str) -> bool {
    !segment.is_empty()
        && segment.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Override hook: `Some` replaces the conforming response.
type Override = Arc<dyn Fn(&StubRequest) -> Option<StubResponse> + Send + Sync>;

/// In-process Systems Hub stub with request capture.
pub struct StubServer {
    /// Bound listener address.
    addr: SocketAddr,
    /// Requests served so far, in arrival order.
    requests: Arc<Mutex<Vec<StubRequest>>>,
    /// Accept loop shutdown signal.
    shutdown: Option<oneshot::Sender<()>>,
    /// Accept loop task.
    handle: JoinHandle<()>,
}

impl StubServer {
    /// Starts a fully conforming stub.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the listener cannot be bound.
    pub async fn start() -> io::Result<Self> {
        Self::start_with(|_| None).await
    }

    /// Starts a stub whose responses may be replaced per request.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the listener cannot be bound.
    pub async fn start_with<F>(overrides: F) -> io::Result<Self>
    where
        F: Fn(&StubRequest) -> Option<StubResponse> + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let overrides: Override = Arc::new(overrides);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let requests_task = Arc::clone(&requests);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    accept = listener.accept() => {
                        let Ok((stream, _)) = accept else { continue };
                        let requests = Arc::clone(&requests_task);
                        let overrides = Arc::clone(&overrides);
                        tokio::spawn(async move {
                            let io = TokioIo::new(stream);
                            let service = service_fn(move |req: Request<Incoming>| {
                                let requests = Arc::clone(&requests);
                                let overrides = Arc::clone(&overrides);
                                async move {
                                    let observed = StubRequest {
                                        method: req.method().clone(),
                                        path: req.uri().path().to_string(),
                                    };
                                    let response = overrides(&observed)
                                        .unwrap_or_else(|| hub_response(&observed));
                                    requests.lock().await.push(observed);
                                    if let Some(delay) = response.delay {
                                        tokio::time::sleep(delay).await;
                                    }
                                    Ok::<_, Infallible>(response.into_response())
                                }
                            });
                            let _ = http1::Builder::new().serve_connection(io, service).await;
                        });
                    }
                }
            }
        });

        Ok(Self {
            addr,
            requests,
            shutdown: Some(shutdown_tx),
            handle,
        })
    }

    /// Returns the deployment URL (without the API prefix).
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Returns a snapshot of served requests.
    pub async fn requests(&self) -> Vec<StubRequest> {
        self.requests.lock().await.clone()
    }

    /// Stops accepting connections and waits for the accept loop to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = self.handle.await;
    }
}

/// Returns a URL on a local port with no listener.
///
/// # Errors
///
/// Returns an I/O error when a probe listener cannot be bound.
pub async fn closed_port_url() -> io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}
