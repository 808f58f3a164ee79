//! Test utilities for solaredge-client
//!
//! Provides an in-process stand-in for the monitoring API that records every
//! request it receives, plus a server wrapper that hands out a client
//! already pointed at it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::Router;
use parking_lot::Mutex;
use tokio::net::TcpListener;

use crate::{MonitoringClient, Result};

/// API key used by clients created through [`TestServer`]
pub const TEST_API_KEY: &str = "test-api-key";

/// A request as seen by the mock API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn query_keys(&self) -> Vec<&str> {
        self.query.iter().map(|(k, _)| k.as_str()).collect()
    }
}

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<HashMap<String, (u16, String)>>,
    delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Scriptable mock of the monitoring API.
///
/// Unscripted paths answer `200` with `{"path": "<path>"}`.
#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<MockState>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests for `path` (without leading slash) with a fixed response
    pub fn respond(&self, path: &str, status: u16, body: impl Into<String>) -> &Self {
        self.state
            .responses
            .lock()
            .insert(path.trim_matches('/').to_string(), (status, body.into()));
        self
    }

    /// Hold every response for `delay` before answering
    pub fn with_delay(&self, delay: Duration) -> &Self {
        *self.state.delay.lock() = Some(delay);
        self
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    /// Most recent request
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.requests.lock().last().cloned()
    }

    /// Highest number of requests handled at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.state.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn router(&self) -> Router {
        Router::new().fallback(handle).with_state(self.clone())
    }
}

async fn handle(
    State(api): State<MockApi>,
    uri: Uri,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let path = uri.path().trim_matches('/').to_string();
    let query: Vec<(String, String)> = uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    api.state.requests.lock().push(RecordedRequest {
        path: path.clone(),
        query,
    });

    let current = api.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    api.state.peak_in_flight.fetch_max(current, Ordering::SeqCst);

    let delay = *api.state.delay.lock();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    api.state.in_flight.fetch_sub(1, Ordering::SeqCst);

    let scripted = api.state.responses.lock().get(&path).cloned();
    let (status, body) =
        scripted.unwrap_or_else(|| (200, serde_json::json!({ "path": path }).to_string()));

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: MonitoringClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve `router` on an ephemeral port
    ///
    /// # Example
    ///
    /// ```ignore
    /// use solaredge_client::testing::{MockApi, TestServer};
    ///
    /// let api = MockApi::new();
    /// let server = TestServer::start(api.router()).await?;
    /// let overview = server.client.get_overview(1).await?;
    /// ```
    pub async fn start(router: Router) -> Result<Self> {
        Self::start_with_config(router, Duration::from_secs(5), 3).await
    }

    /// Serve `router` with a client using custom timeout and concurrency
    pub async fn start_with_config(
        router: Router,
        timeout: Duration,
        max_concurrent_requests: usize,
    ) -> Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let client = MonitoringClient::builder(TEST_API_KEY)
            .base_url(format!("http://{}", addr))
            .timeout(timeout)
            .max_concurrent_requests(max_concurrent_requests)
            .build()?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Wait for a condition with timeout
pub async fn wait_for<F, Fut>(condition: F, timeout: Duration) -> bool
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    false
}
