//! Outbound HTTP transport

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use reqwest::Client;
use tracing::debug;

use crate::error::TransportError;
use crate::request::RequestDescriptor;

/// Status code and undecoded body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Capability to execute one request.
///
/// Implementations must be safe to share between concurrent calls and
/// should reuse connections across them.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError>;

    /// Release pooled connections. Called at most once, and only for
    /// transports owned by the client.
    fn close(&self) {}
}

/// reqwest-backed transport with a pooled client
#[derive(Debug)]
pub struct HttpTransport {
    client: RwLock<Option<Client>>,
}

impl HttpTransport {
    /// Build a transport with its own connection pool.
    ///
    /// Redirects are not followed, so a 3xx answer surfaces as a status error.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self::from_client(client))
    }

    /// Wrap an existing reqwest client
    pub fn from_client(client: Client) -> Self {
        Self {
            client: RwLock::new(Some(client)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.client.read().is_none()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        // Clone out of the lock so it is not held across the await.
        let client = self.client.read().clone().ok_or(TransportError::Closed)?;

        let response = client
            .request(request.method.into(), &request.url)
            .query(&request.query)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        debug!("{} {} -> {}", request.method, request.url, status);

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(RawResponse { status, body })
    }

    fn close(&self) {
        if self.client.write().take().is_some() {
            debug!("Closed HTTP transport");
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(err)
    }
}
