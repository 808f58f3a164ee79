//! Client configuration and validation

use std::time::Duration;

use url::Url;

use crate::error::{MonitoringError, Result};

/// Production endpoint of the monitoring API
pub const DEFAULT_BASE_URL: &str = "https://monitoringapi.solaredge.com";
/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Concurrent request limit documented by the monitoring API
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 3;

/// Validated, immutable client settings
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
    max_concurrent_requests: usize,
}

impl ClientConfig {
    /// Validate and normalize the raw settings.
    ///
    /// The base URL loses any trailing slash; everything else must already be
    /// in range or a `Configuration` error is returned.
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<&str>,
        timeout: Option<Duration>,
        max_concurrent_requests: Option<usize>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(MonitoringError::configuration("API key must not be empty"));
        }

        let base_url = normalize_base_url(base_url.unwrap_or(DEFAULT_BASE_URL))?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(MonitoringError::configuration(
                "Timeout must be greater than zero",
            ));
        }

        let max_concurrent_requests =
            max_concurrent_requests.unwrap_or(DEFAULT_MAX_CONCURRENT_REQUESTS);
        if max_concurrent_requests == 0 {
            return Err(MonitoringError::configuration(
                "max_concurrent_requests must be at least 1",
            ));
        }

        Ok(Self {
            api_key,
            base_url,
            timeout,
            max_concurrent_requests,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }
}

// The API key stays out of debug output.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .finish()
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| MonitoringError::configuration(format!("Invalid base URL '{}': {}", raw, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(MonitoringError::configuration(format!(
                "Unsupported base URL scheme '{}'",
                other
            )))
        }
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(MonitoringError::configuration(
            "Base URL must not carry a query or fragment",
        ));
    }

    Ok(trimmed.to_string())
}
