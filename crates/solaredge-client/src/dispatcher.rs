//! Bounded-concurrency request core shared by every endpoint

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{MonitoringError, Result};
use crate::lifecycle::TransportHandle;
use crate::limiter::ConcurrencyLimiter;
use crate::request::{merge_params, ApiRequest, RequestDescriptor};
use crate::transport::RawResponse;
use crate::url_builder::build_url;

/// Builds, limits, executes and decodes requests for one client instance
pub struct Dispatcher {
    config: ClientConfig,
    transport: TransportHandle,
    limiter: ConcurrencyLimiter,
}

impl Dispatcher {
    pub(crate) fn new(config: ClientConfig, transport: TransportHandle) -> Self {
        let limiter = ConcurrencyLimiter::new(config.max_concurrent_requests());
        Self {
            config,
            transport,
            limiter,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn transport(&self) -> &TransportHandle {
        &self.transport
    }

    pub(crate) fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Resolve an endpoint request into the outbound descriptor
    pub fn describe(&self, request: &ApiRequest) -> RequestDescriptor {
        RequestDescriptor {
            method: request.method,
            url: build_url(self.config.base_url(), &[&request.path]),
            query: merge_params(self.config.api_key(), &request.params),
        }
    }

    /// Execute one request under a concurrency permit.
    ///
    /// The permit covers the network call and the body decode, and is
    /// returned on every exit path, including cancellation.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn dispatch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let descriptor = self.describe(&request);

        let _permit = self.limiter.acquire().await?;
        debug!(
            available = self.limiter.available(),
            "Acquired request permit for {}", descriptor.url
        );

        let response = self
            .transport
            .get()
            .send(&descriptor, self.config.timeout())
            .await?;

        decode_response(response)
    }
}

/// Map a raw response onto the decoded envelope or an error
pub fn decode_response<T: DeserializeOwned>(response: RawResponse) -> Result<T> {
    if !response.is_success() {
        return Err(MonitoringError::http_status(
            response.status,
            response.body_text(),
        ));
    }

    serde_json::from_slice(&response.body).map_err(|source| MonitoringError::Decode {
        source,
        body: response.body_text(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints;
    use crate::transport::HttpTransport;
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    fn dispatcher(base_url: &str) -> Dispatcher {
        let config = ClientConfig::new("test-key", Some(base_url), None, Some(2)).unwrap();
        let transport = HttpTransport::new(Duration::from_secs(1)).unwrap();
        Dispatcher::new(config, TransportHandle::owned(Arc::new(transport)))
    }

    #[test]
    fn test_describe_energy_request() {
        let dispatcher = dispatcher("https://monitoringapi.solaredge.com/");
        let request = endpoints::energy(
            123,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
            None,
        );
        let descriptor = dispatcher.describe(&request);

        assert_eq!(
            descriptor.url,
            "https://monitoringapi.solaredge.com/site/123/energy"
        );
        let keys: Vec<&str> = descriptor.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["api_key", "startDate", "endDate", "timeUnit"]);
        assert_eq!(descriptor.query_param("api_key"), Some("test-key"));
        assert_eq!(descriptor.query_param("timeUnit"), Some("DAY"));
    }

    #[test]
    fn test_describe_ignores_caller_api_key() {
        let dispatcher = dispatcher("http://localhost:8080");
        let request = ApiRequest::get("/site/1/overview/").param("api_key", "other");
        let descriptor = dispatcher.describe(&request);
        assert_eq!(descriptor.url, "http://localhost:8080/site/1/overview");
        assert_eq!(descriptor.query, vec![("api_key".to_string(), "test-key".to_string())]);
    }

    #[test]
    fn test_decode_success() {
        let value: Value = decode_response(RawResponse::new(200, r#"{"overview":{}}"#)).unwrap();
        assert_eq!(value, json!({"overview": {}}));
    }

    #[test]
    fn test_decode_http_status() {
        let err = decode_response::<Value>(RawResponse::new(403, "Invalid token")).unwrap_err();
        assert_eq!(err.status(), Some(403));
        match err {
            MonitoringError::HttpStatus { body, .. } => assert_eq!(body, "Invalid token"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode_response::<Value>(RawResponse::new(200, "<html>")).unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn test_dispatch_on_closed_transport_releases_permit() {
        let dispatcher = dispatcher("http://127.0.0.1:9");
        dispatcher.transport().close();

        let err = dispatcher
            .dispatch::<Value>(endpoints::overview(1))
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(dispatcher.limiter().available(), 2);
    }
}
