//! Integration tests for solaredge-client
//!
//! These tests spin up the in-process mock API and check the exact requests
//! the client puts on the wire, and how responses are mapped back.

use std::time::Duration;

use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use serde_json::json;
use solaredge_client::testing::{MockApi, TestServer, TEST_API_KEY};
use solaredge_client::{MonitoringError, SiteListQuery, SortOrder, TimeUnit};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

const NONE: &[&str] = &[];

// =============================================================================
// Wire Shape
// =============================================================================

#[tokio::test]
async fn test_energy_request_defaults_to_day() {
    let api = MockApi::new();
    api.respond(
        "site/123/energy",
        200,
        json!({"energy": {"timeUnit": "DAY", "unit": "Wh", "values": []}}).to_string(),
    );
    let server = TestServer::start(api.router()).await.unwrap();

    let body = server
        .client
        .get_energy(123, date(2023, 1, 1), date(2023, 1, 31), None)
        .await
        .unwrap();
    assert_eq!(body["energy"]["unit"], "Wh");

    let request = api.last_request().unwrap();
    assert_eq!(request.path, "site/123/energy");
    assert_eq!(
        request.query,
        vec![
            ("api_key".to_string(), TEST_API_KEY.to_string()),
            ("startDate".to_string(), "2023-01-01".to_string()),
            ("endDate".to_string(), "2023-01-31".to_string()),
            ("timeUnit".to_string(), "DAY".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_site_list_defaults() {
    let api = MockApi::new();
    let server = TestServer::start(api.router()).await.unwrap();

    server
        .client
        .get_list(&SiteListQuery::default())
        .await
        .unwrap();

    let request = api.last_request().unwrap();
    assert_eq!(request.path, "sites/list");
    assert_eq!(
        request.query_keys(),
        vec!["api_key", "size", "startIndex", "sortOrder", "status"]
    );
    assert_eq!(request.param("size"), Some("100"));
    assert_eq!(request.param("startIndex"), Some("0"));
    assert_eq!(request.param("sortOrder"), Some("ASC"));
    assert_eq!(request.param("status"), Some("Active,Pending"));
    assert_eq!(request.param("searchText"), None);
    assert_eq!(request.param("sortProperty"), None);
}

#[tokio::test]
async fn test_site_list_custom_query() {
    let api = MockApi::new();
    let server = TestServer::start(api.router()).await.unwrap();

    let query = SiteListQuery::default()
        .with_size(10)
        .with_start_index(20)
        .with_search_text("Garage")
        .with_sort("Name", SortOrder::Desc);
    server.client.get_list(&query).await.unwrap();

    let request = api.last_request().unwrap();
    assert_eq!(request.param("size"), Some("10"));
    assert_eq!(request.param("startIndex"), Some("20"));
    assert_eq!(request.param("searchText"), Some("Garage"));
    assert_eq!(request.param("sortProperty"), Some("Name"));
    assert_eq!(request.param("sortOrder"), Some("DESC"));
}

#[tokio::test]
async fn test_every_endpoint_path() {
    let api = MockApi::new();
    let server = TestServer::start(api.router()).await.unwrap();
    let client = &server.client;
    let (start, end) = (time(2023, 6, 1, 0, 0), time(2023, 6, 2, 0, 0));

    client.get_details(1).await.unwrap();
    client.get_data_period(1).await.unwrap();
    client
        .get_time_frame_energy(1, date(2023, 1, 1), date(2023, 12, 31), Some(TimeUnit::Year))
        .await
        .unwrap();
    client.get_power(1, start, end).await.unwrap();
    client.get_overview(1).await.unwrap();
    client.get_power_details(1, start, end, NONE).await.unwrap();
    client
        .get_energy_details(1, start, end, NONE, None)
        .await
        .unwrap();
    client.get_current_power_flow(1).await.unwrap();
    client.get_storage_data(1, start, end, NONE).await.unwrap();

    let paths: Vec<String> = api.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "site/1/details",
            "site/1/dataPeriod",
            "site/1/timeFrameEnergy",
            "site/1/power",
            "site/1/overview",
            "site/1/powerDetails",
            "site/1/energyDetails",
            "site/1/currentPowerFlow",
            "site/1/storageData",
        ]
    );

    for request in api.requests() {
        assert_eq!(request.param("api_key"), Some(TEST_API_KEY));
        assert_eq!(request.query_keys()[0], "api_key");
    }
}

#[tokio::test]
async fn test_time_window_format() {
    let api = MockApi::new();
    let server = TestServer::start(api.router()).await.unwrap();

    server
        .client
        .get_power(9, time(2023, 6, 1, 6, 15), time(2023, 6, 1, 18, 45))
        .await
        .unwrap();

    let request = api.last_request().unwrap();
    assert_eq!(request.param("startTime"), Some("2023-06-01 06:15:00"));
    assert_eq!(request.param("endTime"), Some("2023-06-01 18:45:00"));
}

#[tokio::test]
async fn test_multi_value_parameters() {
    let api = MockApi::new();
    let server = TestServer::start(api.router()).await.unwrap();
    let client = &server.client;
    let (start, end) = (time(2023, 6, 1, 0, 0), time(2023, 6, 2, 0, 0));

    client
        .get_power_details(1, start, end, &["Production", "Consumption"])
        .await
        .unwrap();
    assert_eq!(
        api.last_request().unwrap().param("meters"),
        Some("Production,Consumption")
    );

    client
        .get_energy_details(1, start, end, &["SelfConsumption"], Some(TimeUnit::Hour))
        .await
        .unwrap();
    let request = api.last_request().unwrap();
    assert_eq!(request.param("meters"), Some("SelfConsumption"));
    assert_eq!(request.param("timeUnit"), Some("HOUR"));

    client
        .get_storage_data(1, start, end, &["7F123456-00", "7F123456-01"])
        .await
        .unwrap();
    assert_eq!(
        api.last_request().unwrap().param("serials"),
        Some("7F123456-00,7F123456-01")
    );

    client.get_storage_data(1, start, end, NONE).await.unwrap();
    let request = api.last_request().unwrap();
    assert_eq!(request.param("serials"), None);
    assert_eq!(request.query_keys(), vec!["api_key", "startTime", "endTime"]);
}

// =============================================================================
// Error Mapping
// =============================================================================

#[tokio::test]
async fn test_forbidden_maps_to_http_status_error() {
    let api = MockApi::new();
    api.respond("site/1/overview", 403, "Invalid token");
    let server = TestServer::start(api.router()).await.unwrap();

    let err = server.client.get_overview(1).await.unwrap_err();
    match &err {
        MonitoringError::HttpStatus { status, body } => {
            assert_eq!(*status, 403);
            assert_eq!(body, "Invalid token");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.client.available_permits(), 3);
}

#[tokio::test]
async fn test_server_error_keeps_body() {
    let api = MockApi::new();
    api.respond(
        "site/2/details",
        500,
        json!({"String": "Internal error"}).to_string(),
    );
    let server = TestServer::start(api.router()).await.unwrap();

    let err = server.client.get_details(2).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("Internal error"));
}

#[tokio::test]
async fn test_redirect_is_reported_not_followed() {
    let router = Router::new()
        .route(
            "/site/1/overview",
            get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/elsewhere")]) }),
        )
        .route(
            "/elsewhere",
            get(|| async { Json(json!({"redirected": true})) }),
        );
    let server = TestServer::start(router).await.unwrap();

    let err = server.client.get_overview(1).await.unwrap_err();
    assert!(
        matches!(err, MonitoringError::HttpStatus { status: 302, .. }),
        "unexpected result: {err:?}"
    );
    assert_eq!(server.client.available_permits(), 3);
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode_error() {
    let api = MockApi::new();
    api.respond("site/3/dataPeriod", 200, "<html>maintenance</html>");
    let server = TestServer::start(api.router()).await.unwrap();

    let err = server.client.get_data_period(3).await.unwrap_err();
    assert!(err.is_decode());
    match err {
        MonitoringError::Decode { body, .. } => assert_eq!(body, "<html>maintenance</html>"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.client.available_permits(), 3);
}

#[tokio::test]
async fn test_unreachable_server_maps_to_transport_error() {
    let api = MockApi::new();
    let server = TestServer::start(api.router()).await.unwrap();
    let base_url = server.base_url();
    server.shutdown().await;

    let client = solaredge_client::MonitoringClient::builder(TEST_API_KEY)
        .base_url(base_url)
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let err = client.get_overview(1).await.unwrap_err();
    assert!(err.is_transport(), "unexpected error: {err:?}");
    assert_eq!(client.available_permits(), 3);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let api = MockApi::new();
    api.with_delay(Duration::from_millis(500));
    let server = TestServer::start_with_config(api.router(), Duration::from_millis(50), 3)
        .await
        .unwrap();

    let err = server.client.get_overview(1).await.unwrap_err();
    assert!(matches!(
        err,
        MonitoringError::Transport(solaredge_client::TransportError::Timeout)
    ));
    assert_eq!(server.client.available_permits(), 3);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_concurrent_requests_are_capped() {
    let api = MockApi::new();
    api.with_delay(Duration::from_millis(100));
    let server = TestServer::start(api.router()).await.unwrap();
    let client = &server.client;

    let calls = (1..=5).map(|site| client.get_overview(site));
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(api.requests().len(), 5);
    assert!(api.peak_in_flight() <= 3, "peak was {}", api.peak_in_flight());
    assert_eq!(client.available_permits(), 3);
}

#[tokio::test]
async fn test_single_permit_serializes_requests() {
    let api = MockApi::new();
    api.with_delay(Duration::from_millis(20));
    let server = TestServer::start_with_config(api.router(), Duration::from_secs(5), 1)
        .await
        .unwrap();
    let client = &server.client;

    let calls = (1..=4).map(|site| client.get_details(site));
    futures::future::join_all(calls).await;

    assert_eq!(api.peak_in_flight(), 1);
    assert_eq!(api.requests().len(), 4);
}
