//! Contract tests for the snapshot and insight fetch clients.

use snapview_tests::{snapshot_body, Arc, FetchError, Mode, Range, ScriptedHttpClient, Symbol};
use snapview_core::{FetchKey, InsightClient, SnapshotClient};

fn key(symbol: &str, range: Range, mode: Mode) -> FetchKey {
    FetchKey::new(Symbol::parse(symbol).expect("valid symbol"), range, mode)
}

// =============================================================================
// Snapshot client: success path
// =============================================================================

#[tokio::test]
async fn decodes_real_world_payload_shapes() {
    // Given: a payload with epoch header timestamp, pandas-style series
    // timestamps, a non-trading gap, and "N/A" metrics
    let http = Arc::new(ScriptedHttpClient::new());
    http.push_response(200, snapshot_body("AAPL", 190.12));
    let client = SnapshotClient::new(http.clone(), "http://test/api/price-history");

    // When: the client fetches
    let snapshot = client
        .fetch(&key("AAPL", Range::OneDay, Mode::Price))
        .await
        .expect("payload should decode");

    // Then: gaps stay gaps and unavailable metrics decode to None
    assert_eq!(snapshot.chart.series[1].value, None);
    assert_eq!(snapshot.metrics.open, None);
    assert_eq!(snapshot.metrics.prev_close, Some(188.77));
    assert_eq!(snapshot.metrics.volume, Some(51_234_567));
    assert_eq!(snapshot.header.timestamp.unix_timestamp(), 1_704_207_600);

    // And: the key was encoded into the query string
    assert_eq!(
        http.requests(),
        vec!["http://test/api/price-history?symbol=AAPL&range=1d&mode=price"]
    );
}

// =============================================================================
// Snapshot client: failure taxonomy
// =============================================================================

#[tokio::test]
async fn server_error_message_prefers_detail_then_error_field() {
    let http = Arc::new(ScriptedHttpClient::new());
    http.push_response(404, r#"{"detail": "No data found for symbol"}"#);
    http.push_response(500, r#"{"error": "Snapshot unavailable"}"#);
    http.push_response(503, "upstream maintenance page");
    let client = SnapshotClient::new(http, "http://test/api/price-history");
    let fetch_key = key("ZZZZ", Range::OneDay, Mode::Price);

    let with_detail = client.fetch(&fetch_key).await.expect_err("404 must fail");
    assert_eq!(with_detail.to_string(), "No data found for symbol");
    assert_eq!(with_detail.status(), Some(404));

    let with_error = client.fetch(&fetch_key).await.expect_err("500 must fail");
    assert_eq!(with_error.to_string(), "Snapshot unavailable");

    let generic = client.fetch(&fetch_key).await.expect_err("503 must fail");
    assert_eq!(generic.to_string(), "request failed with status 503");
}

#[tokio::test]
async fn transport_failure_is_a_network_error() {
    let http = Arc::new(ScriptedHttpClient::new());
    http.push_transport_error("connection refused");
    let client = SnapshotClient::new(http, "http://test/api/price-history");

    let error = client
        .fetch(&key("AAPL", Range::OneDay, Mode::Price))
        .await
        .expect_err("must fail");
    assert!(matches!(error, FetchError::Network(_)));
    assert_eq!(error.to_string(), "network error: connection refused");
}

#[tokio::test]
async fn undecodable_success_body_is_malformed() {
    let http = Arc::new(ScriptedHttpClient::new());
    http.push_response(200, r#"{"header": {"name": "incomplete"}}"#);
    let client = SnapshotClient::new(http, "http://test/api/price-history");

    let error = client
        .fetch(&key("AAPL", Range::OneDay, Mode::Price))
        .await
        .expect_err("must fail");
    assert!(matches!(error, FetchError::Malformed(_)));
}

// =============================================================================
// Insight client
// =============================================================================

#[tokio::test]
async fn insight_client_extracts_the_insight_field() {
    let http = Arc::new(ScriptedHttpClient::new());
    http.push_response(200, r#"{"insight": "Earnings beat expectations."}"#);
    let client = InsightClient::new(http.clone(), "http://test/api/generate-insights");

    let insight = client
        .fetch(&Symbol::parse("AAPL").expect("valid"))
        .await
        .expect("insight should decode");
    assert_eq!(insight, "Earnings beat expectations.");
    assert_eq!(
        http.requests(),
        vec!["http://test/api/generate-insights?symbol=AAPL"]
    );
}

#[tokio::test]
async fn insight_client_surfaces_server_errors_to_its_caller() {
    // The engine treats these as best-effort and drops them; the client
    // itself still reports them faithfully.
    let http = Arc::new(ScriptedHttpClient::new());
    http.push_response(429, r#"{"detail": "quota exhausted"}"#);
    let client = InsightClient::new(http, "http://test/api/generate-insights");

    let error = client
        .fetch(&Symbol::parse("AAPL").expect("valid"))
        .await
        .expect_err("must fail");
    assert_eq!(error.to_string(), "quota exhausted");
}
