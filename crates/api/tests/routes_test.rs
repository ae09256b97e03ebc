mod common;

use api::routes::create_router;
use axum::{
    body::{to_bytes, Body},
    extract::connect_info::MockConnectInfo,
    http::{header, Request, StatusCode},
    Router,
};
use common::*;
use serde_json::Value;
use shared::TokenHolding;
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;

fn static_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bonkboy-static-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<html><body>BONKBOY</body></html>").unwrap();
    dir
}

fn app(ledger: Arc<MockLedger>, max_requests: u32, name: &str) -> Router {
    let dir = static_dir(name);
    create_router(app_state(ledger, max_requests, dir.to_str().unwrap()))
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

/// Collects formatted log output in memory
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn test_balance_of_empty_wallet_is_zero() {
    let app = app(Arc::new(MockLedger::new()), 30, "empty");

    let (status, headers, body) = get(&app, &format!("/api/balance/{}", WRAPPED_SOL)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::json!({ "balance": 0.0 }));
    assert!(headers[header::CACHE_CONTROL].to_str().unwrap().contains("no-store"));
}

#[tokio::test]
async fn test_balance_of_holder() {
    let ledger = MockLedger::new().with_holdings(
        HOLDER_WALLET,
        vec![
            TokenHolding::new(OTHER_MINT, 5.0),
            TokenHolding::new(TARGET_MINT, 42.5),
        ],
    );
    let app = app(Arc::new(ledger), 30, "holder");

    let (status, _, body) = get(&app, &format!("/api/balance/{}", HOLDER_WALLET)).await;

    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["balance"], 42.5);
    assert!(body.get("tokens").is_none());
}

#[tokio::test]
async fn test_malformed_wallet_is_client_error() {
    let ledger = Arc::new(MockLedger::new());
    let app = app(ledger.clone(), 30, "malformed");

    let (status, headers, body) = get(&app, "/api/balance/not-a-wallet").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].is_string());
    assert!(headers.contains_key(header::CACHE_CONTROL));
    assert_eq!(ledger.call_count(), 0);
}

#[tokio::test]
async fn test_upstream_failure_is_generic_500() {
    let ledger = MockLedger::new().failing("upstream 10.0.0.7:8899 refused connection");
    let app = app(Arc::new(ledger), 30, "upstream");

    let (status, headers, body) = get(&app, &format!("/api/balance/{}", EMPTY_WALLET)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body), serde_json::json!({ "error": "Failed to fetch balance" }));
    assert!(!String::from_utf8_lossy(&body).contains("10.0.0.7"));
    assert!(headers[header::CACHE_CONTROL].to_str().unwrap().contains("no-store"));
}

#[tokio::test]
async fn test_upstream_failure_detail_is_logged() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let ledger = MockLedger::new().failing("upstream 10.0.0.7:8899 refused connection");
    let app = app(Arc::new(ledger), 30, "upstream-log");

    let (status, _, _) = get(&app, &format!("/api/balance/{}", EMPTY_WALLET)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let output = logs.contents();
    assert!(output.contains("ERROR"), "no error event in: {}", output);
    assert!(output.contains(EMPTY_WALLET));
    assert!(output.contains("upstream 10.0.0.7:8899 refused connection"));
}

#[tokio::test]
async fn test_healthcheck_reports_slot() {
    let app = app(Arc::new(MockLedger::new()), 30, "health");

    let (status, _, body) = get(&app, "/healthcheck").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Solana RPC live (slot: 250000000)");
}

#[tokio::test]
async fn test_healthcheck_failure() {
    let app = app(Arc::new(MockLedger::new().failing("down")), 30, "health-down");

    let (status, _, body) = get(&app, "/healthcheck").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(String::from_utf8(body).unwrap(), "RPC error");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = app(Arc::new(MockLedger::new()), 30, "unknown");

    let (status, _, body) = get(&app, "/api/unknown").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json(&body)["error"],
        "Route not found. Try /api/balance/:wallet or /healthcheck"
    );
}

#[tokio::test]
async fn test_root_serves_index_page() {
    let app = app(Arc::new(MockLedger::new()), 30, "root");

    let (status, headers, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("BONKBOY"));
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert!(!headers.contains_key(header::PRAGMA));
}

#[tokio::test]
async fn test_thirty_first_request_is_throttled() {
    let ledger = Arc::new(MockLedger::new());
    let app = app(ledger.clone(), 30, "throttle");
    let uri = format!("/api/balance/{}", EMPTY_WALLET);

    for _ in 0..30 {
        let (status, _, _) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json(&body)["error"], "Too many requests. Please slow down.");
    assert_eq!(ledger.call_count(), 30);
}

#[tokio::test]
async fn test_throttled_balance_response_is_not_cacheable() {
    let app = app(Arc::new(MockLedger::new()), 1, "throttle-cache");
    let uri = format!("/api/balance/{}", EMPTY_WALLET);

    let (status, _, _) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);

    let (status, headers, _) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(headers[header::CACHE_CONTROL].to_str().unwrap().contains("no-store"));
    assert_eq!(headers[header::PRAGMA], "no-cache");
    assert_eq!(headers[header::EXPIRES], "0");
}
