//! Binance Client Tests against a local stub exchange
//!
//! A tiny axum app on 127.0.0.1 plays the futures REST API so the real
//! ticker and order clients (and the whole webhook pipeline) can be
//! exercised without network access.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Query, RawQuery, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use futures_webhook::adapters::binance::{
    BinanceConfig, BinanceOrderClient, BinanceTickerClient, RequestSigner, API_KEY_HEADER,
};
use futures_webhook::adapters::http::router;
use futures_webhook::application::{TradingParams, WebhookService};
use futures_webhook::config::Credentials;
use futures_webhook::domain::{OrderRequest, PositionGate};
use futures_webhook::ports::{ExecutionError, MarketDataError, OrderExecutor, PriceFeed};

const API_KEY: &str = "stub-key";
const API_SECRET: &str = "stub-secret";

/// (raw query, X-MBX-APIKEY header) per order request
type OrderLog = Arc<Mutex<Vec<(String, Option<String>)>>>;

// ============================================================================
// Stub exchange
// ============================================================================

async fn ticker_price(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
    let price = match params.get("symbol").map(String::as_str) {
        Some("BTCUSDT") => "40000.00",
        Some("FAILUSDT") => "4.00",
        Some("BROKENUSDT") => "not-a-number",
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                json!({"code": -1121, "msg": "Invalid symbol."}).to_string(),
            )
        }
    };
    let symbol = params.get("symbol").cloned().unwrap_or_default();
    (StatusCode::OK, json!({"symbol": symbol, "price": price}).to_string())
}

async fn place_order(
    State(log): State<OrderLog>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> (StatusCode, String) {
    let query = query.unwrap_or_default();
    let key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    log.lock().unwrap().push((query.clone(), key));

    if query.contains("symbol=FAILUSDT") {
        return (
            StatusCode::BAD_REQUEST,
            json!({"code": -2019, "msg": "Margin is insufficient."}).to_string(),
        );
    }

    (
        StatusCode::OK,
        json!({
            "orderId": 4242,
            "symbol": "BTCUSDT",
            "status": "NEW",
            "origQty": "0.002",
            "executedQty": "0",
            "avgPrice": "0.00",
            "positionSide": "LONG",
            "side": "BUY",
            "type": "MARKET"
        })
        .to_string(),
    )
}

async fn spawn_exchange() -> (BinanceConfig, OrderLog) {
    let log: OrderLog = Arc::default();
    let app = Router::new()
        .route("/fapi/v1/ticker/price", get(ticker_price))
        .route("/fapi/v1/order", post(place_order))
        .with_state(log.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = BinanceConfig::with_base_url(format!("http://{}/fapi/v1", addr));
    (config, log)
}

fn order_client(config: BinanceConfig) -> BinanceOrderClient {
    BinanceOrderClient::new(config, &Credentials::new(API_KEY, API_SECRET)).unwrap()
}

/// Splits `...&signature=<hex>` into the signed part and the signature
fn split_signature(query: &str) -> (&str, &str) {
    query.rsplit_once("&signature=").unwrap()
}

// ============================================================================
// Ticker
// ============================================================================

#[tokio::test]
async fn test_ticker_price() {
    let (config, _) = spawn_exchange().await;
    let ticker = BinanceTickerClient::new(config).unwrap();
    assert_eq!(ticker.latest_price("BTCUSDT").await.unwrap(), dec!(40000.00));
}

#[tokio::test]
async fn test_ticker_unknown_symbol() {
    let (config, _) = spawn_exchange().await;
    let ticker = BinanceTickerClient::new(config).unwrap();
    match ticker.latest_price("NOPEUSDT").await {
        Err(MarketDataError::HttpStatus { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("-1121"));
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ticker_unparsable_price() {
    let (config, _) = spawn_exchange().await;
    let ticker = BinanceTickerClient::new(config).unwrap();
    assert!(matches!(
        ticker.latest_price("BROKENUSDT").await,
        Err(MarketDataError::ParseError(_))
    ));
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_order_is_signed() {
    let (config, log) = spawn_exchange().await;
    let client = order_client(config);

    let order = OrderRequest::open_long("BTCUSDT", dec!(0.002), 5000);
    let ack = client.submit_order(&order).await.unwrap();
    assert_eq!(ack.order_id, Some(4242));
    assert_eq!(ack.status.as_deref(), Some("NEW"));

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    let (query, key) = &log[0];
    assert_eq!(key.as_deref(), Some(API_KEY));

    let (signed, signature) = split_signature(query);
    assert_eq!(signed, order.query_string());
    assert_eq!(signature, RequestSigner::new(API_SECRET).unwrap().sign(signed));
    assert_eq!(signature.len(), 64);
}

#[tokio::test]
async fn test_order_rejection_keeps_body() {
    let (config, log) = spawn_exchange().await;
    let client = order_client(config);

    let order = OrderRequest::open_long("FAILUSDT", dec!(20), 5000);
    match client.submit_order(&order).await {
        Err(ExecutionError::Rejected { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("Margin is insufficient."));
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
    // exactly one attempt
    assert_eq!(log.lock().unwrap().len(), 1);
}

// ============================================================================
// Full pipeline
// ============================================================================

async fn webhook(app: &Router, payload: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn pipeline() -> (Router, Arc<PositionGate>, OrderLog) {
    let (config, log) = spawn_exchange().await;
    let gate = Arc::new(PositionGate::new(2));
    let service = WebhookService::new(
        Arc::new(BinanceTickerClient::new(config.clone()).unwrap()),
        Arc::new(order_client(config)),
        gate.clone(),
        TradingParams::default(),
    );
    (router(Arc::new(service)), gate, log)
}

#[tokio::test]
async fn test_webhook_buy_end_to_end() {
    let (app, gate, log) = pipeline().await;

    let (status, body) = webhook(&app, json!({"action": "buy", "symbol": "btcusdt"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success"}));
    assert_eq!(gate.open_longs(), 1);

    let log = log.lock().unwrap();
    let (signed, signature) = split_signature(&log[0].0);
    assert!(signed.starts_with(
        "symbol=BTCUSDT&side=BUY&positionSide=LONG&type=MARKET&quantity=0.002&timestamp="
    ));
    assert!(signed.ends_with("&recvWindow=5000"));
    assert_eq!(signature, RequestSigner::new(API_SECRET).unwrap().sign(signed));
}

#[tokio::test]
async fn test_webhook_rejected_order_end_to_end() {
    let (app, gate, log) = pipeline().await;

    let (status, body) = webhook(&app, json!({"action": "buy", "symbol": "FAILUSDT"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"status": "error", "message": "Buy fehlgeschlagen"}));
    assert_eq!(gate.open_longs(), 0);

    // 80 / 4 = 20
    let log = log.lock().unwrap();
    assert!(log[0].0.contains("&quantity=20&"));
}

#[tokio::test]
async fn test_webhook_invalid_symbol_end_to_end() {
    let (app, gate, log) = pipeline().await;

    let (status, body) = webhook(&app, json!({"action": "buy", "symbol": "NOPEUSDT"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Ungültiger Preis");
    assert_eq!(gate.open_longs(), 0);
    assert!(log.lock().unwrap().is_empty());
}
