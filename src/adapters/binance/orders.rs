//! Signed order placement on Binance USDT-M Futures.
//!
//! Flow per order:
//!   1. canonical query from the `OrderRequest` (fixed key order)
//!   2. HMAC-SHA256 over that exact string, keyed by the API secret
//!   3. POST {base}/order?{query}&signature={sig} with X-MBX-APIKEY
//!
//! HTTP 200 is success; anything else is surfaced with its raw body.
//! Nothing is retried: a second POST could open a second position.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::config::BinanceConfig;
use super::signer::RequestSigner;
use crate::config::Credentials;
use crate::domain::OrderRequest;
use crate::ports::execution::{ExecutionError, OrderAck, OrderExecutor};

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

#[derive(Deserialize, Debug)]
struct BinanceError {
    code: i64,
    msg: String,
}

#[derive(Debug, Clone)]
pub struct BinanceOrderClient {
    config: BinanceConfig,
    api_key: String,
    signer: RequestSigner,
    http: Client,
}

impl BinanceOrderClient {
    pub fn new(config: BinanceConfig, credentials: &Credentials) -> Result<Self, ExecutionError> {
        let http = config
            .build_http()
            .map_err(|e| ExecutionError::ApiError(format!("Failed to create HTTP client: {}", e)))?;
        let signer = RequestSigner::new(&credentials.api_secret)
            .map_err(|e| ExecutionError::ApiError(e.to_string()))?;
        Ok(Self {
            config,
            api_key: credentials.api_key.clone(),
            signer,
            http,
        })
    }

    /// Full request URL including the signature
    fn signed_url(&self, order: &OrderRequest) -> String {
        let query = self.signer.signed_query(&order.query_string());
        format!("{}?{}", self.config.endpoint("/order"), query)
    }
}

#[async_trait]
impl OrderExecutor for BinanceOrderClient {
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, ExecutionError> {
        let url = self.signed_url(order);

        tracing::info!(symbol = %order.symbol, "Placing {}", order);

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| ExecutionError::ApiError(format!("POST /order failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExecutionError::ApiError(format!("Failed to read response body: {}", e)))?;

        if status != StatusCode::OK {
            match serde_json::from_str::<BinanceError>(&body) {
                Ok(e) => tracing::error!("Binance API error {}: {}", e.code, e.msg),
                Err(_) => tracing::error!("HTTP {} - body: {}", status, body),
            }
            return Err(ExecutionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // The order is live at this point; an odd body must not turn it into a failure.
        let ack = serde_json::from_str::<OrderAck>(&body).unwrap_or_else(|e| {
            tracing::warn!("Order accepted but response not understood ({}): {}", e, body);
            OrderAck::default()
        });

        tracing::info!(
            order_id = ?ack.order_id,
            status = ?ack.status,
            executed_qty = ?ack.executed_qty,
            "{} {} {} accepted",
            order.side.as_str(),
            order.position_side.as_str(),
            order.symbol
        );
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderSide, OrderType, PositionSide};
    use rust_decimal_macros::dec;

    fn client() -> BinanceOrderClient {
        BinanceOrderClient::new(
            BinanceConfig::with_base_url("http://127.0.0.1:1/fapi/v1"),
            &Credentials::new("key", "secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_signed_url_layout() {
        let order = OrderRequest {
            symbol: "BTCUSDT".to_string(),
            side: OrderSide::Buy,
            position_side: PositionSide::Long,
            order_type: OrderType::Market,
            quantity: dec!(0.002),
            timestamp: 1_700_000_000_000,
            recv_window: 5000,
        };
        let url = client().signed_url(&order);
        let query = order.query_string();
        let expected_sig = RequestSigner::new("secret").unwrap().sign(&query);

        assert_eq!(
            url,
            format!("http://127.0.0.1:1/fapi/v1/order?{}&signature={}", query, expected_sig)
        );
    }

    #[test]
    fn test_order_ack_parsing() {
        let body = r#"{"orderId":283194212,"symbol":"BTCUSDT","status":"NEW","clientOrderId":"x",
            "origQty":"0.002","executedQty":"0","avgPrice":"0.00","type":"MARKET","side":"BUY"}"#;
        let ack: OrderAck = serde_json::from_str(body).unwrap();
        assert_eq!(ack.order_id, Some(283194212));
        assert_eq!(ack.status.as_deref(), Some("NEW"));
        assert_eq!(ack.orig_qty.as_deref(), Some("0.002"));
    }

    #[tokio::test]
    async fn test_unreachable_exchange_is_api_error() {
        let order = OrderRequest::open_long("BTCUSDT", dec!(0.002), 5000);
        let result = client().submit_order(&order).await;
        assert!(matches!(result, Err(ExecutionError::ApiError(_))));
    }
}
