use std::str::FromStr;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::config::BinanceConfig;
use crate::ports::market_data::{MarketDataError, PriceFeed};

/// Public ticker endpoint client. Needs no credentials.
#[derive(Debug, Clone)]
pub struct BinanceTickerClient {
    config: BinanceConfig,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    #[allow(dead_code)]
    #[serde(default)]
    symbol: Option<String>,
    price: String,
}

impl BinanceTickerClient {
    pub fn new(config: BinanceConfig) -> Result<Self, MarketDataError> {
        let http = config
            .build_http()
            .map_err(|e| MarketDataError::RestError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }
}

/// Decode `{"price": "<decimal>"}`
fn parse_ticker(body: &str) -> Result<Decimal, MarketDataError> {
    let ticker: TickerPrice = serde_json::from_str(body)
        .map_err(|e| MarketDataError::ParseError(format!("ticker body: {}", e)))?;
    Decimal::from_str(ticker.price.trim())
        .map_err(|e| MarketDataError::ParseError(format!("price {:?}: {}", ticker.price, e)))
}

#[async_trait]
impl PriceFeed for BinanceTickerClient {
    async fn latest_price(&self, symbol: &str) -> Result<Decimal, MarketDataError> {
        let url = self.config.endpoint("/ticker/price");
        tracing::debug!(%symbol, "GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| MarketDataError::RestError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MarketDataError::RestError(e.to_string()))?;

        if status != StatusCode::OK {
            return Err(MarketDataError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        parse_ticker(&body)
    }
}
