use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

/// Market data error type
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("REST API error: {0}")]
    RestError(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Data parsing error: {0}")]
    ParseError(String),
}

/// Latest-price lookup for a single instrument
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Last traded price for `symbol` (e.g. "BTCUSDT")
    async fn latest_price(&self, symbol: &str) -> Result<Decimal, MarketDataError>;
}
