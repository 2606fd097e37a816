use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default tolerance (ms) between request timestamp and exchange server time
pub const DEFAULT_RECV_WINDOW_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

/// Hedge-mode position bucket, independent of the order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Long => "LONG",
            PositionSide::Short => "SHORT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
        }
    }
}

/// A single market order, built fresh for every submission
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub position_side: PositionSide,
    pub order_type: OrderType,
    pub quantity: Decimal,
    /// Epoch milliseconds at build time
    pub timestamp: i64,
    pub recv_window: u64,
}

impl OrderRequest {
    /// Market order stamped with the current time
    pub fn market(
        symbol: &str,
        side: OrderSide,
        position_side: PositionSide,
        quantity: Decimal,
        recv_window: u64,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            position_side,
            order_type: OrderType::Market,
            quantity,
            timestamp: chrono::Utc::now().timestamp_millis(),
            recv_window,
        }
    }

    /// Open (or add to) a hedge-mode long
    pub fn open_long(symbol: &str, quantity: Decimal, recv_window: u64) -> Self {
        Self::market(symbol, OrderSide::Buy, PositionSide::Long, quantity, recv_window)
    }

    /// Parameters in signing order. The exchange verifies the signature against
    /// the exact byte sequence, so this order must never change between the
    /// signed string and the submitted URL.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.as_str().to_string()),
            ("positionSide", self.position_side.as_str().to_string()),
            ("type", self.order_type.as_str().to_string()),
            ("quantity", self.quantity.normalize().to_string()),
            ("timestamp", self.timestamp.to_string()),
            ("recvWindow", self.recv_window.to_string()),
        ]
    }

    /// Canonical query string (unsigned), values percent-encoded
    pub fn query_string(&self) -> String {
        self.params()
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} qty={}",
            self.side.as_str(),
            self.position_side.as_str(),
            self.order_type.as_str(),
            self.symbol,
            self.quantity.normalize()
        )
    }
}
