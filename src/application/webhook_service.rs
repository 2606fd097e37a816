//! Webhook Service
//!
//! Runs one alert through the pipeline:
//! validate -> price -> quantity -> gate check -> submit -> gate commit.
//!
//! Every path ends in exactly one [`WebhookOutcome`]; exchange failures are
//! converted here and never escape as errors.
//!
//! `close_long` only frees a gate slot. It does not send a closing order to
//! the exchange, so the exchange-side position stays open until something
//! else (e.g. an exchange-side stop) closes it.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::Config;
use crate::domain::{
    calculate_quantity, GateSnapshot, OrderRequest, PositionGate, SignalAction, TradeSignal,
    DEFAULT_QUANTITY_PRECISION, DEFAULT_RECV_WINDOW_MS,
};
use crate::ports::{OrderExecutor, PriceFeed};

/// Sizing constants applied to every signal
#[derive(Debug, Clone, PartialEq)]
pub struct TradingParams {
    pub usdt_per_order: Decimal,
    pub quantity_precision: u32,
    pub recv_window_ms: u64,
}

impl Default for TradingParams {
    fn default() -> Self {
        Self {
            usdt_per_order: Decimal::from(80),
            quantity_precision: DEFAULT_QUANTITY_PRECISION,
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
        }
    }
}

impl From<&Config> for TradingParams {
    fn from(config: &Config) -> Self {
        Self {
            usdt_per_order: config.trading.usdt_per_order,
            quantity_precision: config.trading.quantity_precision,
            recv_window_ms: config.exchange.recv_window_ms,
        }
    }
}

/// Price and the quantity a buy would use at that price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub price: Decimal,
    pub quantity: Decimal,
}

#[derive(Debug, Error)]
pub enum QuoteRejection {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
    #[error("Quantity {0} rounds to nothing")]
    QuantityTooLow(Decimal),
}

/// Fetch the price for `symbol` and size an order against it
pub async fn quote(
    prices: &dyn PriceFeed,
    symbol: &str,
    params: &TradingParams,
) -> Result<Quote, QuoteRejection> {
    let price = prices
        .latest_price(symbol)
        .await
        .map_err(|e| QuoteRejection::InvalidPrice(e.to_string()))?;

    if price <= Decimal::ZERO {
        return Err(QuoteRejection::InvalidPrice(format!("non-positive price {}", price)));
    }

    let quantity = calculate_quantity(params.usdt_per_order, price, params.quantity_precision)
        .map_err(|e| QuoteRejection::InvalidPrice(e.to_string()))?;

    if quantity <= Decimal::ZERO {
        return Err(QuoteRejection::QuantityTooLow(quantity));
    }

    Ok(Quote { price, quantity })
}

/// Terminal state of one webhook request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    MissingData,
    InvalidPrice,
    QuantityTooLow,
    MaxReached,
    Opened,
    BuyFailed,
    Closed,
    NoneActive,
    ShortIgnored,
    UnknownAction,
    /// The pipeline task itself failed (panic or runtime shutdown)
    InternalError,
}

impl WebhookOutcome {
    pub fn http_status(&self) -> u16 {
        match self {
            WebhookOutcome::MissingData
            | WebhookOutcome::InvalidPrice
            | WebhookOutcome::QuantityTooLow
            | WebhookOutcome::UnknownAction => 400,
            WebhookOutcome::BuyFailed | WebhookOutcome::InternalError => 500,
            WebhookOutcome::MaxReached
            | WebhookOutcome::Opened
            | WebhookOutcome::Closed
            | WebhookOutcome::NoneActive
            | WebhookOutcome::ShortIgnored => 200,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            WebhookOutcome::MissingData
            | WebhookOutcome::InvalidPrice
            | WebhookOutcome::QuantityTooLow
            | WebhookOutcome::BuyFailed
            | WebhookOutcome::InternalError => "error",
            WebhookOutcome::MaxReached | WebhookOutcome::ShortIgnored => "ignored",
            WebhookOutcome::Opened => "success",
            WebhookOutcome::Closed => "closed",
            WebhookOutcome::NoneActive => "none_active",
            WebhookOutcome::UnknownAction => "unknown_action",
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            WebhookOutcome::MissingData => Some("Fehlende Daten"),
            WebhookOutcome::InvalidPrice => Some("Ungültiger Preis"),
            WebhookOutcome::QuantityTooLow => Some("Menge zu gering"),
            WebhookOutcome::MaxReached => Some("Max erreicht"),
            WebhookOutcome::BuyFailed => Some("Buy fehlgeschlagen"),
            WebhookOutcome::ShortIgnored => Some("Short deaktiviert"),
            WebhookOutcome::InternalError => Some("Interner Fehler"),
            WebhookOutcome::Opened
            | WebhookOutcome::Closed
            | WebhookOutcome::NoneActive
            | WebhookOutcome::UnknownAction => None,
        }
    }
}

/// Handles webhook signals against one exchange account
pub struct WebhookService {
    prices: Arc<dyn PriceFeed>,
    orders: Arc<dyn OrderExecutor>,
    gate: Arc<PositionGate>,
    params: TradingParams,
}

impl WebhookService {
    pub fn new(
        prices: Arc<dyn PriceFeed>,
        orders: Arc<dyn OrderExecutor>,
        gate: Arc<PositionGate>,
        params: TradingParams,
    ) -> Self {
        Self {
            prices,
            orders,
            gate,
            params,
        }
    }

    pub fn gate(&self) -> &PositionGate {
        &self.gate
    }

    pub fn gate_snapshot(&self) -> GateSnapshot {
        self.gate.snapshot()
    }

    /// Entry point for a raw request body
    pub async fn handle_body(&self, body: &[u8]) -> WebhookOutcome {
        tracing::debug!(raw = %String::from_utf8_lossy(body), "Webhook received");

        match TradeSignal::from_slice(body) {
            Ok(signal) => self.handle_signal(signal).await,
            Err(e) => {
                tracing::warn!("Rejected webhook payload: {}", e);
                WebhookOutcome::MissingData
            }
        }
    }

    pub async fn handle_signal(&self, signal: TradeSignal) -> WebhookOutcome {
        let TradeSignal { action, symbol } = signal;

        // Priced for every action, matching the alert contract
        let quote = match quote(self.prices.as_ref(), &symbol, &self.params).await {
            Ok(q) => q,
            Err(QuoteRejection::InvalidPrice(reason)) => {
                tracing::warn!(%symbol, %action, "Invalid price: {}", reason);
                return WebhookOutcome::InvalidPrice;
            }
            Err(QuoteRejection::QuantityTooLow(qty)) => {
                tracing::warn!(%symbol, %action, quantity = %qty, "Quantity too low");
                return WebhookOutcome::QuantityTooLow;
            }
        };

        match action {
            SignalAction::Buy => self.open_long(&symbol, quote.quantity).await,
            SignalAction::CloseLong => self.close_long(&symbol),
            SignalAction::CloseShort => {
                tracing::info!(%symbol, "Short close ignored - short handling disabled");
                WebhookOutcome::ShortIgnored
            }
            SignalAction::Other(other) => {
                tracing::warn!(%symbol, action = %other, "Unknown action");
                WebhookOutcome::UnknownAction
            }
        }
    }

    async fn open_long(&self, symbol: &str, quantity: Decimal) -> WebhookOutcome {
        let Some(reservation) = self.gate.try_reserve() else {
            tracing::warn!(
                %symbol,
                max_open_longs = self.gate.max_open_longs(),
                "Max open longs reached - buy ignored"
            );
            return WebhookOutcome::MaxReached;
        };

        let order = OrderRequest::open_long(symbol, quantity, self.params.recv_window_ms);

        match self.orders.submit_order(&order).await {
            Ok(_) => {
                let open_longs = reservation.commit_open();
                tracing::info!(%symbol, %quantity, open_longs, "New long opened");
                WebhookOutcome::Opened
            }
            Err(e) => {
                // reservation dropped here: slot returned, count unchanged
                tracing::error!(%symbol, %quantity, "Buy failed: {}", e);
                WebhookOutcome::BuyFailed
            }
        }
    }

    fn close_long(&self, symbol: &str) -> WebhookOutcome {
        if self.gate.try_close_one() {
            tracing::info!(
                %symbol,
                open_longs = self.gate.open_longs(),
                "Long closed locally (no exchange order sent)"
            );
            WebhookOutcome::Closed
        } else {
            tracing::info!(%symbol, "No long position active");
            WebhookOutcome::NoneActive
        }
    }
}
