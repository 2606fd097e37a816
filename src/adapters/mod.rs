//! Adapters Layer - External System Implementations
//!
//! - Binance: ticker price feed and signed order submission
//! - HTTP: axum webhook endpoint
//! - CLI: command-line interface

pub mod binance;
pub mod http;
pub mod cli;

pub use binance::{BinanceConfig, BinanceOrderClient, BinanceTickerClient};
pub use http::{WebhookServer, WebhookResponse};
pub use cli::CliApp;
