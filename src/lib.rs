//! futures-webhook - Alert Webhook Relay Library
//!
//! Turns trading alerts into signed market orders on Binance USDT-M Futures
//! (hedge mode), capping the number of simultaneously open longs.
//!
//! # Modules
//!
//! - `domain`: Core business logic (TradeSignal, OrderRequest, PositionGate, quantity sizing)
//! - `ports`: Trait abstractions (PriceFeed, OrderExecutor)
//! - `adapters`: External implementations (Binance REST, axum HTTP, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Webhook pipeline

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
