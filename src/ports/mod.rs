//! Ports Layer - Trait definitions for external dependencies
//!
//! The interfaces adapters must implement:
//! - Price lookup (ticker endpoint)
//! - Order execution (signed order placement)

pub mod market_data;
pub mod execution;

pub use market_data::{PriceFeed, MarketDataError};
pub use execution::{OrderExecutor, ExecutionError, OrderAck};
