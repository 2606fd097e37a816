//! Binance Futures Adapter
//!
//! Implementations of `PriceFeed` (public ticker) and `OrderExecutor`
//! (HMAC-signed order placement) for Binance USDT-M Futures in hedge mode.

mod config;
mod orders;
mod signer;
mod ticker;

pub use config::BinanceConfig;
pub use orders::{BinanceOrderClient, API_KEY_HEADER};
pub use signer::{RequestSigner, SigningError};
pub use ticker::BinanceTickerClient;
