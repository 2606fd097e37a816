use std::time::Duration;

use reqwest::Client;

use crate::config::ExchangeSection;
use crate::config::loader::DEFAULT_BASE_URL;

/// Binance USDT-M Futures REST settings shared by the ticker and order clients.
///
/// `recvWindow` is an order parameter and travels with each `OrderRequest`.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// REST root without trailing slash, e.g. https://fapi.binance.com/fapi/v1
    pub base_url: String,
    /// None = no client-side deadline
    pub timeout: Option<Duration>,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl BinanceConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub(crate) fn build_http(&self) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

impl From<&ExchangeSection> for BinanceConfig {
    fn from(section: &ExchangeSection) -> Self {
        Self {
            base_url: section.get_base_url(),
            timeout: section.timeout_secs.map(Duration::from_secs),
        }
    }
}
