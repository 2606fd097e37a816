//! Configuration Loader
//!
//! Loads and validates configuration from TOML files. Every section has
//! defaults, so a missing file or a partial file is fine. API secrets are
//! never read from the file; they come from the environment.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::domain::{DEFAULT_MAX_OPEN_LONGS, DEFAULT_QUANTITY_PRECISION, DEFAULT_RECV_WINDOW_MS};

pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";
pub const BASE_URL_ENV: &str = "BINANCE_BASE_URL";

/// Binance USDT-M Futures REST root
pub const DEFAULT_BASE_URL: &str = "https://fapi.binance.com/fapi/v1";
pub const DEFAULT_PORT: u16 = 5002;

/// Exchange-side ceiling for recvWindow
const MAX_RECV_WINDOW_MS: u64 = 60_000;
const MAX_QUANTITY_PRECISION: u32 = 8;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSection,
    pub exchange: ExchangeSection,
    pub trading: TradingSection,
    pub logging: LoggingSection,
}

/// HTTP listener
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerSection {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Exchange REST settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExchangeSection {
    /// REST root, e.g. https://fapi.binance.com/fapi/v1
    pub base_url: String,
    /// Tolerance between request timestamp and server time
    pub recv_window_ms: u64,
    /// Client-side request deadline. Unset means no deadline.
    pub timeout_secs: Option<u64>,
}

impl Default for ExchangeSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
            timeout_secs: None,
        }
    }
}

impl ExchangeSection {
    /// Base URL with `BINANCE_BASE_URL` taking precedence over the file
    pub fn get_base_url(&self) -> String {
        std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.base_url.clone())
    }
}

/// Order sizing and exposure cap
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TradingSection {
    /// Fixed USDT amount per order, same for every symbol
    pub usdt_per_order: Decimal,
    /// Maximum simultaneously open longs
    pub max_open_longs: u32,
    /// Decimal places for order quantities
    pub quantity_precision: u32,
}

impl Default for TradingSection {
    fn default() -> Self {
        Self {
            usdt_per_order: dec!(80.0),
            max_open_longs: DEFAULT_MAX_OPEN_LONGS,
            quantity_precision: DEFAULT_QUANTITY_PRECISION,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(&'static str),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load `path` if given, otherwise fall back to built-in defaults
pub fn load_config_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => load_config(p),
        None => {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".to_string(),
            ));
        }

        if self.exchange.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "exchange.base_url cannot be empty".to_string(),
            ));
        }

        if self.exchange.recv_window_ms == 0 || self.exchange.recv_window_ms > MAX_RECV_WINDOW_MS {
            return Err(ConfigError::ValidationError(format!(
                "exchange.recv_window_ms must be 1-{}, got {}",
                MAX_RECV_WINDOW_MS, self.exchange.recv_window_ms
            )));
        }

        if self.trading.usdt_per_order <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "trading.usdt_per_order must be > 0, got {}",
                self.trading.usdt_per_order
            )));
        }

        if self.trading.max_open_longs == 0 {
            return Err(ConfigError::ValidationError(
                "trading.max_open_longs must be >= 1".to_string(),
            ));
        }

        if self.trading.quantity_precision > MAX_QUANTITY_PRECISION {
            return Err(ConfigError::ValidationError(format!(
                "trading.quantity_precision must be 0-{}, got {}",
                MAX_QUANTITY_PRECISION, self.trading.quantity_precision
            )));
        }

        Ok(())
    }
}

/// API key/secret pair used to sign every order
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Read `BINANCE_API_KEY` / `BINANCE_API_SECRET`. Call after `dotenvy::dotenv()`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = require_env(API_KEY_ENV)?;
        let api_secret = require_env(API_SECRET_ENV)?;
        Ok(Self { api_key, api_secret })
    }
}

// Never leak the secret into logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("api_secret", &"***")
            .finish()
    }
}

fn mask(value: &str) -> String {
    let prefix: String = value.chars().take(4).collect();
    format!("{}***", prefix)
}

fn require_env(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingCredential(key))
}
