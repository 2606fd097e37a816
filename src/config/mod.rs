//! Configuration Module
//!
//! Loads and validates configuration from TOML files; secrets from the environment.

pub mod loader;

pub use loader::{
    Config, ConfigError, Credentials, ExchangeSection, LoggingSection, ServerSection,
    TradingSection, load_config, load_config_or_default,
};
