//! futures-webhook - Alert Webhook Relay for Binance USDT-M Futures

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use futures_webhook::adapters::binance::{BinanceConfig, BinanceOrderClient, BinanceTickerClient};
use futures_webhook::adapters::cli::{CliApp, Command, PriceCmd, ServeCmd};
use futures_webhook::adapters::http::WebhookServer;
use futures_webhook::application::{quote, TradingParams, WebhookService};
use futures_webhook::config::{load_config_or_default, Config, Credentials};
use futures_webhook::domain::PositionGate;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (API secrets go here, not in the config file)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    let (verbose, debug) = (app.verbose, app.debug);

    match app.command_or_default() {
        Command::Serve(cmd) => serve_command(cmd, verbose, debug).await,
        Command::Price(cmd) => price_command(cmd, verbose, debug).await,
    }
}

/// RUST_LOG wins, then --debug / --verbose, then the configured level
fn init_logging(verbose: bool, debug: bool, configured: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug")
        } else if verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new(configured)
        }
    });

    fmt().with_env_filter(filter).init();
}

fn load(path: Option<PathBuf>) -> Result<Config> {
    // Expand ~ in the config path
    let path = path.map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).to_string()));
    let shown = path.as_ref().map(|p| p.display().to_string());
    load_config_or_default(path).with_context(|| match shown {
        Some(p) => format!("Failed to load configuration from {}", p),
        None => "Invalid built-in configuration".to_string(),
    })
}

async fn serve_command(cmd: ServeCmd, verbose: bool, debug: bool) -> Result<()> {
    let mut config = load(cmd.config)?;
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    config.validate().context("Invalid command-line override")?;

    init_logging(verbose, debug, &config.logging.level);

    let credentials = Credentials::from_env()
        .context("API credentials are required to place orders")?;

    let exchange = BinanceConfig::from(&config.exchange);
    let prices = BinanceTickerClient::new(exchange.clone())
        .context("Failed to create ticker client")?;
    let orders = BinanceOrderClient::new(exchange, &credentials)
        .context("Failed to create order client")?;

    let gate = Arc::new(PositionGate::new(config.trading.max_open_longs));
    let service = Arc::new(WebhookService::new(
        Arc::new(prices),
        Arc::new(orders),
        gate,
        TradingParams::from(&config),
    ));

    tracing::info!(
        base_url = %config.exchange.get_base_url(),
        usdt_per_order = %config.trading.usdt_per_order,
        max_open_longs = config.trading.max_open_longs,
        "Starting futures-webhook"
    );
    tracing::warn!("Open-long count starts at 0; positions opened before this start are not counted");

    WebhookServer::new(service)
        .serve(&config.server.bind_addr())
        .await
}

async fn price_command(cmd: PriceCmd, verbose: bool, debug: bool) -> Result<()> {
    let config = load(cmd.config)?;
    init_logging(verbose, debug, &config.logging.level);

    let prices = BinanceTickerClient::new(BinanceConfig::from(&config.exchange))
        .context("Failed to create ticker client")?;
    let symbol = cmd.symbol.to_uppercase();
    let params = TradingParams::from(&config);

    let q = quote(&prices, &symbol, &params)
        .await
        .with_context(|| format!("Failed to quote {}", symbol))?;

    println!("Symbol:   {}", symbol);
    println!("Price:    {}", q.price.normalize());
    println!("Quantity: {} (for {} USDT)", q.quantity.normalize(), params.usdt_per_order.normalize());

    Ok(())
}
