//! CLI definitions for the webhook relay.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// futures-webhook - alert webhook to Binance Futures market orders
#[derive(Parser, Debug)]
#[command(
    name = "futures-webhook",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Alert webhook relay for Binance USDT-M Futures",
    long_about = "Receives buy / close_long / close_short alerts on POST /webhook, sizes a \
                  fixed-USDT market order at the current ticker price and submits it as a \
                  signed hedge-mode LONG order, never holding more than the configured \
                  number of open longs."
)]
pub struct CliApp {
    /// The command to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the webhook listener
    Serve(ServeCmd),

    /// Show the current price and the quantity a buy would use (read-only)
    Price(PriceCmd),
}

/// Run the webhook listener
#[derive(Parser, Debug, Default)]
pub struct ServeCmd {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override listen host
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Override listen port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,
}

/// Price / quantity preview
#[derive(Parser, Debug)]
pub struct PriceCmd {
    /// Instrument symbol (e.g. BTCUSDT)
    #[arg(value_name = "SYMBOL")]
    pub symbol: String,

    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl CliApp {
    /// The command to run; bare invocation means `serve` with defaults
    pub fn command_or_default(self) -> Command {
        self.command.unwrap_or_else(|| Command::Serve(ServeCmd::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_serves() {
        let app = CliApp::try_parse_from(["futures-webhook"]).unwrap();
        assert!(matches!(app.command_or_default(), Command::Serve(cmd) if cmd.config.is_none()));
    }

    #[test]
    fn test_serve_overrides() {
        let app = CliApp::try_parse_from([
            "futures-webhook", "serve", "--config", "config/webhook.toml", "--port", "8080", "-v",
        ])
        .unwrap();
        assert!(app.verbose);
        match app.command_or_default() {
            Command::Serve(cmd) => {
                assert_eq!(cmd.port, Some(8080));
                assert_eq!(cmd.config, Some(PathBuf::from("config/webhook.toml")));
                assert!(cmd.host.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_price_command() {
        let app = CliApp::try_parse_from(["futures-webhook", "price", "ethusdt", "--debug"]).unwrap();
        assert!(app.debug);
        match app.command_or_default() {
            Command::Price(cmd) => assert_eq!(cmd.symbol, "ethusdt"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_price_requires_symbol() {
        assert!(CliApp::try_parse_from(["futures-webhook", "price"]).is_err());
    }
}
