pub mod webhook_service;

pub use webhook_service::{
    quote, Quote, QuoteRejection, TradingParams, WebhookOutcome, WebhookService,
};
