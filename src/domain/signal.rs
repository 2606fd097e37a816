use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors raised while turning a webhook payload into a [`TradeSignal`]
#[derive(Debug, Error, PartialEq)]
pub enum SignalError {
    #[error("Payload is empty or not a JSON object")]
    NotAnObject,
    #[error("Missing or non-string field: {0}")]
    MissingField(&'static str),
}

/// What the alert asks us to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalAction {
    Buy,
    CloseLong,
    CloseShort,
    Other(String),
}

impl SignalAction {
    /// Parse an action name, case-insensitively
    pub fn parse(raw: &str) -> Self {
        let action = raw.to_lowercase();
        match action.as_str() {
            "buy" => SignalAction::Buy,
            "close_long" => SignalAction::CloseLong,
            "close_short" => SignalAction::CloseShort,
            _ => SignalAction::Other(action),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SignalAction::Buy => "buy",
            SignalAction::CloseLong => "close_long",
            SignalAction::CloseShort => "close_short",
            SignalAction::Other(s) => s,
        }
    }
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single alert received on the webhook
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSignal {
    pub action: SignalAction,
    /// Instrument identifier, always upper-cased
    pub symbol: String,
}

impl TradeSignal {
    pub fn new(action: SignalAction, symbol: &str) -> Self {
        Self {
            action,
            symbol: symbol.to_uppercase(),
        }
    }

    /// Extract the signal from a decoded webhook body.
    ///
    /// Only `action` and `symbol` are read; any other fields are ignored.
    pub fn from_payload(payload: &Value) -> Result<Self, SignalError> {
        let obj = payload.as_object().ok_or(SignalError::NotAnObject)?;

        let action = obj
            .get("action")
            .and_then(Value::as_str)
            .ok_or(SignalError::MissingField("action"))?;
        let symbol = obj
            .get("symbol")
            .and_then(Value::as_str)
            .ok_or(SignalError::MissingField("symbol"))?;

        Ok(Self::new(SignalAction::parse(action), symbol))
    }

    /// Decode raw request bytes. An empty or non-JSON body counts as missing data.
    pub fn from_slice(body: &[u8]) -> Result<Self, SignalError> {
        let payload: Value =
            serde_json::from_slice(body).map_err(|_| SignalError::NotAnObject)?;
        Self::from_payload(&payload)
    }
}
