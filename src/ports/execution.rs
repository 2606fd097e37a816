use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::OrderRequest;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("API request failed: {0}")]
    ApiError(String),
    /// Exchange answered with something other than HTTP 200
    #[error("Order rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Exchange confirmation of a placed order.
///
/// Every field is optional: a 200 response means the order was accepted even
/// when the body does not carry the fields we like to log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub orig_qty: Option<String>,
    #[serde(default)]
    pub executed_qty: Option<String>,
    #[serde(default)]
    pub avg_price: Option<String>,
}

/// Signed order submission. Every call has real financial effect.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderExecutor: Send + Sync {
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, ExecutionError>;
}
