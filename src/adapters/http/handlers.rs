use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::application::{WebhookOutcome, WebhookService};
use crate::domain::GateSnapshot;

/// JSON body returned for every webhook call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<WebhookOutcome> for WebhookResponse {
    fn from(outcome: WebhookOutcome) -> Self {
        Self {
            status: outcome.status().to_string(),
            message: outcome.message().map(str::to_string),
        }
    }
}

/// POST /webhook
///
/// The body is taken as raw bytes so that a missing or malformed JSON body
/// still gets the structured "Fehlende Daten" answer instead of an extractor
/// rejection.
///
/// The pipeline runs on its own task. A client hanging up drops this handler
/// future, but an order already on its way to the exchange still gets counted.
pub async fn webhook(
    State(service): State<Arc<WebhookService>>,
    body: Bytes,
) -> (StatusCode, Json<WebhookResponse>) {
    let task = tokio::spawn(async move { service.handle_body(&body).await });
    let outcome = task.await.unwrap_or_else(|e| {
        tracing::error!("Webhook pipeline task failed: {}", e);
        WebhookOutcome::InternalError
    });
    let code = StatusCode::from_u16(outcome.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (code, Json(WebhookResponse::from(outcome)))
}

/// GET /status
pub async fn status(State(service): State<Arc<WebhookService>>) -> Json<GateSnapshot> {
    Json(service.gate_snapshot())
}
