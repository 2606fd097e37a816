use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::application::WebhookService;

pub struct WebhookServer {
    service: Arc<WebhookService>,
}

impl WebhookServer {
    #[must_use]
    pub const fn new(service: Arc<WebhookService>) -> Self {
        Self { service }
    }

    pub fn router(&self) -> Router {
        router(self.service.clone())
    }

    /// Listen on `addr` until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Webhook listening on http://{}/webhook", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Webhook server stopped");
        Ok(())
    }
}

/// Routes: `POST /webhook`, `GET /status`
pub fn router(service: Arc<WebhookService>) -> Router {
    Router::new()
        .route("/webhook", post(handlers::webhook))
        .route("/status", get(handlers::status))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::warn!("Received SIGTERM, shutting down"),
    }
}
