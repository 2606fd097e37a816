//! HTTP Adapter
//!
//! axum router exposing the webhook endpoint and a read-only gate status.

mod handlers;
mod server;

pub use handlers::WebhookResponse;
pub use server::{router, WebhookServer};
