//! Web server module for receiving webhooks.
//!
//! Routes:
//! - `GET /`: fixed greeting
//! - `POST /postreceive`: signed GitHub deliveries, dispatched by event type

pub mod error;
pub mod handlers;
pub mod signature;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::WebhookError;
pub use handlers::{hello_world, post_receive, AppState, WebhookResponse};
pub use signature::{
    is_signature_verification_enabled, sign, verify_signature, Signature, SignatureError,
};

/// Path of the webhook endpoint.
pub const WEBHOOK_PATH: &str = "/postreceive";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello_world))
        .route(WEBHOOK_PATH, post(post_receive))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
