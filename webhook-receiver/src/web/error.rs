//! Errors surfaced by the webhook endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::web::handlers::WebhookResponse;
use crate::web::signature::SignatureError;

/// A delivery rejected before dispatch.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("signature verification failed: {0}")]
    Signature(#[from] SignatureError),

    #[error("missing header: {0}")]
    MissingHeader(&'static str),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::Signature(_)
            | WebhookError::MissingHeader(_)
            | WebhookError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            WebhookError::Signature(_) => "invalid_signature",
            WebhookError::MissingHeader(_) => "missing_header",
            WebhookError::MalformedPayload(_) => "malformed_payload",
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(WebhookResponse {
                status: self.code(),
                event: None,
                message: Some(self.to_string()),
            }),
        )
            .into_response()
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(e: serde_json::Error) -> Self {
        WebhookError::MalformedPayload(e.to_string())
    }
}
