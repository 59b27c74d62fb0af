//! HTTP endpoint handlers.
//!
//! The webhook endpoint runs its steps in a fixed order:
//! 1. Verify the signature (if a secret is configured), SHA-256 first,
//!    then the legacy SHA-1 header
//! 2. Read the event type header
//! 3. Parse the body
//! 4. Dispatch to exactly one handler
//!
//! A failure at any step returns before the next one runs.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::event::{
    EventType, DELIVERY_HEADER, EVENT_HEADER, LEGACY_SIGNATURE_HEADER, SIGNATURE_HEADER,
};
use crate::web::error::WebhookError;
use crate::web::signature::{is_signature_verification_enabled, verify_signature, Signature};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
        }
    }
}

// =============================================================================
// Hello World
// =============================================================================

/// Informational endpoint.
pub async fn hello_world() -> &'static str {
    debug!("Hello World!");
    "Hello, World!"
}

// =============================================================================
// Webhook
// =============================================================================

/// Webhook response body.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Webhook receiving endpoint.
pub async fn post_receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookError> {
    match &state.config.webhook_secret {
        Some(secret) if is_signature_verification_enabled(&state.config.webhook_secret) => {
            let signature = Signature::from_headers(
                header_str(&headers, SIGNATURE_HEADER),
                header_str(&headers, LEGACY_SIGNATURE_HEADER),
            );
            verify_signature(secret, &body, signature)?;
        }
        _ => warn!("webhook_secret_not_configured"),
    }

    let event_type = header_str(&headers, EVENT_HEADER)
        .map(EventType::parse)
        .ok_or(WebhookError::MissingHeader(EVENT_HEADER))?;

    let payload = parse_payload(&headers, &body)?;

    info!(
        event = %event_type,
        delivery = header_str(&headers, DELIVERY_HEADER).unwrap_or("-"),
        body_length = body.len(),
        "webhook_received"
    );

    let outcome = state.dispatcher.dispatch(&event_type, &payload);
    debug!(event = %event_type, outcome = ?outcome, "webhook_dispatched");

    Ok((
        StatusCode::OK,
        Json(WebhookResponse {
            status: "received",
            event: Some(event_type.to_string()),
            message: None,
        }),
    ))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Decode the delivery body.
///
/// Form-encoded deliveries carry the JSON document in the `payload` field;
/// everything else is treated as a JSON body.
fn parse_payload(headers: &HeaderMap, body: &[u8]) -> Result<Value, WebhookError> {
    let is_form = header_str(headers, CONTENT_TYPE.as_str())
        .map(|ct| ct.trim().starts_with(FORM_CONTENT_TYPE))
        .unwrap_or(false);

    if !is_form {
        return Ok(serde_json::from_slice(body)?);
    }

    let (_, raw) = url::form_urlencoded::parse(body)
        .find(|(key, _)| key == "payload")
        .ok_or_else(|| WebhookError::MalformedPayload("missing payload field".to_string()))?;

    Ok(serde_json::from_str(&raw)?)
}
