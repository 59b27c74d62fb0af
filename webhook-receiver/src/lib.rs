//! Webhook receiver - verifies and logs GitHub webhook deliveries.
//!
//! ## Architecture
//!
//! ```text
//! POST /postreceive → signature check → event type → JSON body → Dispatcher → hook
//! GET  /            → "Hello, World!"
//! ```
//!
//! Configuration and the handler registry are built explicitly at startup
//! and injected into the router through [`AppState`].

pub mod config;
pub mod dispatch;
pub mod event;
pub mod hooks;
pub mod telemetry;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{Config, InvalidVar, LogFormat};
pub use dispatch::{Dispatch, Dispatcher, Handler};
pub use event::EventType;
pub use web::{router, AppState, WebhookError, WEBHOOK_PATH};
