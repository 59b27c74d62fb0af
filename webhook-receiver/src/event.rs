//! Event types carried in the `X-GitHub-Event` header.

use std::fmt;

/// Header naming the event type of a delivery.
pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// Header carrying the unique delivery id.
pub const DELIVERY_HEADER: &str = "X-GitHub-Delivery";

/// Header carrying the HMAC-SHA256 signature of the body.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Legacy header carrying the HMAC-SHA1 signature of the body.
pub const LEGACY_SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// Kind of event a webhook delivery reports.
///
/// Unrecognized names are kept verbatim in [`EventType::Unknown`] so they can
/// still be logged and routed to the default handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Push,
    Issues,
    IssueComment,
    Unknown(String),
}

impl EventType {
    /// Map a header value to an event type. Never fails.
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "push" => EventType::Push,
            "issues" => EventType::Issues,
            "issue_comment" => EventType::IssueComment,
            other => EventType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventType::Push => "push",
            EventType::Issues => "issues",
            EventType::IssueComment => "issue_comment",
            EventType::Unknown(name) => name,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
