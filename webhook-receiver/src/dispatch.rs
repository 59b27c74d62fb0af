//! Event dispatcher.
//!
//! Maps event types to handlers. A handler registered without an event type
//! becomes the default and receives every delivery that has no handler of
//! its own.
//!
//! ## Dispatch Flow
//!
//! ```text
//! EventType → registered handler? → yes: Matched
//!                                 → no:  default handler? → yes: Fallback
//!                                                         → no:  Unhandled
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::event::EventType;
use crate::hooks::{on_issue_comment, on_issues, on_push};

/// Callback invoked with a verified, parsed payload.
pub type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Which branch a dispatch took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The handler registered for this event type ran
    Matched(EventType),
    /// No specific handler; the default handler ran
    Fallback,
    /// No specific or default handler; nothing ran
    Unhandled,
}

/// Registry of event handlers.
///
/// Populated at startup and shared read-only afterwards.
#[derive(Default, Clone)]
pub struct Dispatcher {
    handlers: HashMap<EventType, Handler>,
    default: Option<Handler>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher wired with the stock handlers.
    ///
    /// The push handler is registered without an event type, so it also
    /// serves as the default for every event nobody else claims.
    pub fn with_default_hooks() -> Self {
        Self::new()
            .hook(None, on_push)
            .hook(Some(EventType::Issues), on_issues)
            .hook(Some(EventType::IssueComment), on_issue_comment)
    }

    /// Store `handler` under `event_type`, or as the default when `None`.
    ///
    /// A later registration for the same key replaces the earlier one.
    pub fn register<F>(&mut self, event_type: Option<EventType>, handler: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        match event_type {
            Some(event_type) => {
                self.handlers.insert(event_type, handler);
            }
            None => self.default = Some(handler),
        }
    }

    /// Builder form of [`Dispatcher::register`].
    pub fn hook<F>(mut self, event_type: Option<EventType>, handler: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.register(event_type, handler);
        self
    }

    /// Run exactly one handler for `event_type`, synchronously.
    pub fn dispatch(&self, event_type: &EventType, payload: &Value) -> Dispatch {
        if let Some(handler) = self.handlers.get(event_type) {
            debug!(event = %event_type, "dispatch_matched");
            handler(payload);
            return Dispatch::Matched(event_type.clone());
        }

        match &self.default {
            Some(handler) => {
                debug!(event = %event_type, "dispatch_fallback");
                handler(payload);
                Dispatch::Fallback
            }
            None => {
                debug!(event = %event_type, "dispatch_unhandled");
                Dispatch::Unhandled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&Value) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move |_: &Value| {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_dispatch_matched() {
        let (issues, on_issues) = counter();
        let (default, on_default) = counter();
        let dispatcher = Dispatcher::new()
            .hook(None, on_default)
            .hook(Some(EventType::Issues), on_issues);

        let result = dispatcher.dispatch(&EventType::Issues, &json!({}));

        assert_eq!(result, Dispatch::Matched(EventType::Issues));
        assert_eq!(issues.load(Ordering::SeqCst), 1);
        assert_eq!(default.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dispatch_fallback() {
        let (issues, on_issues) = counter();
        let (default, on_default) = counter();
        let dispatcher = Dispatcher::new()
            .hook(None, on_default)
            .hook(Some(EventType::Issues), on_issues);

        let star = EventType::parse("star");
        let result = dispatcher.dispatch(&star, &json!({}));

        assert_eq!(result, Dispatch::Fallback);
        assert_eq!(issues.load(Ordering::SeqCst), 0);
        assert_eq!(default.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_unhandled() {
        let (issues, on_issues) = counter();
        let dispatcher = Dispatcher::new().hook(Some(EventType::Issues), on_issues);

        let result = dispatcher.dispatch(&EventType::Push, &json!({}));

        assert_eq!(result, Dispatch::Unhandled);
        assert_eq!(issues.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_register_replaces_handler() {
        let (first, on_first) = counter();
        let (second, on_second) = counter();
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Some(EventType::Push), on_first);
        dispatcher.register(Some(EventType::Push), on_second);

        dispatcher.dispatch(&EventType::Push, &json!({}));

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_receives_payload() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let dispatcher = Dispatcher::new().hook(Some(EventType::IssueComment), move |v: &Value| {
            sink.lock().unwrap().push(v.clone());
        });

        let payload = json!({"action": "created", "comment": {"id": 1}});
        dispatcher.dispatch(&EventType::IssueComment, &payload);

        assert_eq!(*seen.lock().unwrap(), vec![payload]);
    }

    #[test]
    fn test_repeated_dispatch_is_not_deduplicated() {
        let (push, on_push) = counter();
        let dispatcher = Dispatcher::new().hook(None, on_push);
        let payload = json!({"ref": "refs/heads/main"});

        dispatcher.dispatch(&EventType::Push, &payload);
        dispatcher.dispatch(&EventType::Push, &payload);

        assert_eq!(push.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_default_hooks_routing() {
        let dispatcher = Dispatcher::with_default_hooks();
        let payload = json!({"zen": "test"});

        assert_eq!(
            dispatcher.dispatch(&EventType::Issues, &payload),
            Dispatch::Matched(EventType::Issues)
        );
        assert_eq!(
            dispatcher.dispatch(&EventType::IssueComment, &payload),
            Dispatch::Matched(EventType::IssueComment)
        );
        // Push is the default handler, not a keyed one.
        assert_eq!(
            dispatcher.dispatch(&EventType::Push, &payload),
            Dispatch::Fallback
        );
        assert_eq!(
            dispatcher.dispatch(&EventType::parse("star"), &payload),
            Dispatch::Fallback
        );
    }
}
