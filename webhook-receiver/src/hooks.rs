//! Stock event handlers. Each one logs the payload it receives.

use serde_json::Value;
use tracing::debug;

/// Log line written for a delivery: `Got <label> event with: <payload>`.
pub fn describe_event(label: &str, payload: &Value) -> String {
    format!("Got {} event with: {}", label, payload)
}

pub fn on_push(payload: &Value) {
    debug!("{}", describe_event("push", payload));
}

pub fn on_issues(payload: &Value) {
    debug!("{}", describe_event("issues", payload));
}

pub fn on_issue_comment(payload: &Value) {
    debug!("{}", describe_event("issue_comment", payload));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;
    use serde_json::json;

    fn assert_single_debug_line(lines: &[String], label: &str) {
        assert_eq!(lines.len(), 1, "expected one line, got {:?}", lines);
        let line = &lines[0];
        assert!(line.contains("DEBUG"), "not a debug line: {}", line);
        assert!(line.contains(&format!("Got {} event with:", label)), "{}", line);
        assert!(line.contains(r#"{"zen":"test"}"#), "{}", line);
    }

    #[test]
    fn test_on_issues_logs_debug_line() {
        let lines = capture_logs(|| on_issues(&json!({"zen": "test"})));
        assert_single_debug_line(&lines, "issues");
        assert!(lines[0].contains("issues event"));
    }

    #[test]
    fn test_on_issue_comment_logs_debug_line() {
        let lines = capture_logs(|| on_issue_comment(&json!({"zen": "test"})));
        assert_single_debug_line(&lines, "issue_comment");
    }

    #[test]
    fn test_on_push_logs_debug_line() {
        let lines = capture_logs(|| on_push(&json!({"zen": "test"})));
        assert_single_debug_line(&lines, "push");
    }

    #[test]
    fn test_describe_issues_event() {
        let line = describe_event("issues", &json!({"zen": "test"}));
        assert!(line.contains("issues event"));
        assert!(line.contains(r#"{"zen":"test"}"#));
    }

    #[test]
    fn test_describe_non_object_payload() {
        assert_eq!(
            describe_event("push", &json!([1, 2])),
            "Got push event with: [1,2]"
        );
        assert_eq!(
            describe_event("push", &Value::Null),
            "Got push event with: null"
        );
    }
}
