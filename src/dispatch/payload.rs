//! JIRA webhook payload extraction.
//!
//! Every field is read independently from the raw JSON. A missing field, a
//! `null`, or a value of the wrong shape (e.g. `"priority": "High"` where an
//! object is expected) is simply absent; the documented defaults are applied
//! by the caller. Numbers and booleans where text is expected are rendered
//! as text. Extraction never fails.

use serde_json::Value;

use crate::prompt::ChangelogEntry;

/// Placeholder used for missing project and ticket keys.
pub const UNKNOWN_KEY: &str = "UNKNOWN";

/// Text of a scalar leaf; objects, arrays and `null` are absent.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// A parsed webhook body.
#[derive(Debug, Clone)]
pub struct WebhookPayload {
    raw: Value,
}

impl WebhookPayload {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    fn text(&self, pointer: &str) -> Option<String> {
        scalar_text(self.raw.pointer(pointer))
    }

    pub fn event_name(&self) -> String {
        self.text("/webhookEvent").unwrap_or_default()
    }

    pub fn ticket_key(&self) -> String {
        self.text("/issue/key").unwrap_or_else(|| UNKNOWN_KEY.to_string())
    }

    pub fn project_key(&self) -> String {
        self.text("/issue/fields/project/key")
            .unwrap_or_else(|| UNKNOWN_KEY.to_string())
    }

    pub fn summary(&self) -> Option<String> {
        self.text("/issue/fields/summary")
    }

    /// Description as text; structured documents (API v3 rich text) are
    /// rendered as compact JSON.
    pub fn description(&self) -> Option<String> {
        match self.raw.pointer("/issue/fields/description")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn priority(&self) -> Option<String> {
        self.text("/issue/fields/priority/name")
    }

    pub fn status(&self) -> Option<String> {
        self.text("/issue/fields/status/name")
    }

    pub fn assignee(&self) -> Option<String> {
        self.text("/issue/fields/assignee/displayName")
    }

    /// Changelog items; entries that are not objects are skipped.
    pub fn changelog_entries(&self) -> Vec<ChangelogEntry> {
        let Some(Value::Array(items)) = self.raw.pointer("/changelog/items") else {
            return Vec::new();
        };
        items
            .iter()
            .filter(|item| item.is_object())
            .map(|item| ChangelogEntry {
                field: scalar_text(item.get("field")).unwrap_or_default(),
                from: scalar_text(item.get("fromString")),
                to: scalar_text(item.get("toString")),
            })
            .collect()
    }
}

/// Returns true when the payload carries issue data worth routing: a
/// non-empty JSON object. Anything else (`[]`, `""`, `0`, `false`, `null`)
/// is no issue data.
pub fn has_issue(raw: &Value) -> bool {
    matches!(raw.get("issue"), Some(Value::Object(map)) if !map.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_payload() {
        let payload = WebhookPayload::new(json!({
            "webhookEvent": "jira:issue_updated",
            "issue": {
                "key": "ABC-7",
                "fields": {
                    "project": {"key": "ABC"},
                    "summary": "Crash on save",
                    "description": "Steps...",
                    "priority": {"name": "High"},
                    "status": {"name": "Open"},
                    "assignee": {"displayName": "Jane Doe"}
                }
            },
            "changelog": {"items": [{"field": "status", "fromString": "Open", "toString": "Done"}]}
        }));

        assert_eq!(payload.event_name(), "jira:issue_updated");
        assert_eq!(payload.ticket_key(), "ABC-7");
        assert_eq!(payload.project_key(), "ABC");
        assert_eq!(payload.summary().as_deref(), Some("Crash on save"));
        assert_eq!(payload.description().as_deref(), Some("Steps..."));
        assert_eq!(payload.priority().as_deref(), Some("High"));
        assert_eq!(payload.status().as_deref(), Some("Open"));
        assert_eq!(payload.assignee().as_deref(), Some("Jane Doe"));
        assert_eq!(
            payload.changelog_entries(),
            vec![ChangelogEntry {
                field: "status".into(),
                from: Some("Open".into()),
                to: Some("Done".into()),
            }]
        );
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let payload = WebhookPayload::new(json!({
            "issue": {
                "fields": {
                    "priority": null,
                    "assignee": null,
                    "status": {},
                    "description": null
                }
            },
            "changelog": {"items": [{"field": "labels", "toString": null}]}
        }));

        assert_eq!(payload.event_name(), "");
        assert_eq!(payload.ticket_key(), UNKNOWN_KEY);
        assert_eq!(payload.project_key(), UNKNOWN_KEY);
        assert_eq!(payload.summary(), None);
        assert_eq!(payload.description(), None);
        assert_eq!(payload.priority(), None);
        assert_eq!(payload.status(), None);
        assert_eq!(payload.assignee(), None);
        assert_eq!(payload.changelog_entries()[0].to, None);
    }

    #[test]
    fn test_unexpected_types_are_tolerated() {
        let payload = WebhookPayload::new(json!({
            "webhookEvent": 7,
            "issue": {
                "key": 5,
                "fields": {
                    "project": {"key": 10001},
                    "summary": 42,
                    "priority": "High",
                    "status": ["Open"],
                    "assignee": {"displayName": true}
                }
            },
            "changelog": {"items": [{"field": "points", "fromString": 1, "toString": {"x": 1}}, "junk"]}
        }));

        assert_eq!(payload.event_name(), "7");
        assert_eq!(payload.ticket_key(), "5");
        assert_eq!(payload.project_key(), "10001");
        assert_eq!(payload.summary().as_deref(), Some("42"));
        assert_eq!(payload.priority(), None);
        assert_eq!(payload.status(), None);
        assert_eq!(payload.assignee().as_deref(), Some("true"));
        assert_eq!(
            payload.changelog_entries(),
            vec![ChangelogEntry {
                field: "points".into(),
                from: Some("1".into()),
                to: None,
            }]
        );
    }

    #[test]
    fn test_wrong_shaped_containers() {
        let payload = WebhookPayload::new(json!({
            "issue": {"key": "A-1", "fields": "oops"},
            "changelog": {"items": {"field": "status"}}
        }));
        assert_eq!(payload.ticket_key(), "A-1");
        assert_eq!(payload.project_key(), UNKNOWN_KEY);
        assert!(payload.changelog_entries().is_empty());
    }

    #[test]
    fn test_rich_text_description() {
        let payload = WebhookPayload::new(json!({
            "issue": {"fields": {"description": {"type": "doc", "version": 1}}}
        }));
        let description = payload.description().unwrap();
        assert!(description.contains("\"type\":\"doc\""));
    }

    #[test]
    fn test_has_issue() {
        assert!(!has_issue(&json!({"webhookEvent": "x"})));
        assert!(!has_issue(&json!({"issue": null})));
        assert!(!has_issue(&json!({"issue": {}})));
        assert!(!has_issue(&json!({"issue": []})));
        assert!(!has_issue(&json!({"issue": [1]})));
        assert!(!has_issue(&json!({"issue": false})));
        assert!(!has_issue(&json!({"issue": 0})));
        assert!(!has_issue(&json!({"issue": ""})));
        assert!(!has_issue(&json!({"issue": "A-1"})));
        assert!(has_issue(&json!({"issue": {"key": "A-1"}})));
    }
}
