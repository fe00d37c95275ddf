//! Prompt composition.
//!
//! # Responsibilities
//! - Classify a webhook event name into an [`EventKind`]
//! - Render ticket fields into the template for that kind
//!
//! # Design Decisions
//! - Classification is a case-insensitive substring test; "updated" is
//!   checked before "assigned", anything else is a creation
//! - Substitution is a single pass: values inserted into the output are
//!   never scanned for placeholders again
//! - Missing optional fields render as fixed defaults, never as errors

mod templates;

use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Rendered when a changelog carries no items.
pub const NO_CHANGES: &str = "No specific changes detected";

const DEFAULT_PRIORITY: &str = "None";
const DEFAULT_STATUS: &str = "Unknown";
const DEFAULT_ASSIGNEE: &str = "Unassigned";
const DEFAULT_CHANGE_VALUE: &str = "None";

/// Coarse event kind used to pick a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Created,
    Updated,
    Assigned,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "issue_created",
            EventKind::Updated => "issue_updated",
            EventKind::Assigned => "issue_assigned",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A template is missing a placeholder it is required to carry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template '{kind}' is missing placeholder '{{{placeholder}}}'")]
    MissingPlaceholder {
        kind: EventKind,
        placeholder: &'static str,
    },
}

/// One changed field from a webhook changelog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub field: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Ticket data available to templates.
#[derive(Debug, Clone, Default)]
pub struct TicketFields {
    pub ticket_key: String,
    pub project_key: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub ticket_url: String,
    /// Only rendered for [`EventKind::Updated`].
    pub changelog: Vec<ChangelogEntry>,
}

impl TicketFields {
    fn value(&self, placeholder: &str) -> Option<Cow<'_, str>> {
        let value = match placeholder {
            "ticket_key" => Cow::Borrowed(self.ticket_key.as_str()),
            "project_key" => Cow::Borrowed(self.project_key.as_str()),
            "summary" => Cow::Borrowed(self.summary.as_deref().unwrap_or("")),
            "description" => Cow::Borrowed(self.description.as_deref().unwrap_or("")),
            "priority" => Cow::Borrowed(self.priority.as_deref().unwrap_or(DEFAULT_PRIORITY)),
            "status" => Cow::Borrowed(self.status.as_deref().unwrap_or(DEFAULT_STATUS)),
            "assignee" => Cow::Borrowed(self.assignee.as_deref().unwrap_or(DEFAULT_ASSIGNEE)),
            "ticket_url" => Cow::Borrowed(self.ticket_url.as_str()),
            "changelog" => Cow::Owned(render_changelog(&self.changelog)),
            _ => return None,
        };
        Some(value)
    }
}

/// Classify a webhook event name such as `jira:issue_updated`.
pub fn classify(event_name: &str) -> EventKind {
    let lower = event_name.to_lowercase();
    if lower.contains("updated") {
        EventKind::Updated
    } else if lower.contains("assigned") {
        EventKind::Assigned
    } else {
        EventKind::Created
    }
}

/// Render the template for `kind` with `fields`.
pub fn render(kind: EventKind, fields: &TicketFields) -> Result<String, TemplateError> {
    let template = templates::body(kind);
    check_template(kind, template)?;
    Ok(substitute(template, |name| {
        // `changelog` only exists in the update template.
        if name == "changelog" && kind != EventKind::Updated {
            return None;
        }
        fields.value(name)
    }))
}

/// Render changelog items as `- field: from → to` lines.
pub fn render_changelog(items: &[ChangelogEntry]) -> String {
    if items.is_empty() {
        return NO_CHANGES.to_string();
    }
    items
        .iter()
        .map(|item| {
            format!(
                "- {}: {} → {}",
                item.field,
                item.from.as_deref().unwrap_or(DEFAULT_CHANGE_VALUE),
                item.to.as_deref().unwrap_or(DEFAULT_CHANGE_VALUE),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_template(kind: EventKind, template: &str) -> Result<(), TemplateError> {
    for &placeholder in templates::required_placeholders(kind) {
        if !template.contains(&format!("{{{}}}", placeholder)) {
            return Err(TemplateError::MissingPlaceholder {
                kind,
                placeholder,
            });
        }
    }
    Ok(())
}

/// Replace `{name}` tokens for which `lookup` returns a value; everything
/// else is copied through unchanged.
fn substitute<'a, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<Cow<'a, str>>,
{
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => match lookup(&after[..close]) {
                Some(value) => {
                    out.push_str(&value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
