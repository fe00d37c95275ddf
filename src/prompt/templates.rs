//! Message templates sent to the agent, one per event kind.
//!
//! Placeholders are `{name}`; see [`super::render`] for the substitution rules.

use super::EventKind;

pub(crate) const ISSUE_CREATED: &str = "
New JIRA ticket created: {ticket_key}

Summary: {summary}
Description: {description}
Priority: {priority}
Assignee: {assignee}
Project: {project_key}

Please:
1. Analyze this ticket
2. Create a branch named 'feature/{ticket_key}'
3. Set up initial project structure if needed
4. Create a plan in CLAUDE.md for implementing this feature
5. Start working on the implementation

Ticket URL: {ticket_url}
";

pub(crate) const ISSUE_UPDATED: &str = "
JIRA ticket updated: {ticket_key}

Summary: {summary}
Description: {description}
Priority: {priority}
Status: {status}
Assignee: {assignee}
Project: {project_key}

Changes made:
{changelog}

Please:
1. Review the changes to this ticket
2. Update your implementation plan if needed
3. Continue or adjust your work based on the updates

Ticket URL: {ticket_url}
";

pub(crate) const ISSUE_ASSIGNED: &str = "
JIRA ticket assigned to you: {ticket_key}

Summary: {summary}
Description: {description}
Priority: {priority}
Assignee: {assignee}
Project: {project_key}

Please:
1. Review this newly assigned ticket
2. Create a branch named 'feature/{ticket_key}' if it doesn't exist
3. Create or update your implementation plan
4. Begin work on the ticket

Ticket URL: {ticket_url}
";

const COMMON_PLACEHOLDERS: &[&str] = &[
    "ticket_key",
    "summary",
    "description",
    "priority",
    "assignee",
    "project_key",
    "ticket_url",
];

const UPDATED_PLACEHOLDERS: &[&str] = &[
    "ticket_key",
    "summary",
    "description",
    "priority",
    "status",
    "assignee",
    "project_key",
    "changelog",
    "ticket_url",
];

/// Template body for an event kind.
pub(crate) fn body(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Created => ISSUE_CREATED,
        EventKind::Updated => ISSUE_UPDATED,
        EventKind::Assigned => ISSUE_ASSIGNED,
    }
}

/// Placeholders the template for `kind` must contain.
pub(crate) fn required_placeholders(kind: EventKind) -> &'static [&'static str] {
    match kind {
        EventKind::Updated => UPDATED_PLACEHOLDERS,
        EventKind::Created | EventKind::Assigned => COMMON_PLACEHOLDERS,
    }
}
