//! Webhook dispatch.
//!
//! # Data Flow
//! ```text
//! raw body
//!     → parse (non-empty JSON object, else InvalidPayload)
//!     → payload.rs (issue present? extract keys and fields)
//!     → routing (lookup by project key)
//!     → prompt (classify event, render template)
//!     → agent (POST {endpoint}/message)
//!     → Outcome / DispatchError
//! ```
//!
//! # Design Decisions
//! - Linear: one request in, at most one delivery attempt, one result out
//! - "Ignored" is an outcome, not an error
//! - Transport failures and downstream rejections stay distinguishable

pub mod payload;

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::agent::{AgentClient, AgentResponse, TransportError};
use crate::observability::metrics;
use crate::prompt::{self, TemplateError, TicketFields};
use crate::routing::SharedRouteTable;
use payload::{has_issue, WebhookPayload};

/// Successful handling of a webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The prompt was accepted by the route's agent.
    Delivered {
        route: String,
        ticket: String,
        project: String,
    },
    /// Nothing to do; informational.
    Ignored { reason: String },
}

/// Why a webhook could not be handled.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0}")]
    InvalidPayload(String),

    #[error("Failed to send to Claude Code: {status}")]
    Delivery { route: String, status: u16, body: String },

    #[error("Failed to connect to AgentAPI: {source}")]
    Connection {
        route: String,
        #[source]
        source: TransportError,
    },

    #[error("No route available")]
    NoRoute,

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl DispatchError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::InvalidPayload(_) => "invalid_payload",
            DispatchError::Delivery { .. } => "delivery_error",
            DispatchError::Connection { .. } => "connection_error",
            DispatchError::NoRoute => "no_route",
            DispatchError::Template(_) => "template_error",
        }
    }
}

/// Result of a manual trigger: the agent's raw reply.
#[derive(Debug, Clone)]
pub struct TriggerResult {
    pub route: String,
    pub response: AgentResponse,
}

/// Turns webhooks into agent messages.
pub struct WebhookDispatcher {
    routes: Arc<SharedRouteTable>,
    agent: Arc<dyn AgentClient>,
    jira_base_url: String,
}

impl WebhookDispatcher {
    pub fn new(routes: Arc<SharedRouteTable>, agent: Arc<dyn AgentClient>, jira_base_url: impl Into<String>) -> Self {
        Self {
            routes,
            agent,
            jira_base_url: jira_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Handle one JIRA webhook body.
    pub async fn handle(&self, body: &[u8]) -> Result<Outcome, DispatchError> {
        let result = self.handle_inner(body).await;
        let outcome = match &result {
            Ok(Outcome::Delivered { .. }) => "success",
            Ok(Outcome::Ignored { .. }) => "ignored",
            Err(e) => e.kind(),
        };
        metrics::record_webhook(outcome);
        result
    }

    async fn handle_inner(&self, body: &[u8]) -> Result<Outcome, DispatchError> {
        let raw = parse_body(body)?;
        if !has_issue(&raw) {
            return Ok(Outcome::Ignored {
                reason: "No issue data in webhook".to_string(),
            });
        }

        let payload = WebhookPayload::new(raw);

        let project_key = payload.project_key();
        let ticket_key = payload.ticket_key();
        let event_name = payload.event_name();
        tracing::info!(
            event = %event_name,
            ticket = %ticket_key,
            project = %project_key,
            "Received webhook event"
        );

        let table = self.routes.snapshot();
        let route = match table.lookup(&project_key) {
            Some(route) => route,
            None => {
                tracing::warn!(project = %project_key, "No route found, ignoring webhook");
                return Ok(Outcome::Ignored {
                    reason: format!("No route configured for project: {}", project_key),
                });
            }
        };

        let kind = prompt::classify(&event_name);
        let fields = TicketFields {
            ticket_url: format!("{}/browse/{}", self.jira_base_url, ticket_key),
            ticket_key: ticket_key.clone(),
            project_key: project_key.clone(),
            summary: payload.summary(),
            description: payload.description(),
            priority: payload.priority(),
            status: payload.status(),
            assignee: payload.assignee(),
            changelog: if kind == prompt::EventKind::Updated {
                payload.changelog_entries()
            } else {
                Vec::new()
            },
        };
        let message = prompt::render(kind, &fields)?;

        let response = self.deliver(&route.name, &route.endpoint_url, &message).await?;
        if !response.is_success() {
            tracing::error!(
                route = %route.name,
                status = response.status,
                body = %response.body,
                "Agent rejected message"
            );
            return Err(DispatchError::Delivery {
                route: route.name.clone(),
                status: response.status,
                body: response.body,
            });
        }

        tracing::info!(route = %route.name, ticket = %ticket_key, template = %kind, "Webhook delivered");
        Ok(Outcome::Delivered {
            route: route.name.clone(),
            ticket: ticket_key,
            project: project_key,
        })
    }

    /// Send `prompt` verbatim to the route named `project`, or the catch-all.
    pub async fn trigger(&self, prompt: &str, project: Option<&str>) -> Result<TriggerResult, DispatchError> {
        if prompt.is_empty() {
            return Err(DispatchError::InvalidPayload("No prompt provided".to_string()));
        }

        let table = self.routes.snapshot();
        let route = table.route_by_name(project).ok_or(DispatchError::NoRoute)?;
        tracing::info!(route = %route.name, requested = ?project, "Manual trigger");

        let response = self.deliver(&route.name, &route.endpoint_url, prompt).await?;
        Ok(TriggerResult {
            route: route.name.clone(),
            response,
        })
    }

    async fn deliver(&self, route: &str, endpoint: &str, content: &str) -> Result<AgentResponse, DispatchError> {
        let start = Instant::now();
        match self.agent.send_message(endpoint, content).await {
            Ok(response) => {
                metrics::record_delivery(route, &response.status.to_string(), start);
                Ok(response)
            }
            Err(source) => {
                tracing::error!(route = %route, endpoint = %endpoint, error = %source, "Request to agent failed");
                metrics::record_delivery(route, "transport_error", start);
                Err(DispatchError::Connection {
                    route: route.to_string(),
                    source,
                })
            }
        }
    }
}

fn parse_body(body: &[u8]) -> Result<Value, DispatchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DispatchError::InvalidPayload("No JSON data provided".to_string()));
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| DispatchError::InvalidPayload(format!("Invalid JSON: {}", e)))?;
    match &value {
        Value::Object(map) if !map.is_empty() => Ok(value),
        _ => Err(DispatchError::InvalidPayload("No JSON data provided".to_string())),
    }
}
