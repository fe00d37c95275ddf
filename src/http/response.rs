//! Response bodies and status mapping.
//!
//! # Responsibilities
//! - Map dispatch outcomes and errors to HTTP status codes
//! - Shape the JSON bodies returned to JIRA and to operators
//!
//! # Design Decisions
//! - Malformed input is 400; anything that went wrong downstream is 500
//! - An ignored webhook is 200 so JIRA does not retry it
//! - The agent's reply to a manual trigger is passed through as text

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::dispatch::{DispatchError, Outcome, TriggerResult};

/// Body of every `/jira-webhook` response.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WebhookReply {
    Success {
        message: String,
        ticket: String,
        project: String,
        route: String,
    },
    Ignored {
        message: String,
    },
    Error {
        message: String,
    },
}

impl From<Outcome> for WebhookReply {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Delivered { route, ticket, project } => WebhookReply::Success {
                message: format!("Routed to project: {}", route),
                ticket,
                project,
                route,
            },
            Outcome::Ignored { reason } => WebhookReply::Ignored { message: reason },
        }
    }
}

/// Successful `/trigger-claude` body.
#[derive(Debug, Serialize)]
pub struct TriggerReply {
    pub status: &'static str,
    pub route: String,
    pub claude_response: String,
}

impl From<TriggerResult> for TriggerReply {
    fn from(result: TriggerResult) -> Self {
        Self {
            status: if result.response.is_success() { "success" } else { "error" },
            route: result.route,
            claude_response: result.response.body,
        }
    }
}

/// `{"error": ...}` body used by `/trigger-claude` failures.
#[derive(Debug, Serialize)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

fn client_error(e: &DispatchError) -> bool {
    matches!(e, DispatchError::InvalidPayload(_) | DispatchError::NoRoute)
}

pub fn webhook_response(result: Result<Outcome, DispatchError>) -> Response {
    match result {
        Ok(outcome) => (StatusCode::OK, Json(WebhookReply::from(outcome))).into_response(),
        Err(e) => {
            let status = if client_error(&e) {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(WebhookReply::Error { message: e.to_string() })).into_response()
        }
    }
}

pub fn trigger_response(result: Result<TriggerResult, DispatchError>) -> Response {
    match result {
        Ok(result) => (StatusCode::OK, Json(TriggerReply::from(result))).into_response(),
        Err(e) => {
            let status = if client_error(&e) {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(ErrorReply::new(e.to_string()))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentResponse, TransportError};
    use serde_json::json;

    #[test]
    fn test_webhook_reply_shapes() {
        let delivered = serde_json::to_value(WebhookReply::from(Outcome::Delivered {
            route: "alpha".into(),
            ticket: "ALPHA-1".into(),
            project: "ALPHA".into(),
        }))
        .unwrap();
        assert_eq!(
            delivered,
            json!({
                "status": "success",
                "message": "Routed to project: alpha",
                "ticket": "ALPHA-1",
                "project": "ALPHA",
                "route": "alpha",
            })
        );

        let ignored = serde_json::to_value(WebhookReply::from(Outcome::Ignored {
            reason: "No issue data in webhook".into(),
        }))
        .unwrap();
        assert_eq!(ignored, json!({"status": "ignored", "message": "No issue data in webhook"}));
    }

    #[test]
    fn test_webhook_status_codes() {
        let invalid = webhook_response(Err(DispatchError::InvalidPayload("No JSON data provided".into())));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let rejected = webhook_response(Err(DispatchError::Delivery {
            route: "alpha".into(),
            status: 503,
            body: String::new(),
        }));
        assert_eq!(rejected.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let ignored = webhook_response(Ok(Outcome::Ignored { reason: "x".into() }));
        assert_eq!(ignored.status(), StatusCode::OK);
    }

    #[test]
    fn test_trigger_status_codes() {
        let ok = TriggerReply::from(TriggerResult {
            route: "alpha".into(),
            response: AgentResponse {
                status: 500,
                body: "boom".into(),
            },
        });
        assert_eq!(ok.status, "error");
        assert_eq!(ok.claude_response, "boom");

        assert_eq!(
            trigger_response(Err(DispatchError::NoRoute)).status(),
            StatusCode::BAD_REQUEST
        );
        let unreachable = trigger_response(Err(DispatchError::Connection {
            route: "alpha".into(),
            source: TransportError::Connection {
                url: "http://alpha/message".into(),
                detail: "refused".into(),
            },
        }));
        assert_eq!(unreachable.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
