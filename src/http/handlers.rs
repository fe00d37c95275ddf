//! Webhook and manual trigger handlers.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::http::request::RequestIdExt;
use crate::http::response::{trigger_response, webhook_response, ErrorReply, WebhookReply};
use crate::http::server::AppState;

/// `POST /jira-webhook`
pub async fn jira_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = headers.request_id();
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(request_id = %request_id, error = %rejection, "Webhook body rejected");
            let reply = WebhookReply::Error {
                message: rejection.body_text(),
            };
            return (rejection.status(), Json(reply)).into_response();
        }
    };
    tracing::debug!(request_id = %request_id, bytes = body.len(), "Webhook received");

    let result = state.dispatcher.handle(&body).await;
    if let Err(e) = &result {
        tracing::warn!(request_id = %request_id, error = %e, kind = e.kind(), "Webhook failed");
    }
    webhook_response(result)
}

#[derive(Debug, Default, Deserialize)]
struct TriggerRequest {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    project: Option<String>,
}

/// `POST /trigger-claude`
pub async fn trigger_claude(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = headers.request_id();
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(request_id = %request_id, error = %rejection, "Trigger body rejected");
            return (rejection.status(), Json(ErrorReply::new(rejection.body_text()))).into_response();
        }
    };
    let request: TriggerRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Malformed trigger request");
            return (StatusCode::BAD_REQUEST, Json(ErrorReply::new(format!("Invalid JSON: {}", e))))
                .into_response();
        }
    };

    let prompt = request.prompt.unwrap_or_default();
    let result = state
        .dispatcher
        .trigger(&prompt, request.project.as_deref())
        .await;
    trigger_response(result)
}
