//! Operator endpoints: liveness, route listing, reload and agent status.

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};

use self::handlers::*;
use crate::http::server::AppState;

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/routes", get(list_routes))
        .route("/config/reload", post(reload_config))
        .route("/claude-status", get(claude_status))
}
