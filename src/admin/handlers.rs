use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::health::RouteStatus;
use crate::http::server::AppState;
use crate::routing::{Route, RouteTable};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub routes_loaded: usize,
    pub catch_all_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct RouteInfo {
    pub name: String,
    pub namespace: String,
    pub agentapi_url: String,
    pub jira_projects: Vec<String>,
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct CatchAllInfo {
    pub name: String,
    pub namespace: String,
    pub agentapi_url: String,
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct RouteListing {
    pub routes: Vec<RouteInfo>,
    pub catch_all: Option<CatchAllInfo>,
}

impl From<&Route> for RouteInfo {
    fn from(route: &Route) -> Self {
        Self {
            name: route.name.clone(),
            namespace: route.namespace.clone(),
            agentapi_url: route.endpoint_url.clone(),
            jira_projects: route.project_patterns.clone(),
            enabled: route.enabled,
        }
    }
}

impl From<&Route> for CatchAllInfo {
    fn from(route: &Route) -> Self {
        Self {
            name: route.name.clone(),
            namespace: route.namespace.clone(),
            agentapi_url: route.endpoint_url.clone(),
            enabled: route.enabled,
        }
    }
}

impl From<&RouteTable> for RouteListing {
    fn from(table: &RouteTable) -> Self {
        Self {
            routes: table.routes().map(RouteInfo::from).collect(),
            catch_all: table.catch_all().map(CatchAllInfo::from),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReloadReply {
    Success { message: &'static str, routes_loaded: usize },
    Error { message: String },
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let table = state.routes.snapshot();
    Json(HealthReport {
        status: "healthy",
        routes_loaded: table.route_count(),
        catch_all_enabled: table.catch_all().is_some(),
    })
}

/// `GET /routes`
pub async fn list_routes(State(state): State<AppState>) -> Json<RouteListing> {
    let table = state.routes.snapshot();
    Json(RouteListing::from(table.as_ref()))
}

/// `POST /config/reload`
pub async fn reload_config(State(state): State<AppState>) -> impl IntoResponse {
    // Reading and parsing the file is blocking work.
    let routes = state.routes.clone();
    let result = tokio::task::spawn_blocking(move || routes.reload()).await;

    match result {
        Ok(Ok(summary)) => (
            StatusCode::OK,
            Json(ReloadReply::Success {
                message: "Configuration reloaded",
                routes_loaded: summary.routes_loaded,
            }),
        ),
        Ok(Err(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ReloadReply::Error { message: e.to_string() }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Reload task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ReloadReply::Error { message: e.to_string() }),
            )
        }
    }
}

/// `GET /claude-status`
pub async fn claude_status(State(state): State<AppState>) -> Json<BTreeMap<String, RouteStatus>> {
    let table = state.routes.snapshot();
    Json(state.prober.probe_all(&table).await)
}
