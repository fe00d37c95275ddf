//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind server to listener and stop on the shutdown broadcast
//!
//! # Design Decisions
//! - The body size cap is enforced by the body extractors, so an oversized
//!   request gets the same JSON error body as any other rejected request
//! - Agent delivery timeouts are shorter than the request timeout, so a slow
//!   agent is reported as a delivery failure rather than a bare 408

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::post,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin;
use crate::agent::AgentClient;
use crate::config::RouterConfig;
use crate::dispatch::WebhookDispatcher;
use crate::health::StatusProber;
use crate::http::handlers::{jira_webhook, trigger_claude};
use crate::http::request::{propagate_request_id, set_request_id, RequestIdExt};
use crate::routing::SharedRouteTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<SharedRouteTable>,
    pub dispatcher: Arc<WebhookDispatcher>,
    pub prober: Arc<StatusProber>,
}

impl AppState {
    pub fn new(config: &RouterConfig, routes: Arc<SharedRouteTable>, agent: Arc<dyn AgentClient>) -> Self {
        let dispatcher = WebhookDispatcher::new(routes.clone(), agent.clone(), config.jira.base_url.clone());
        Self {
            routes,
            dispatcher: Arc::new(dispatcher),
            prober: Arc::new(StatusProber::new(agent)),
        }
    }
}

/// HTTP server for the webhook router.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &RouterConfig, routes: Arc<SharedRouteTable>, agent: Arc<dyn AgentClient>) -> Self {
        let state = AppState::new(config, routes, agent);
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(set_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request.headers().request_id(),
                )
            }))
            .layer(propagate_request_id())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(DefaultBodyLimit::max(config.security.max_body_size));

        Router::new()
            .route("/jira-webhook", post(jira_webhook))
            .route("/trigger-claude", post(trigger_claude))
            .merge(admin::admin_router())
            .with_state(state)
            .layer(middleware)
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown signal is broadcast.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::HttpAgentClient;
    use crate::routing::{RouteSource, RouteTable};

    #[test]
    fn test_state_shares_route_table() {
        let config = RouterConfig::default();
        let routes = Arc::new(SharedRouteTable::new(
            RouteSource::new("/nonexistent/routing.toml"),
            RouteTable::empty(),
        ));
        let agent: Arc<dyn AgentClient> = Arc::new(HttpAgentClient::from_config(&config.timeouts));

        let state = AppState::new(&config, routes.clone(), agent);
        assert!(Arc::ptr_eq(&state.routes, &routes));
    }
}
