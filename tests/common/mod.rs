//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::net::TcpListener;

use jira_webhook_router::agent::{AgentClient, HttpAgentClient};
use jira_webhook_router::config::RouterConfig;
use jira_webhook_router::http::HttpServer;
use jira_webhook_router::lifecycle::Shutdown;
use jira_webhook_router::routing::{RouteSource, SharedRouteTable};

#[derive(Clone)]
struct MockState {
    message_status: StatusCode,
    status_status: StatusCode,
    messages: Arc<Mutex<Vec<Value>>>,
}

/// A fake AgentAPI instance recording every `/message` body.
pub struct MockAgent {
    pub addr: SocketAddr,
    messages: Arc<Mutex<Vec<Value>>>,
}

impl MockAgent {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn messages(&self) -> Vec<Value> {
        self.messages.lock().unwrap().clone()
    }
}

async fn message_handler(State(state): State<MockState>, Json(body): Json<Value>) -> (StatusCode, String) {
    state.messages.lock().unwrap().push(body);
    (state.message_status, r#"{"ok":true}"#.to_string())
}

async fn status_handler(State(state): State<MockState>) -> (StatusCode, String) {
    (state.status_status, r#"{"status":"stable"}"#.to_string())
}

/// Start a mock agent answering `/message` and `/status` with fixed codes.
pub async fn start_mock_agent(message_status: u16, status_status: u16) -> MockAgent {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        message_status: StatusCode::from_u16(message_status).unwrap(),
        status_status: StatusCode::from_u16(status_status).unwrap(),
        messages: messages.clone(),
    };
    let app = Router::new()
        .route("/message", post(message_handler))
        .route("/status", get(status_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockAgent { addr, messages }
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A running router instance backed by a temporary routing document.
pub struct TestRouter {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    routing_file: NamedTempFile,
    shutdown: Shutdown,
}

impl TestRouter {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Replace the routing document on disk; takes effect on reload.
    pub fn rewrite_routing(&self, toml: &str) {
        std::fs::write(self.routing_file.path(), toml).unwrap();
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(body).send().await.unwrap()
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }
}

impl Drop for TestRouter {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the router with `routing_toml` as its routing document.
pub async fn start_router(routing_toml: &str) -> TestRouter {
    start_router_with(routing_toml, |_| {}).await
}

/// Like [`start_router`], with a hook to adjust the service config.
pub async fn start_router_with<F>(routing_toml: &str, customize: F) -> TestRouter
where
    F: FnOnce(&mut RouterConfig),
{
    let routing_file = NamedTempFile::new().unwrap();
    std::fs::write(routing_file.path(), routing_toml).unwrap();

    let mut config = RouterConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.jira.base_url = "https://jira.example.com".into();
    customize(&mut config);

    let routes = Arc::new(SharedRouteTable::load(RouteSource::new(routing_file.path())));
    let agent: Arc<dyn AgentClient> = Arc::new(HttpAgentClient::new(Duration::from_secs(2), Duration::from_secs(2)));

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, routes, agent);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    TestRouter {
        addr,
        client,
        routing_file,
        shutdown,
    }
}

/// A minimal JIRA webhook body.
pub fn webhook(event: &str, ticket: &str, project: &str) -> Value {
    serde_json::json!({
        "webhookEvent": event,
        "issue": {
            "key": ticket,
            "fields": {
                "project": {"key": project},
                "summary": "Fix the login page",
                "description": "Users cannot log in",
                "priority": {"name": "High"},
                "status": {"name": "In Progress"},
                "assignee": {"displayName": "Jane Doe"}
            }
        },
        "changelog": {
            "items": [{"field": "status", "fromString": "Open", "toString": "In Progress"}]
        }
    })
}
