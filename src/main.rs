//! JIRA webhook router.
//!
//! Receives JIRA issue webhooks, picks an AgentAPI instance from the
//! project key and delivers a rendered prompt to it.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌────────────────────────────────────────────────┐
//!                         │                WEBHOOK ROUTER                  │
//!                         │                                                │
//!     JIRA webhook        │  ┌─────────┐   ┌──────────┐   ┌─────────────┐  │
//!     ────────────────────┼─▶│  http   │──▶│ dispatch │──▶│   routing   │  │
//!                         │  │ server  │   │          │   │ exact/glob/ │  │
//!                         │  └─────────┘   └────┬─────┘   │  catch-all  │  │
//!                         │                     │         └─────────────┘  │
//!                         │                     ▼                          │
//!                         │               ┌──────────┐    ┌─────────────┐  │
//!                         │               │  prompt  │──▶ │    agent    │──┼──▶ AgentAPI
//!                         │               │ templates│    │   client    │  │    /message
//!                         │               └──────────┘    └─────────────┘  │
//!                         │                                                │
//!                         │  config · admin · health · observability ·     │
//!                         │  lifecycle                                     │
//!                         └────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use jira_webhook_router::agent::{AgentClient, HttpAgentClient};
use jira_webhook_router::http::HttpServer;
use jira_webhook_router::lifecycle::{signals, startup, Shutdown};
use jira_webhook_router::observability::{logging, metrics};
use jira_webhook_router::routing::{RouteSource, SharedRouteTable};

#[derive(Parser)]
#[command(name = "jira-webhook-router")]
#[command(about = "Routes JIRA webhooks to AgentAPI instances", long_about = None)]
struct Cli {
    /// Service configuration file (TOML). Defaults plus environment when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = startup::resolve_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "jira-webhook-router starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routing_config = %config.routing.config_path,
        jira_base_url = %config.jira.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        delivery_timeout_secs = config.timeouts.delivery_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let routes = Arc::new(SharedRouteTable::load(RouteSource::from(&config.routing)));
    let agent: Arc<dyn AgentClient> = Arc::new(HttpAgentClient::from_config(&config.timeouts));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let reloader = signals::spawn_reload_on_hangup(routes.clone(), shutdown.subscribe());
    let server = HttpServer::new(&config, routes, agent);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::shutdown_signal().await;
    shutdown.trigger();

    server_task.await??;
    let _ = reloader.await;

    tracing::info!("Shutdown complete");
    Ok(())
}
