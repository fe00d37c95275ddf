//! Configuration schema definitions.
//!
//! Two documents are described here:
//! - [`RouterConfig`]: the service configuration (listener, timeouts, JIRA, ...)
//! - [`RoutingConfig`]: the routing document listing AgentAPI destinations
//!
//! All types derive Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};

/// Root configuration for the webhook router service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where routes come from and the environment fallback.
    pub routing: RoutingSourceConfig,

    /// JIRA instance settings used to build ticket links.
    pub jira: JiraConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request limits.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Location of the routing document and the defaults used when it is absent.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingSourceConfig {
    /// Path to the routing document (TOML).
    pub config_path: String,

    /// AgentAPI URL for the fallback catch-all route.
    /// When unset, a missing routing document yields an empty table.
    pub default_agentapi_url: Option<String>,

    /// Namespace label of the fallback catch-all route.
    pub default_namespace: String,
}

impl Default for RoutingSourceConfig {
    fn default() -> Self {
        Self {
            config_path: "/config/routing.toml".to_string(),
            default_agentapi_url: None,
            default_namespace: "claude-dev".to_string(),
        }
    }
}

/// JIRA settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JiraConfig {
    /// Base URL of the JIRA instance; tickets link to `{base_url}/browse/{key}`.
    pub base_url: String,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: "https://your-jira.atlassian.net".to_string(),
        }
    }
}

/// Timeout configuration for inbound and outbound calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for handling one inbound request, in seconds.
    pub request_secs: u64,

    /// Timeout for `POST {agentapi_url}/message`, in seconds.
    pub delivery_secs: u64,

    /// Timeout for `GET {agentapi_url}/status`, in seconds.
    pub status_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 60,
            delivery_secs: 30,
            status_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// The routing document: project routes plus an optional catch-all.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Project routes, in file order.
    pub routes: Vec<RouteConfig>,

    /// Fallback destination used when no project route matches.
    pub catch_all: Option<CatchAllConfig>,
}

/// A single project route.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteConfig {
    /// Route identifier, unique within the document.
    pub name: String,

    /// Deployment label passed through to status reports.
    pub namespace: String,

    /// Base URL of the AgentAPI instance.
    pub agentapi_url: String,

    /// Project keys or glob patterns (`*`, `?`) this route accepts.
    #[serde(default)]
    pub jira_projects: Vec<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// The catch-all destination. Same shape as a route minus the pattern list.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CatchAllConfig {
    pub name: String,
    pub namespace: String,
    pub agentapi_url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}
