//! Active status probing of AgentAPI instances.
//!
//! # Responsibilities
//! - Probe `GET {endpoint}/status` for every enabled route and the catch-all
//! - Report each route independently; one failure never hides another
//!
//! # Design Decisions
//! - Probes run concurrently and are bounded by the client's status timeout
//! - Disabled routes are reported without being contacted
//! - A disabled catch-all is left out of the report entirely

use futures_util::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::agent::AgentClient;
use crate::observability::metrics;
use crate::routing::{Route, RouteTable};

/// Report key used for the catch-all route.
pub const CATCH_ALL_KEY: &str = "catch_all";

/// Reachability of one route's agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RouteStatus {
    Disabled,
    /// The agent answered with a 2xx status.
    Online { response_code: u16, namespace: String },
    /// The agent answered with any other status.
    Error { response_code: u16, namespace: String },
    /// No HTTP response at all.
    Offline { error: String, namespace: String },
}

impl RouteStatus {
    fn label(&self) -> &'static str {
        match self {
            RouteStatus::Disabled => "disabled",
            RouteStatus::Online { .. } => "online",
            RouteStatus::Error { .. } => "error",
            RouteStatus::Offline { .. } => "offline",
        }
    }
}

/// Probes agents on demand.
pub struct StatusProber {
    agent: Arc<dyn AgentClient>,
}

impl StatusProber {
    pub fn new(agent: Arc<dyn AgentClient>) -> Self {
        Self { agent }
    }

    /// Probe every route in `table`, keyed by route name.
    pub async fn probe_all(&self, table: &RouteTable) -> BTreeMap<String, RouteStatus> {
        let targets: Vec<(String, &Route)> = table
            .routes()
            .map(|route| (route.name.clone(), route))
            .chain(
                table
                    .catch_all()
                    .filter(|route| route.enabled)
                    .map(|route| (CATCH_ALL_KEY.to_string(), route)),
            )
            .collect();

        let probes = targets.into_iter().map(|(key, route)| async move {
            let status = self.probe(route).await;
            metrics::record_probe(&route.name, status.label());
            (key, status)
        });

        join_all(probes).await.into_iter().collect()
    }

    /// Probe a single route.
    pub async fn probe(&self, route: &Route) -> RouteStatus {
        if !route.enabled {
            return RouteStatus::Disabled;
        }

        let namespace = route.namespace.clone();
        match self.agent.status(&route.endpoint_url).await {
            Ok(response) if response.is_success() => RouteStatus::Online {
                response_code: response.status,
                namespace,
            },
            Ok(response) => {
                tracing::warn!(route = %route.name, status = response.status, "Agent status check returned error");
                RouteStatus::Error {
                    response_code: response.status,
                    namespace,
                }
            }
            Err(e) => {
                tracing::warn!(route = %route.name, error = %e, "Agent unreachable");
                RouteStatus::Offline {
                    error: e.to_string(),
                    namespace,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentResponse, TransportError};
    use crate::config::{CatchAllConfig, RouteConfig, RoutingConfig};
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;

    /// Answers by endpoint: "down" fails, "broken" returns 503, else 200.
    struct FakeAgent;

    #[async_trait]
    impl AgentClient for FakeAgent {
        async fn send_message(&self, _endpoint: &str, _content: &str) -> Result<AgentResponse, TransportError> {
            unreachable!("status probes never send messages")
        }

        async fn status(&self, endpoint: &str) -> Result<AgentResponse, TransportError> {
            if endpoint.contains("down") {
                Err(TransportError::Timeout {
                    url: format!("{}/status", endpoint),
                    timeout: Duration::from_secs(10),
                })
            } else if endpoint.contains("broken") {
                Ok(AgentResponse {
                    status: 503,
                    body: String::new(),
                })
            } else {
                Ok(AgentResponse {
                    status: 200,
                    body: "{}".into(),
                })
            }
        }
    }

    fn route(name: &str, url: &str, enabled: bool) -> RouteConfig {
        RouteConfig {
            name: name.into(),
            namespace: format!("{}-ns", name),
            agentapi_url: url.into(),
            jira_projects: vec![name.to_uppercase()],
            enabled,
        }
    }

    fn catch_all(enabled: bool) -> Option<CatchAllConfig> {
        Some(CatchAllConfig {
            name: "default".into(),
            namespace: "claude-dev".into(),
            agentapi_url: "http://default:3284".into(),
            enabled,
        })
    }

    fn table(routes: Vec<RouteConfig>, catch_all: Option<CatchAllConfig>) -> RouteTable {
        RouteTable::from_config(RoutingConfig { routes, catch_all }).unwrap()
    }

    #[tokio::test]
    async fn test_each_route_reported_independently() {
        let table = table(
            vec![
                route("alpha", "http://alpha:3284", true),
                route("beta", "http://down:3284", true),
                route("gamma", "http://broken:3284", true),
                route("delta", "http://down:3284", false),
            ],
            catch_all(true),
        );

        let report = StatusProber::new(Arc::new(FakeAgent)).probe_all(&table).await;
        let report = serde_json::to_value(&report).unwrap();

        assert_eq!(
            report["alpha"],
            json!({"status": "online", "response_code": 200, "namespace": "alpha-ns"})
        );
        assert_eq!(report["beta"]["status"], "offline");
        assert_eq!(report["beta"]["namespace"], "beta-ns");
        assert!(report["beta"]["error"].as_str().unwrap().contains("timed out"));
        assert_eq!(
            report["gamma"],
            json!({"status": "error", "response_code": 503, "namespace": "gamma-ns"})
        );
        assert_eq!(report["delta"], json!({"status": "disabled"}));
        assert_eq!(report[CATCH_ALL_KEY]["status"], "online");
    }

    #[tokio::test]
    async fn test_disabled_catch_all_is_omitted() {
        let table = table(Vec::new(), catch_all(false));
        let report = StatusProber::new(Arc::new(FakeAgent)).probe_all(&table).await;
        assert!(report.is_empty());
    }
}
