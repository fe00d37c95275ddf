//! Environment variable overrides.
//!
//! Applied after the configuration file so deployments can tweak a shared
//! file per environment. Recognised variables:
//!
//! | Variable               | Field                              |
//! |------------------------|------------------------------------|
//! | `PORT`                 | port of `listener.bind_address`    |
//! | `ROUTING_CONFIG_PATH`  | `routing.config_path`              |
//! | `DEFAULT_AGENTAPI_URL` | `routing.default_agentapi_url`     |
//! | `DEFAULT_NAMESPACE`    | `routing.default_namespace`        |
//! | `JIRA_BASE_URL`        | `jira.base_url`                    |
//! | `LOG_LEVEL`            | `observability.log_level`          |

use crate::config::schema::RouterConfig;

impl RouterConfig {
    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT") {
            let host = self
                .listener
                .bind_address
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "0.0.0.0".to_string());
            self.listener.bind_address = format!("{}:{}", host, port.trim());
        }
        if let Some(path) = get("ROUTING_CONFIG_PATH") {
            self.routing.config_path = path;
        }
        if let Some(url) = get("DEFAULT_AGENTAPI_URL") {
            self.routing.default_agentapi_url = Some(url);
        }
        if let Some(namespace) = get("DEFAULT_NAMESPACE") {
            self.routing.default_namespace = namespace;
        }
        if let Some(url) = get("JIRA_BASE_URL") {
            self.jira.base_url = url;
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.observability.log_level = level;
        }
    }
}
