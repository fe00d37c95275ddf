//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Validate AgentAPI URLs and project patterns
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: config → Result<(), Vec<ValidationError>>
//! - Duplicate route names are not an error (last definition wins)

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::{RouterConfig, RoutingConfig};

/// A single semantic problem, identified by the path of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: must not be empty")]
    Empty { field: String },

    #[error("{field}: invalid URL '{value}': {reason}")]
    InvalidUrl {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: String, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: String },

    #[error("{field}: must be less than {other}")]
    NotLessThan { field: String, other: String },

    #[error("{field}: invalid pattern '{value}': {reason}")]
    InvalidPattern {
        field: String,
        value: String,
        reason: String,
    },
}

impl ValidationError {
    /// Path of the field this error refers to (e.g. `routes[2].agentapi_url`).
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Empty { field }
            | ValidationError::InvalidUrl { field, .. }
            | ValidationError::InvalidAddress { field, .. }
            | ValidationError::Zero { field }
            | ValidationError::NotLessThan { field, .. }
            | ValidationError::InvalidPattern { field, .. } => field,
        }
    }
}

/// Validate the routing document.
pub fn validate_routing(config: &RoutingConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (i, route) in config.routes.iter().enumerate() {
        let prefix = format!("routes[{}]", i);
        check_non_empty(&mut errors, &format!("{}.name", prefix), &route.name);
        check_non_empty(&mut errors, &format!("{}.namespace", prefix), &route.namespace);
        check_agent_url(&mut errors, &format!("{}.agentapi_url", prefix), &route.agentapi_url);

        for (j, pattern) in route.jira_projects.iter().enumerate() {
            check_non_empty(&mut errors, &format!("{}.jira_projects[{}]", prefix, j), pattern);
        }
    }

    if let Some(catch_all) = &config.catch_all {
        check_non_empty(&mut errors, "catch_all.name", &catch_all.name);
        check_non_empty(&mut errors, "catch_all.namespace", &catch_all.namespace);
        check_agent_url(&mut errors, "catch_all.agentapi_url", &catch_all.agentapi_url);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the service configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address".into(),
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address".into(),
            value: config.observability.metrics_address.clone(),
        });
    }

    check_non_empty(&mut errors, "routing.config_path", &config.routing.config_path);
    if let Some(url) = &config.routing.default_agentapi_url {
        check_agent_url(&mut errors, "routing.default_agentapi_url", url);
    }
    check_agent_url(&mut errors, "jira.base_url", &config.jira.base_url);

    for (field, value) in [
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.delivery_secs", config.timeouts.delivery_secs),
        ("timeouts.status_secs", config.timeouts.status_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero { field: field.into() });
        }
    }
    // Outbound calls must give up before the whole request is cut off.
    let request_secs = config.timeouts.request_secs;
    for (field, value) in [
        ("timeouts.delivery_secs", config.timeouts.delivery_secs),
        ("timeouts.status_secs", config.timeouts.status_secs),
    ] {
        if value > 0 && request_secs > 0 && value >= request_secs {
            errors.push(ValidationError::NotLessThan {
                field: field.into(),
                other: "timeouts.request_secs".into(),
            });
        }
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero {
            field: "security.max_body_size".into(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_non_empty(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Empty { field: field.into() });
    }
}

fn check_agent_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Empty { field: field.into() });
        return;
    }
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidUrl {
            field: field.into(),
            value: value.into(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field: field.into(),
            value: value.into(),
            reason: e.to_string(),
        }),
    }
}
