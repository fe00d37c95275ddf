//! Startup configuration resolution.
//!
//! # Responsibilities
//! - Load the service configuration file, if one was given
//! - Apply environment overrides on top
//! - Validate the merged result
//!
//! # Design Decisions
//! - Fail fast: an invalid service configuration is fatal
//! - Without a file, built-in defaults plus environment are used
//! - The routing document is not loaded here; it may be missing or broken
//!   at startup without stopping the process

use std::path::Path;

use crate::config::loader::{load_config, ConfigError};
use crate::config::validation::validate_config;
use crate::config::RouterConfig;

/// Build the effective configuration from the process environment.
pub fn resolve_config(path: Option<&Path>) -> Result<RouterConfig, ConfigError> {
    resolve_config_with(path, |key| std::env::var(key).ok())
}

pub fn resolve_config_with<F>(path: Option<&Path>, lookup: F) -> Result<RouterConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    config.apply_overrides(lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
