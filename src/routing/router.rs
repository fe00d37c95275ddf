//! Route table construction and lookup.
//!
//! # Responsibilities
//! - Build routes from the routing document (or the environment fallback)
//! - Look up the destination for a JIRA project key
//! - Expose routes for listing and status probing
//!
//! # Design Decisions
//! - Immutable after construction; reload builds a fresh table
//! - Routes keyed by name in first-seen order; a later duplicate replaces
//!   the earlier definition in place
//! - The catch-all lives outside `routes` and is only consulted last

use indexmap::IndexMap;
use std::path::PathBuf;

use crate::config::loader::{load_routing, ConfigError};
use crate::config::schema::{RoutingConfig, RoutingSourceConfig};
use crate::config::validation::ValidationError;
use crate::routing::matcher::{self, MatchTier, PatternError, ProjectPattern, RouteMatch};

/// Name given to the catch-all built from environment defaults.
pub const DEFAULT_ROUTE_NAME: &str = "default";

/// A named AgentAPI destination.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: String,
    pub namespace: String,
    pub endpoint_url: String,
    pub project_patterns: Vec<String>,
    pub enabled: bool,
    matchers: Vec<ProjectPattern>,
}

impl Route {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        endpoint_url: impl Into<String>,
        project_patterns: Vec<String>,
        enabled: bool,
    ) -> Result<Self, PatternError> {
        let matchers = project_patterns
            .iter()
            .map(|p| ProjectPattern::compile(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.into(),
            namespace: namespace.into(),
            endpoint_url: endpoint_url.into(),
            project_patterns,
            enabled,
            matchers,
        })
    }

    /// Build a catch-all route; it carries the implicit `*` pattern.
    pub fn catch_all(
        name: impl Into<String>,
        namespace: impl Into<String>,
        endpoint_url: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            endpoint_url: endpoint_url.into(),
            project_patterns: vec!["*".to_string()],
            enabled,
            matchers: Vec::new(),
        }
    }

    pub(crate) fn matchers(&self) -> &[ProjectPattern] {
        &self.matchers
    }
}

/// Where a route table is loaded from.
#[derive(Debug, Clone)]
pub struct RouteSource {
    /// Routing document path.
    pub path: PathBuf,
    /// Endpoint of the fallback catch-all. `None` disables the fallback.
    pub default_url: Option<String>,
    /// Namespace of the fallback catch-all.
    pub default_namespace: String,
}

impl RouteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_url: None,
            default_namespace: "claude-dev".to_string(),
        }
    }

    pub fn with_default(mut self, url: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.default_url = Some(url.into());
        self.default_namespace = namespace.into();
        self
    }
}

impl From<&RoutingSourceConfig> for RouteSource {
    fn from(config: &RoutingSourceConfig) -> Self {
        Self {
            path: PathBuf::from(&config.config_path),
            default_url: config.default_agentapi_url.clone(),
            default_namespace: config.default_namespace.clone(),
        }
    }
}

/// Project routes plus the optional catch-all.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: IndexMap<String, Route>,
    catch_all: Option<Route>,
}

impl RouteTable {
    /// An empty table: every lookup yields none.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the table from `source`.
    ///
    /// A missing routing document falls back to the environment defaults.
    /// A document that exists but cannot be read, parsed or validated is an
    /// error.
    pub fn load(source: &RouteSource) -> Result<Self, ConfigError> {
        if !source.path.exists() {
            tracing::warn!(
                path = %source.path.display(),
                "Routing config not found, using environment defaults"
            );
            return Ok(Self::from_defaults(source));
        }

        let config = load_routing(&source.path)?;
        let table = Self::from_config(config)?;
        tracing::info!(
            path = %source.path.display(),
            routes = table.routes.len(),
            catch_all = table.catch_all.is_some(),
            "Routing config loaded"
        );
        Ok(table)
    }

    /// Like [`RouteTable::load`], but a broken document is logged and
    /// replaced by the environment defaults. Never fails.
    pub fn load_or_fallback(source: &RouteSource) -> Self {
        match Self::load(source) {
            Ok(table) => table,
            Err(e) => {
                tracing::error!(
                    path = %source.path.display(),
                    error = %e,
                    "Failed to load routing config, using environment defaults"
                );
                Self::from_defaults(source)
            }
        }
    }

    /// Build a table from a parsed routing document.
    pub fn from_config(config: RoutingConfig) -> Result<Self, ConfigError> {
        let mut routes: IndexMap<String, Route> = IndexMap::new();
        let mut errors = Vec::new();

        for (i, rc) in config.routes.into_iter().enumerate() {
            let route = match Route::new(rc.name, rc.namespace, rc.agentapi_url, rc.jira_projects, rc.enabled) {
                Ok(route) => route,
                Err(e) => {
                    errors.push(ValidationError::InvalidPattern {
                        field: format!("routes[{}].jira_projects", i),
                        value: e.pattern,
                        reason: e.source.to_string(),
                    });
                    continue;
                }
            };

            tracing::debug!(route = %route.name, patterns = ?route.project_patterns, "Loaded route");
            if let Some(previous) = routes.insert(route.name.clone(), route) {
                tracing::warn!(
                    route = %previous.name,
                    "Duplicate route name, later definition replaces earlier one"
                );
            }
        }

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        let catch_all = config
            .catch_all
            .map(|c| Route::catch_all(c.name, c.namespace, c.agentapi_url, c.enabled));

        Ok(Self { routes, catch_all })
    }

    /// Table holding only the catch-all from environment defaults, or nothing
    /// when no default endpoint is configured.
    pub fn from_defaults(source: &RouteSource) -> Self {
        let catch_all = source.default_url.as_ref().map(|url| {
            tracing::info!(url = %url, "Using default catch-all route from environment");
            Route::catch_all(DEFAULT_ROUTE_NAME, source.default_namespace.clone(), url.clone(), true)
        });
        if catch_all.is_none() {
            tracing::warn!("No default AgentAPI URL configured, route table is empty");
        }
        Self {
            routes: IndexMap::new(),
            catch_all,
        }
    }

    /// Find the destination for a project key.
    pub fn lookup(&self, project_key: &str) -> Option<&Route> {
        self.resolve(project_key).map(|m| m.route)
    }

    /// Find the destination for a project key, reporting the matching tier.
    pub fn resolve(&self, project_key: &str) -> Option<RouteMatch<'_>> {
        let found = matcher::resolve(self.routes.values(), self.catch_all.as_ref(), project_key);

        match &found {
            Some(RouteMatch { route, tier: MatchTier::Exact }) => {
                tracing::info!(project = %project_key, route = %route.name, "Found exact match for project");
            }
            Some(RouteMatch { route, tier: MatchTier::Pattern(pattern) }) => {
                tracing::info!(project = %project_key, route = %route.name, pattern = %pattern, "Found pattern match for project");
            }
            Some(RouteMatch { route, tier: MatchTier::CatchAll }) => {
                tracing::info!(project = %project_key, route = %route.name, "Using catch-all route for project");
            }
            None => {
                tracing::warn!(project = %project_key, "No route found for project");
            }
        }

        found
    }

    /// Route selected by name for manual triggers: the enabled route with
    /// that name, otherwise the enabled catch-all.
    pub fn route_by_name(&self, name: Option<&str>) -> Option<&Route> {
        name.filter(|n| !n.is_empty())
            .and_then(|n| self.routes.get(n))
            .filter(|r| r.enabled)
            .or_else(|| self.catch_all.as_ref().filter(|r| r.enabled))
    }

    /// All project routes, in table order (disabled ones included).
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn route(&self, name: &str) -> Option<&Route> {
        self.routes.get(name)
    }

    pub fn catch_all(&self) -> Option<&Route> {
        self.catch_all.as_ref()
    }

    /// Number of project routes (the catch-all is not counted).
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// True when nothing can be routed: no project routes and no catch-all.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.catch_all.is_none()
    }
}
