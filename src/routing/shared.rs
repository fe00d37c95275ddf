//! Process-wide route table with atomic reload.
//!
//! # Design Decisions
//! - Readers take a snapshot (`Arc<RouteTable>`) without locking
//! - Reload builds the new table completely, then swaps it in one store
//! - Reloads are serialized; a failed reload leaves the current table serving

use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex};

use crate::config::loader::ConfigError;
use crate::routing::router::{RouteSource, RouteTable};

/// Counts reported after a successful reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadSummary {
    pub routes_loaded: usize,
    pub catch_all: bool,
}

/// Concurrency-safe holder of the active [`RouteTable`].
pub struct SharedRouteTable {
    source: RouteSource,
    current: ArcSwap<RouteTable>,
    reload_lock: Mutex<()>,
}

impl SharedRouteTable {
    pub fn new(source: RouteSource, table: RouteTable) -> Self {
        Self {
            source,
            current: ArcSwap::from_pointee(table),
            reload_lock: Mutex::new(()),
        }
    }

    /// Initial load at startup; falls back to environment defaults on error.
    pub fn load(source: RouteSource) -> Self {
        let table = RouteTable::load_or_fallback(&source);
        Self::new(source, table)
    }

    /// The table as of now. Later reloads do not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<RouteTable> {
        self.current.load_full()
    }

    pub fn source(&self) -> &RouteSource {
        &self.source
    }

    /// Rebuild the table from the source and swap it in.
    pub fn reload(&self) -> Result<ReloadSummary, ConfigError> {
        let _guard = self
            .reload_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        tracing::info!(path = %self.source.path.display(), "Reloading configuration");
        let table = RouteTable::load(&self.source).map_err(|e| {
            tracing::error!(error = %e, "Reload failed, keeping current configuration");
            e
        })?;

        let summary = ReloadSummary {
            routes_loaded: table.route_count(),
            catch_all: table.catch_all().is_some(),
        };
        self.current.store(Arc::new(table));
        tracing::info!(
            routes = summary.routes_loaded,
            catch_all = summary.catch_all,
            "Configuration reloaded"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ONE_ROUTE: &str = r#"
[[routes]]
name = "alpha"
namespace = "alpha-dev"
agentapi_url = "http://alpha:3284"
jira_projects = ["ALPHA"]
"#;

    const TWO_ROUTES: &str = r#"
[[routes]]
name = "alpha"
namespace = "alpha-dev"
agentapi_url = "http://alpha:3284"
jira_projects = ["ALPHA"]

[[routes]]
name = "beta"
namespace = "beta-dev"
agentapi_url = "http://beta:3284"
jira_projects = ["BETA"]

[catch_all]
name = "fallback"
namespace = "claude-dev"
agentapi_url = "http://fallback:3284"
"#;

    fn rewrite(file: &NamedTempFile, content: &str) {
        std::fs::write(file.path(), content).unwrap();
    }

    #[test]
    fn test_reload_swaps_whole_table() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(ONE_ROUTE.as_bytes()).unwrap();
        let shared = SharedRouteTable::load(RouteSource::new(file.path()));

        let before = shared.snapshot();
        assert!(before.lookup("BETA").is_none());

        rewrite(&file, TWO_ROUTES);
        let summary = shared.reload().unwrap();
        assert_eq!(summary, ReloadSummary { routes_loaded: 2, catch_all: true });

        assert_eq!(shared.snapshot().lookup("BETA").unwrap().name, "beta");
        // Snapshots taken before the reload are unaffected.
        assert!(before.lookup("BETA").is_none());
    }

    #[test]
    fn test_failed_reload_keeps_current_table() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TWO_ROUTES.as_bytes()).unwrap();
        let shared = SharedRouteTable::load(RouteSource::new(file.path()));

        rewrite(&file, "[[routes]]\nname = \"\"\nnamespace = \"x\"\nagentapi_url = \"http://x:1\"\n");
        assert!(matches!(shared.reload(), Err(ConfigError::Validation(_))));

        let table = shared.snapshot();
        assert_eq!(table.route_count(), 2);
        assert_eq!(table.lookup("ALPHA").unwrap().name, "alpha");
    }

    #[test]
    fn test_concurrent_lookups_during_reload() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TWO_ROUTES.as_bytes()).unwrap();
        let shared = Arc::new(SharedRouteTable::load(RouteSource::new(file.path())));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let table = shared.snapshot();
                        // Every snapshot is a complete table.
                        assert_eq!(table.lookup("ALPHA").unwrap().name, "alpha");
                        assert!(table.lookup("OTHER").is_some());
                    }
                })
            })
            .collect();

        for _ in 0..20 {
            shared.reload().unwrap();
        }
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
