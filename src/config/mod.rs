//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! service config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → env.rs (environment overrides)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!
//! routing document (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RoutingConfig → routing::RouteTable
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; route changes require a full reload
//! - All service fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::RouterConfig;
pub use schema::ListenerConfig;
pub use schema::{CatchAllConfig, RouteConfig, RoutingConfig};
pub use schema::{JiraConfig, ObservabilityConfig, RoutingSourceConfig, SecurityConfig, TimeoutConfig};
