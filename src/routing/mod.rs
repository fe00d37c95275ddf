//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! JIRA project key
//!     → shared.rs (snapshot of the active table)
//!     → router.rs (route lookup)
//!     → matcher.rs (exact → pattern → catch-all)
//!     → Return: matched Route or none
//!
//! Route Compilation (at startup and on reload):
//!     RoutingConfig
//!     → Compile project patterns
//!     → Freeze as immutable RouteTable
//!     → Swap into SharedRouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at load, immutable at runtime
//! - Deterministic: same key and table always yield the same route
//! - First match wins (ordered by tier, then by configuration order)

pub mod matcher;
pub mod router;
pub mod shared;

pub use matcher::{MatchTier, RouteMatch};
pub use router::{Route, RouteSource, RouteTable};
pub use shared::{ReloadSummary, SharedRouteTable};
