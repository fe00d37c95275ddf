//! Agent health subsystem.
//!
//! # Data Flow
//! ```text
//! GET /claude-status
//!     → snapshot of the route table
//!     → active.rs (probe every route concurrently)
//!     → route name → RouteStatus
//! ```
//!
//! # Design Decisions
//! - Probing is on demand only; no background checker
//! - Health of the router itself (`/health`) never contacts agents

pub mod active;

pub use active::{RouteStatus, StatusProber, CATCH_ALL_KEY};
