//! Outbound calls to AgentAPI instances.
//!
//! # Responsibilities
//! - Deliver a message: `POST {endpoint}/message` with `{content, type: "user"}`
//! - Probe reachability: `GET {endpoint}/status`
//!
//! # Design Decisions
//! - Every call has a deadline; delivery and probing use separate timeouts
//! - Transport failures (timeout, refused, DNS) are distinct from HTTP
//!   error statuses, which are returned as ordinary responses
//! - No retries; the caller reports failures synchronously

pub mod client;

pub use client::{AgentClient, AgentResponse, HttpAgentClient, TransportError};
