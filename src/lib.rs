//! JIRA webhook router library.

// Core subsystems
pub mod config;
pub mod dispatch;
pub mod http;
pub mod prompt;
pub mod routing;

// Outbound
pub mod agent;

// Operator surface
pub mod admin;
pub mod health;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
