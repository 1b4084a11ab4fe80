//! Middleware for the floor service.
//!
//! # Components
//!
//! - `auth` - Bearer token authentication for protected routes
//! - `http_metrics` - HTTP request metrics middleware

pub mod auth;
pub mod http_metrics;

pub use auth::{require_auth, AuthState};
pub use http_metrics::http_metrics_middleware;
