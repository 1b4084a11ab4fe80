//! Floor Service Library
//!
//! Waitlist and seat allocation engine for live poker rooms: queue
//! positions, player calls with best-effort notifications, pass budgets,
//! exclusive seat binding, squad submission, and advisory table balancing.
//!
//! # Modules
//!
//! - `auth` - Token validation (staff and player roles)
//! - `config` - Service configuration
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - Authentication and metrics middleware
//! - `models` - Data models and lifecycle state machines
//! - `observability` - Prometheus metrics
//! - `routes` - Router and application state
//! - `services` - Table balancer and notification seam
//! - `store` - Storage seam and Postgres implementation

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
pub mod store;
