//! Observability for the floor service.
//!
//! # Components
//!
//! - `metrics` - Prometheus metrics definitions and recording helpers

pub mod metrics;
