//! # Floor Test Utilities
//!
//! Shared test utilities for the floor service.
//!
//! This crate provides:
//! - An in-memory [`floor_service::store::FloorStore`] with the same
//!   conditional-transition semantics as the Postgres store
//! - Token signing helpers for staff and player credentials
//! - A router harness for `tower::ServiceExt::oneshot` tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use floor_test_utils::*;
//! use tower::ServiceExt;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let app = TestApp::new();
//!     let venue_id = app.store.seed_venue("Test Room", true, true, None);
//!     let token = app.staff_token(None);
//!
//!     let response = app
//!         .router()
//!         .oneshot(json_request("GET", &format!("/api/v1/venues/{venue_id}/waitlist"), Some(&token), None))
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(response.status(), 200);
//! }
//! ```

pub mod harness;
pub mod memory_store;
pub mod tokens;

// Re-export commonly used items
pub use harness::*;
pub use memory_store::InMemoryFloorStore;
pub use tokens::*;
