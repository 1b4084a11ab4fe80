//! Domain services for the floor service.
//!
//! # Components
//!
//! - `balancer` - Advisory table rebalancing over a snapshot of running games
//! - `notifier` - Notification transport seam (SMS, push, in-app)

pub mod balancer;
pub mod notifier;

pub use balancer::{suggest_rebalance, MoveSuggestion, RebalancePlan, TableLoad};
pub use notifier::{DispatchError, LogNotifier, Notifier};
