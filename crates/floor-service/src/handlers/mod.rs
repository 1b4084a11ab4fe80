//! HTTP handlers for the floor service.
//!
//! # Components
//!
//! - `health` - Liveness/readiness probes
//! - `waitlist` - Join, call, pass, and venue listing
//! - `seating` - Binding entries to seats
//! - `squads` - Squad submission
//! - `balance` - Table balance advice

pub mod balance;
pub mod health;
pub mod seating;
pub mod squads;
pub mod waitlist;
