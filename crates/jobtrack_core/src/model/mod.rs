//! Domain model for the application tracker.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep validation rules next to the types they protect.
//!
//! # Invariants
//! - Every application is identified by a stable `ApplicationId`.
//! - Derived data (stats, reminders) is never stored on the model.

pub mod application;
pub mod caller;
pub mod notification;
