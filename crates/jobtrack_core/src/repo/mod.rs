//! Repository layer: record store contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the boundary traits the services depend on.
//! - Keep SQL details out of services and engines.
//!
//! # Invariants
//! - Write paths validate required fields before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod application_repo;
pub mod completion_repo;
pub mod notification_repo;
