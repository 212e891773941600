//! Outbound notification boundaries.
//!
//! # Responsibility
//! - Change events for observers of record writes.
//! - Best-effort notification e-mails.
//!
//! # Invariants
//! - Neither boundary can fail the write that triggered it.

pub mod email;
pub mod events;
