//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls, engines and notification boundaries into
//!   use-case level APIs.
//! - Keep the CLI decoupled from storage details.

pub mod application_service;
pub mod reminder_service;
