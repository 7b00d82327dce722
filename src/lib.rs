//! EventBuddy community events service
//!
//! A community-events management core: leaders publish events for their
//! community groups, attendees register and receive opaque QR ticket
//! tokens, and door staff check tickets in exactly once. This library
//! provides the registration, check-in, statistics and event lifecycle
//! services over a PostgreSQL-backed repository layer.

#![allow(non_snake_case)]

pub mod config;
pub mod services;
pub mod models;
pub mod database;
pub mod ticket;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{EventBuddyError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use ticket::{TicketClaims, TicketRenderer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
