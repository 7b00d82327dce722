//! Error handling for EventBuddy
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for EventBuddy application
#[derive(Error, Debug)]
pub enum EventBuddyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Mail API error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Person not found: {person_id}")]
    PersonNotFound { person_id: i64 },

    #[error("Group not found: {group_id}")]
    GroupNotFound { group_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Event {event_id} is not open for registration")]
    EventNotPublished { event_id: i64 },

    #[error("Event {event_id} has already taken place")]
    EventInPast { event_id: i64 },

    #[error("Event {event_id} is full (capacity {capacity})")]
    CapacityExceeded { event_id: i64, capacity: i32 },

    #[error("Person {person_id} is already registered for event {event_id}")]
    AlreadyRegistered { event_id: i64, person_id: i64 },

    #[error("Ticket token is malformed")]
    MalformedToken,

    #[error("Ticket was issued for event {token_event_id}, not event {event_id}")]
    TokenEventMismatch { event_id: i64, token_event_id: i64 },

    #[error("No ticket matches the presented token")]
    TicketNotFound,

    #[error("Confirmation delivery failed: {0}")]
    NotificationFailed(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for EventBuddy operations
pub type Result<T> = std::result::Result<T, EventBuddyError>;

impl EventBuddyError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            EventBuddyError::Database(_) => false,
            EventBuddyError::Migration(_) => false,
            EventBuddyError::Http(_) => true,
            EventBuddyError::Config(_) => false,
            EventBuddyError::PermissionDenied(_) => false,
            EventBuddyError::PersonNotFound { .. } => false,
            EventBuddyError::GroupNotFound { .. } => false,
            EventBuddyError::EventNotFound { .. } => false,
            EventBuddyError::EventNotPublished { .. } => false,
            EventBuddyError::EventInPast { .. } => false,
            EventBuddyError::CapacityExceeded { .. } => true,
            EventBuddyError::AlreadyRegistered { .. } => false,
            EventBuddyError::MalformedToken => false,
            EventBuddyError::TokenEventMismatch { .. } => false,
            EventBuddyError::TicketNotFound => false,
            EventBuddyError::NotificationFailed(_) => true,
            EventBuddyError::InvalidStateTransition { .. } => false,
            EventBuddyError::Serialization(_) => false,
            EventBuddyError::Io(_) => true,
            EventBuddyError::UrlParse(_) => false,
            EventBuddyError::InvalidInput(_) => false,
            EventBuddyError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EventBuddyError::Database(_) => ErrorSeverity::Critical,
            EventBuddyError::Migration(_) => ErrorSeverity::Critical,
            EventBuddyError::Config(_) => ErrorSeverity::Critical,
            EventBuddyError::PermissionDenied(_) => ErrorSeverity::Warning,
            EventBuddyError::NotificationFailed(_) => ErrorSeverity::Warning,
            EventBuddyError::CapacityExceeded { .. } => ErrorSeverity::Info,
            EventBuddyError::AlreadyRegistered { .. } => ErrorSeverity::Info,
            EventBuddyError::MalformedToken => ErrorSeverity::Info,
            EventBuddyError::TokenEventMismatch { .. } => ErrorSeverity::Warning,
            EventBuddyError::TicketNotFound => ErrorSeverity::Info,
            EventBuddyError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// True for registration/check-in outcomes the end user can correct
    /// themselves (pick another event, re-scan the right ticket), as opposed
    /// to operational failures.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            EventBuddyError::EventNotPublished { .. }
                | EventBuddyError::EventInPast { .. }
                | EventBuddyError::CapacityExceeded { .. }
                | EventBuddyError::AlreadyRegistered { .. }
                | EventBuddyError::MalformedToken
                | EventBuddyError::TokenEventMismatch { .. }
                | EventBuddyError::TicketNotFound
        )
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
