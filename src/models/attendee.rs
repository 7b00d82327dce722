//! Attendee (registration) model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One person's registration for one event.
///
/// The (event_id, person_id) pair and the ticket token are unique at the
/// storage level. `checked_in` flips false -> true exactly once; the row is
/// removed only by registration compensation or event deletion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendee {
    pub id: i64,
    pub event_id: i64,
    pub person_id: i64,
    pub ticket_token: String,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventCollaborator {
    pub id: i64,
    pub event_id: i64,
    pub person_id: i64,
    pub added_by: Option<i64>,
    pub added_at: DateTime<Utc>,
}

/// Outcome of a successful registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    pub attendee_id: i64,
    pub ticket_token: String,
    pub calendar_link: Option<String>,
}

/// Outcome of a check-in scan
///
/// `already_checked_in` distinguishes the idempotent re-scan (original
/// timestamp preserved) from a first admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInOutcome {
    pub attendee_id: i64,
    pub person_id: i64,
    pub person_name: String,
    pub already_checked_in: bool,
    pub checked_in_at: DateTime<Utc>,
}

/// Point-in-time derived numbers for one event's attendee set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventStats {
    pub total_registered: i64,
    pub total_checked_in: i64,
    pub check_in_rate: u8,
    pub available_spots: i64,
}
