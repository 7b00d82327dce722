//! Event model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub group_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub capacity: i32,
    pub status: String,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub group_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub capacity: i32,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
}

/// Event lifecycle status
///
/// Draft -> Published -> {Cancelled, Completed}. No other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Published => "published",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<EventStatus> {
        match value {
            "draft" => Some(EventStatus::Draft),
            "published" => Some(EventStatus::Published),
            "cancelled" => Some(EventStatus::Cancelled),
            "completed" => Some(EventStatus::Completed),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        matches!(
            (self, next),
            (EventStatus::Draft, EventStatus::Published)
                | (EventStatus::Published, EventStatus::Cancelled)
                | (EventStatus::Published, EventStatus::Completed)
        )
    }
}

impl Event {
    /// Parsed lifecycle status; rows only ever hold the four known values.
    pub fn status(&self) -> EventStatus {
        EventStatus::parse(&self.status).unwrap_or(EventStatus::Draft)
    }

    pub fn is_published(&self) -> bool {
        self.status() == EventStatus::Published
    }

    pub fn starts_in_future(&self, now: DateTime<Utc>) -> bool {
        self.event_date > now
    }

    /// Event end time; registrations without an explicit duration run 2 hours.
    pub fn end_date(&self) -> DateTime<Utc> {
        let minutes = self.duration_minutes.unwrap_or(120);
        self.event_date + Duration::minutes(minutes as i64)
    }
}
