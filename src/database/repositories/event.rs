//! Event repository implementation

use sqlx::{PgPool, Postgres, Transaction};
use chrono::Utc;
use crate::models::attendee::EventCollaborator;
use crate::models::event::{Event, CreateEventRequest, UpdateEventRequest};
use crate::utils::errors::EventBuddyError;

const EVENT_COLUMNS: &str = "id, group_id, title, description, event_date, duration_minutes, location, capacity, status, created_by, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event; events always start in draft
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, EventBuddyError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (group_id, title, description, event_date, duration_minutes, location, capacity, status, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'draft', $8, $9, $10)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.group_id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.event_date)
        .bind(request.duration_minutes)
        .bind(request.location)
        .bind(request.capacity)
        .bind(request.created_by)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, EventBuddyError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID with a row lock, inside the caller's transaction.
    ///
    /// The lock serializes registrations against the same event for the
    /// lifetime of the transaction, so a capacity count taken afterwards
    /// cannot be overtaken by a concurrent insert.
    pub async fn find_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> Result<Option<Event>, EventBuddyError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(event)
    }

    /// Update event fields
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, EventBuddyError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                duration_minutes = COALESCE($5, duration_minutes),
                location = COALESCE($6, location),
                capacity = COALESCE($7, capacity),
                updated_at = $8
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.event_date)
        .bind(request.duration_minutes)
        .bind(request.location)
        .bind(request.capacity)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Set event lifecycle status
    pub async fn set_status(&self, id: i64, status: &str) -> Result<Event, EventBuddyError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event; attendees and collaborator grants cascade
    pub async fn delete(&self, id: i64) -> Result<(), EventBuddyError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Get upcoming published events
    pub async fn get_upcoming_events(&self, limit: Option<i64>) -> Result<Vec<Event>, EventBuddyError> {
        let limit = limit.unwrap_or(50);
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_date > NOW() AND status = 'published' ORDER BY event_date ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Get events for group
    pub async fn get_group_events(&self, group_id: i64) -> Result<Vec<Event>, EventBuddyError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE group_id = $1 ORDER BY event_date ASC"
        ))
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Grant door-staff rights for an event. Granting twice is a no-op.
    pub async fn add_collaborator(
        &self,
        event_id: i64,
        person_id: i64,
        added_by: Option<i64>,
    ) -> Result<EventCollaborator, EventBuddyError> {
        sqlx::query(
            r#"
            INSERT INTO event_collaborators (event_id, person_id, added_by, added_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (event_id, person_id) DO NOTHING
            "#
        )
        .bind(event_id)
        .bind(person_id)
        .bind(added_by)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let collaborator = sqlx::query_as::<_, EventCollaborator>(
            "SELECT id, event_id, person_id, added_by, added_at FROM event_collaborators WHERE event_id = $1 AND person_id = $2"
        )
        .bind(event_id)
        .bind(person_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(collaborator)
    }

    /// Revoke door-staff rights for an event
    pub async fn remove_collaborator(&self, event_id: i64, person_id: i64) -> Result<(), EventBuddyError> {
        sqlx::query("DELETE FROM event_collaborators WHERE event_id = $1 AND person_id = $2")
            .bind(event_id)
            .bind(person_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Check if person holds door-staff rights for an event
    pub async fn is_collaborator(&self, event_id: i64, person_id: i64) -> Result<bool, EventBuddyError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_collaborators WHERE event_id = $1 AND person_id = $2"
        )
        .bind(event_id)
        .bind(person_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// List an event's collaborators
    pub async fn list_collaborators(&self, event_id: i64) -> Result<Vec<EventCollaborator>, EventBuddyError> {
        let collaborators = sqlx::query_as::<_, EventCollaborator>(
            "SELECT id, event_id, person_id, added_by, added_at FROM event_collaborators WHERE event_id = $1 ORDER BY added_at ASC"
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(collaborators)
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, EventBuddyError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
