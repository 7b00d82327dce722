//! Attendee (registration) repository implementation

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use crate::models::attendee::Attendee;
use crate::utils::errors::EventBuddyError;

const ATTENDEE_COLUMNS: &str = "id, event_id, person_id, ticket_token, checked_in, checked_in_at, registered_at";

/// Postgres unique-violation SQLSTATE
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct AttendeeRepository {
    pool: PgPool,
}

impl AttendeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a registration inside the caller's transaction.
    ///
    /// The row is created with a placeholder token so it has an identity the
    /// real token can be issued against. A concurrent duplicate that slips
    /// past the service-level existence check lands on the (event, person)
    /// unique constraint and is reported as AlreadyRegistered.
    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
        person_id: i64,
        placeholder_token: &str,
    ) -> Result<Attendee, EventBuddyError> {
        let result = sqlx::query_as::<_, Attendee>(&format!(
            r#"
            INSERT INTO attendees (event_id, person_id, ticket_token, registered_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {ATTENDEE_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(person_id)
        .bind(placeholder_token)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await;

        result.map_err(|e| Self::map_unique_violation(e, event_id, person_id))
    }

    /// Replace the placeholder with the issued ticket token, inside the
    /// caller's transaction. The token is immutable after this point.
    pub async fn set_ticket_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        attendee_id: i64,
        token: &str,
    ) -> Result<Attendee, EventBuddyError> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            r#"
            UPDATE attendees
            SET ticket_token = $2
            WHERE id = $1
            RETURNING {ATTENDEE_COLUMNS}
            "#
        ))
        .bind(attendee_id)
        .bind(token)
        .fetch_one(&mut **tx)
        .await?;

        Ok(attendee)
    }

    /// Find a registration by its full ticket token (exact match)
    pub async fn find_by_token(&self, token: &str) -> Result<Option<Attendee>, EventBuddyError> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE ticket_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendee)
    }

    /// Find a registration by (event, person)
    pub async fn find_by_event_and_person(
        &self,
        event_id: i64,
        person_id: i64,
    ) -> Result<Option<Attendee>, EventBuddyError> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE event_id = $1 AND person_id = $2"
        ))
        .bind(event_id)
        .bind(person_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendee)
    }

    /// Same lookup inside the caller's transaction
    pub async fn find_by_event_and_person_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
        person_id: i64,
    ) -> Result<Option<Attendee>, EventBuddyError> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE event_id = $1 AND person_id = $2"
        ))
        .bind(event_id)
        .bind(person_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(attendee)
    }

    /// Count registrations for an event
    pub async fn count_for_event(&self, event_id: i64) -> Result<i64, EventBuddyError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM attendees WHERE event_id = $1"
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Same count inside the caller's transaction; paired with the event row
    /// lock this is the capacity gate.
    pub async fn count_for_event_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
    ) -> Result<i64, EventBuddyError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM attendees WHERE event_id = $1"
        )
        .bind(event_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(count.0)
    }

    /// Count checked-in attendees for an event
    pub async fn count_checked_in(&self, event_id: i64) -> Result<i64, EventBuddyError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM attendees WHERE event_id = $1 AND checked_in = true"
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Flip the check-in flag, but only if it is still unset.
    ///
    /// Returns None when another scan already won the flip; the caller
    /// re-reads the row and reports the idempotent outcome instead.
    pub async fn mark_checked_in(
        &self,
        attendee_id: i64,
        checked_in_at: DateTime<Utc>,
    ) -> Result<Option<Attendee>, EventBuddyError> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            r#"
            UPDATE attendees
            SET checked_in = true, checked_in_at = $2
            WHERE id = $1 AND checked_in = false
            RETURNING {ATTENDEE_COLUMNS}
            "#
        ))
        .bind(attendee_id)
        .bind(checked_in_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendee)
    }

    /// Re-read a registration by id
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Attendee>, EventBuddyError> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendee)
    }

    /// Delete a registration (registration compensation path)
    pub async fn delete(&self, id: i64) -> Result<(), EventBuddyError> {
        sqlx::query("DELETE FROM attendees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List an event's registrations in registration order
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Attendee>, EventBuddyError> {
        let attendees = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE event_id = $1 ORDER BY registered_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attendees)
    }

    fn map_unique_violation(e: sqlx::Error, event_id: i64, person_id: i64) -> EventBuddyError {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some("attendees_event_id_person_id_key")
            {
                return EventBuddyError::AlreadyRegistered { event_id, person_id };
            }
        }
        e.into()
    }
}
