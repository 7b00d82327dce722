//! Person repository implementation

use sqlx::{PgPool, Postgres, Transaction};
use chrono::Utc;
use crate::models::person::{Person, CreatePersonRequest, UpdatePersonRequest};
use crate::utils::errors::EventBuddyError;

#[derive(Debug, Clone)]
pub struct PersonRepository {
    pool: PgPool,
}

impl PersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new person
    pub async fn create(&self, request: CreatePersonRequest) -> Result<Person, EventBuddyError> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO people (full_name, email, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, full_name, email, role, created_at, updated_at
            "#
        )
        .bind(request.full_name)
        .bind(request.email)
        .bind(request.role.unwrap_or_else(|| "attendee".to_string()))
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(person)
    }

    /// Find person by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Person>, EventBuddyError> {
        let person = sqlx::query_as::<_, Person>(
            "SELECT id, full_name, email, role, created_at, updated_at FROM people WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }

    /// Find person by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Person>, EventBuddyError> {
        let person = sqlx::query_as::<_, Person>(
            "SELECT id, full_name, email, role, created_at, updated_at FROM people WHERE email = $1"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }

    /// Find a person by email or create one, inside the caller's transaction.
    ///
    /// The conditional insert makes concurrent first registrations for the
    /// same email converge on a single row; the loser of the insert race
    /// falls through to the select.
    pub async fn find_or_create_by_email_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        full_name: &str,
        email: &str,
    ) -> Result<Person, EventBuddyError> {
        let inserted = sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO people (full_name, email, role, created_at, updated_at)
            VALUES ($1, $2, 'attendee', $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, full_name, email, role, created_at, updated_at
            "#
        )
        .bind(full_name)
        .bind(email)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(person) = inserted {
            return Ok(person);
        }

        let person = sqlx::query_as::<_, Person>(
            "SELECT id, full_name, email, role, created_at, updated_at FROM people WHERE email = $1"
        )
        .bind(email)
        .fetch_one(&mut **tx)
        .await?;

        Ok(person)
    }

    /// Update person
    pub async fn update(&self, id: i64, request: UpdatePersonRequest) -> Result<Person, EventBuddyError> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            UPDATE people
            SET full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                updated_at = $5
            WHERE id = $1
            RETURNING id, full_name, email, role, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(request.full_name)
        .bind(request.email)
        .bind(request.role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(person)
    }

    /// Delete person
    pub async fn delete(&self, id: i64) -> Result<(), EventBuddyError> {
        sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List people with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Person>, EventBuddyError> {
        let people = sqlx::query_as::<_, Person>(
            "SELECT id, full_name, email, role, created_at, updated_at FROM people ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(people)
    }

    /// Count total people
    pub async fn count(&self) -> Result<i64, EventBuddyError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM people")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
