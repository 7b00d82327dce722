//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{DatabasePool, PersonRepository, GroupRepository, EventRepository, AttendeeRepository};
use crate::models::*;
use crate::utils::errors::EventBuddyError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub people: PersonRepository,
    pub groups: GroupRepository,
    pub events: EventRepository,
    pub attendees: AttendeeRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            people: PersonRepository::new(pool.clone()),
            groups: GroupRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            attendees: AttendeeRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin a transaction spanning multiple repository calls
    pub async fn begin(&self) -> Result<sqlx::Transaction<'_, sqlx::Postgres>, EventBuddyError> {
        Ok(self.pool.begin().await?)
    }

    /// Initialize a new group with its leader
    pub async fn initialize_group(&self, name: String, description: Option<String>, leader_id: Option<i64>) -> Result<Group, EventBuddyError> {
        let request = CreateGroupRequest {
            name,
            description,
            leader_id,
        };

        self.groups.create(request).await
    }

    /// Look up an event or fail with the typed not-found error
    pub async fn require_event(&self, event_id: i64) -> Result<Event, EventBuddyError> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(EventBuddyError::EventNotFound { event_id })
    }

    /// Look up a person or fail with the typed not-found error
    pub async fn require_person(&self, person_id: i64) -> Result<Person, EventBuddyError> {
        self.people
            .find_by_id(person_id)
            .await?
            .ok_or(EventBuddyError::PersonNotFound { person_id })
    }
}
