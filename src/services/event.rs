//! Event management service implementation
//!
//! Leaders create events for their community groups and drive the lifecycle:
//! Draft -> Published -> {Cancelled, Completed}. Collaborator grants give
//! other people door-staff rights for a single event.

use chrono::Utc;
use tracing::{info, warn};

use crate::database::DatabaseService;
use crate::models::attendee::EventCollaborator;
use crate::models::event::{CreateEventRequest, Event, EventStatus, UpdateEventRequest};
use crate::services::auth::{AccessControl, Action};
use crate::utils::errors::{EventBuddyError, Result};

#[derive(Debug, Clone)]
pub struct EventService {
    db: DatabaseService,
    access: AccessControl,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(db: DatabaseService, access: AccessControl) -> Self {
        Self { db, access }
    }

    /// Create a new draft event
    pub async fn create_event(&self, actor_id: i64, mut request: CreateEventRequest) -> Result<Event> {
        let context = self.access.authorize(actor_id, Action::CreateEvent).await?;

        if request.capacity <= 0 {
            return Err(EventBuddyError::InvalidInput(
                "Capacity must be a positive number".to_string(),
            ));
        }

        if request.event_date <= Utc::now() {
            return Err(EventBuddyError::InvalidInput(
                "Event date must be in the future".to_string(),
            ));
        }

        if let Some(group_id) = request.group_id {
            self.db
                .groups
                .find_by_id(group_id)
                .await?
                .ok_or(EventBuddyError::GroupNotFound { group_id })?;
        }

        request.created_by = Some(context.person_id);
        let event = self.db.events.create(request).await?;

        info!(event_id = event.id, created_by = context.person_id, "Event created");
        Ok(event)
    }

    /// Update a draft or published event's fields
    pub async fn update_event(
        &self,
        actor_id: i64,
        event_id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event> {
        let event = self.db.require_event(event_id).await?;
        self.access
            .authorize_for_event(actor_id, Action::ManageEvent, &event)
            .await?;

        if let Some(capacity) = request.capacity {
            if capacity <= 0 {
                return Err(EventBuddyError::InvalidInput(
                    "Capacity must be a positive number".to_string(),
                ));
            }

            // Capacity may grow freely but never shrink below the people
            // already registered.
            let registered = self.db.attendees.count_for_event(event_id).await?;
            if (capacity as i64) < registered {
                warn!(
                    event_id = event_id,
                    capacity = capacity,
                    registered = registered,
                    "Rejected capacity shrink below current registrations"
                );
                return Err(EventBuddyError::InvalidInput(format!(
                    "Capacity {} is below the {} existing registrations",
                    capacity, registered
                )));
            }
        }

        self.db.events.update(event_id, request).await
    }

    /// Open a draft event for registration
    pub async fn publish(&self, actor_id: i64, event_id: i64) -> Result<Event> {
        self.transition(actor_id, event_id, EventStatus::Published).await
    }

    /// Cancel a published event
    pub async fn cancel(&self, actor_id: i64, event_id: i64) -> Result<Event> {
        self.transition(actor_id, event_id, EventStatus::Cancelled).await
    }

    /// Close out a published event after it has run
    pub async fn complete(&self, actor_id: i64, event_id: i64) -> Result<Event> {
        self.transition(actor_id, event_id, EventStatus::Completed).await
    }

    /// Delete an event; its registrations and collaborator grants go with it
    pub async fn delete_event(&self, actor_id: i64, event_id: i64) -> Result<()> {
        let event = self.db.require_event(event_id).await?;
        self.access
            .authorize_for_event(actor_id, Action::ManageEvent, &event)
            .await?;

        self.db.events.delete(event_id).await?;
        info!(event_id = event_id, actor_id = actor_id, "Event deleted");
        Ok(())
    }

    /// Grant door-staff rights for one event. Granting twice is a no-op.
    pub async fn add_collaborator(
        &self,
        actor_id: i64,
        event_id: i64,
        person_id: i64,
    ) -> Result<EventCollaborator> {
        let event = self.db.require_event(event_id).await?;
        let context = self
            .access
            .authorize_for_event(actor_id, Action::ManageCollaborators, &event)
            .await?;

        self.db.require_person(person_id).await?;

        let collaborator = self
            .db
            .events
            .add_collaborator(event_id, person_id, Some(context.person_id))
            .await?;

        info!(
            event_id = event_id,
            person_id = person_id,
            added_by = context.person_id,
            "Collaborator added"
        );
        Ok(collaborator)
    }

    /// Revoke door-staff rights for one event
    pub async fn remove_collaborator(
        &self,
        actor_id: i64,
        event_id: i64,
        person_id: i64,
    ) -> Result<()> {
        let event = self.db.require_event(event_id).await?;
        self.access
            .authorize_for_event(actor_id, Action::ManageCollaborators, &event)
            .await?;

        self.db.events.remove_collaborator(event_id, person_id).await?;
        info!(event_id = event_id, person_id = person_id, "Collaborator removed");
        Ok(())
    }

    async fn transition(&self, actor_id: i64, event_id: i64, next: EventStatus) -> Result<Event> {
        let event = self.db.require_event(event_id).await?;
        self.access
            .authorize_for_event(actor_id, Action::ManageEvent, &event)
            .await?;

        let current = event.status();
        if !current.can_transition_to(next) {
            warn!(
                event_id = event_id,
                from = current.as_str(),
                to = next.as_str(),
                "Rejected lifecycle transition"
            );
            return Err(EventBuddyError::InvalidStateTransition {
                from: current.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }

        let event = self.db.events.set_status(event_id, next.as_str()).await?;
        info!(event_id = event_id, status = next.as_str(), "Event status changed");
        Ok(event)
    }
}
