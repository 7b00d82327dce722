//! Access control service
//!
//! Authorization works from an explicit actor context passed into each
//! operation, never from ambient request state. A single policy table maps
//! (role, action) to an access scope; event-scoped decisions then resolve
//! the actor's relationship to the specific event (leader or registered
//! collaborator).

use tracing::{debug, warn};
use crate::database::DatabaseService;
use crate::config::settings::Settings;
use crate::models::event::Event;
use crate::models::person::PersonRole;
use crate::utils::errors::{EventBuddyError, Result};

/// Operations subject to access control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateEvent,
    ManageEvent,
    ManageCollaborators,
    CheckInAttendee,
    ViewStats,
}

/// How far a role's permission for an action reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// Allowed for any event
    Any,
    /// Allowed only through a relationship with the specific event
    EventScoped,
    /// Never allowed
    Denied,
}

/// Authenticated actor identity resolved once per operation
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub person_id: i64,
    pub role: PersonRole,
    pub is_admin: bool,
}

/// Policy table: (role, action) -> scope
fn scope_for(role: PersonRole, action: Action) -> AccessScope {
    use Action::*;
    use PersonRole::*;

    match (role, action) {
        (Admin, _) => AccessScope::Any,

        (Leader, CreateEvent) => AccessScope::Any,
        (Leader, ManageEvent) => AccessScope::EventScoped,
        (Leader, ManageCollaborators) => AccessScope::EventScoped,
        (Leader, CheckInAttendee) => AccessScope::EventScoped,
        (Leader, ViewStats) => AccessScope::EventScoped,

        // A plain attendee can work an event's door or read its stats only
        // through a collaborator grant.
        (Attendee, CheckInAttendee) => AccessScope::EventScoped,
        (Attendee, ViewStats) => AccessScope::EventScoped,
        (Attendee, _) => AccessScope::Denied,
    }
}

/// Whether an event-scoped grant for this action extends to collaborators
/// or stays with the event's leader alone.
fn collaborators_allowed(action: Action) -> bool {
    matches!(action, Action::CheckInAttendee | Action::ViewStats)
}

#[derive(Debug, Clone)]
pub struct AccessControl {
    db: DatabaseService,
    settings: Settings,
}

impl AccessControl {
    pub fn new(db: DatabaseService, settings: Settings) -> Self {
        Self { db, settings }
    }

    /// Resolve the actor context for a person
    pub async fn context_for(&self, person_id: i64) -> Result<ActorContext> {
        let person = self.db.require_person(person_id).await?;
        let is_admin = person.role() == PersonRole::Admin
            || self.settings.organization.admin_ids.contains(&person_id);

        debug!(person_id = person_id, role = ?person.role(), is_admin = is_admin, "Actor context resolved");

        Ok(ActorContext {
            person_id,
            role: person.role(),
            is_admin,
        })
    }

    /// Authorize an action that is not tied to a particular event
    pub async fn authorize(&self, actor_id: i64, action: Action) -> Result<ActorContext> {
        let context = self.context_for(actor_id).await?;

        if context.is_admin {
            return Ok(context);
        }

        match scope_for(context.role, action) {
            AccessScope::Any => Ok(context),
            _ => {
                warn!(actor_id = actor_id, action = ?action, "Action denied by policy");
                Err(EventBuddyError::PermissionDenied(format!(
                    "person {} may not perform {:?}",
                    actor_id, action
                )))
            }
        }
    }

    /// Authorize an action against one event
    pub async fn authorize_for_event(
        &self,
        actor_id: i64,
        action: Action,
        event: &Event,
    ) -> Result<ActorContext> {
        let context = self.context_for(actor_id).await?;

        if context.is_admin {
            return Ok(context);
        }

        match scope_for(context.role, action) {
            AccessScope::Any => Ok(context),
            AccessScope::EventScoped => {
                if event.created_by == Some(context.person_id) {
                    return Ok(context);
                }

                if collaborators_allowed(action)
                    && self.db.events.is_collaborator(event.id, context.person_id).await?
                {
                    return Ok(context);
                }

                warn!(
                    actor_id = actor_id,
                    event_id = event.id,
                    action = ?action,
                    "Actor holds no grant for this event"
                );
                Err(EventBuddyError::PermissionDenied(format!(
                    "person {} may not perform {:?} for event {}",
                    actor_id, action, event.id
                )))
            }
            AccessScope::Denied => {
                warn!(actor_id = actor_id, event_id = event.id, action = ?action, "Action denied by policy");
                Err(EventBuddyError::PermissionDenied(format!(
                    "person {} may not perform {:?}",
                    actor_id, action
                )))
            }
        }
    }
}
