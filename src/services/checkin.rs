//! Check-in service implementation
//!
//! Admits a ticket-holding attendee at the door, exactly once. Repeated
//! scans of the same ticket are safe: they report the original check-in
//! instead of an error, and never mutate the record again.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::database::DatabaseService;
use crate::models::attendee::{Attendee, CheckInOutcome};
use crate::services::auth::{AccessControl, Action};
use crate::ticket;
use crate::utils::errors::{EventBuddyError, Result};

#[derive(Debug, Clone)]
pub struct CheckInService {
    db: DatabaseService,
    access: AccessControl,
}

impl CheckInService {
    /// Create a new CheckInService instance
    pub fn new(db: DatabaseService, access: AccessControl) -> Self {
        Self { db, access }
    }

    /// Check an attendee in by their scanned ticket token.
    ///
    /// Only the event's leader, a registered collaborator, or an admin may
    /// perform this. The token is validated syntactically, matched against
    /// the door's event, and finally looked up by exact value — the storage
    /// row, not the token's structure, decides validity.
    pub async fn check_in(
        &self,
        event_id: i64,
        raw_token: &str,
        actor_id: i64,
    ) -> Result<CheckInOutcome> {
        let event = self.db.require_event(event_id).await?;
        self.access
            .authorize_for_event(actor_id, Action::CheckInAttendee, &event)
            .await?;

        if !ticket::codec::is_well_formed(raw_token) {
            debug!(event_id = event_id, "Scanned token is malformed");
            return Err(EventBuddyError::MalformedToken);
        }

        let claims = ticket::codec::parse(raw_token).ok_or(EventBuddyError::MalformedToken)?;

        if claims.event_id != event_id {
            warn!(
                event_id = event_id,
                token_event_id = claims.event_id,
                "Ticket presented at the wrong event"
            );
            return Err(EventBuddyError::TokenEventMismatch {
                event_id,
                token_event_id: claims.event_id,
            });
        }

        let attendee = self
            .db
            .attendees
            .find_by_token(raw_token)
            .await?
            .ok_or(EventBuddyError::TicketNotFound)?;

        // The stored row must agree with the token's claim; a mismatch means
        // the token was tampered with or the record was rewritten.
        if attendee.event_id != event_id {
            warn!(
                event_id = event_id,
                attendee_id = attendee.id,
                stored_event_id = attendee.event_id,
                "Stored registration contradicts the token"
            );
            return Err(EventBuddyError::TicketNotFound);
        }

        let person = self.db.require_person(attendee.person_id).await?;

        if attendee.checked_in {
            let checked_in_at = Self::recorded_check_in_time(&attendee)?;
            debug!(
                event_id = event_id,
                attendee_id = attendee.id,
                "Ticket already used, reporting original check-in"
            );
            return Ok(CheckInOutcome {
                attendee_id: attendee.id,
                person_id: person.id,
                person_name: person.full_name,
                already_checked_in: true,
                checked_in_at,
            });
        }

        let now = Utc::now();
        match self.db.attendees.mark_checked_in(attendee.id, now).await? {
            Some(updated) => {
                info!(
                    event_id = event_id,
                    attendee_id = attendee.id,
                    actor_id = actor_id,
                    "Attendee checked in"
                );
                // Report the stored timestamp so repeated scans see the
                // exact same value.
                let checked_in_at = Self::recorded_check_in_time(&updated)?;
                Ok(CheckInOutcome {
                    attendee_id: attendee.id,
                    person_id: person.id,
                    person_name: person.full_name,
                    already_checked_in: false,
                    checked_in_at,
                })
            }
            None => {
                // A concurrent scan won the conditional update between our
                // read and the flip; report its check-in instead.
                let current = self
                    .db
                    .attendees
                    .find_by_id(attendee.id)
                    .await?
                    .ok_or(EventBuddyError::TicketNotFound)?;
                let checked_in_at = Self::recorded_check_in_time(&current)?;

                debug!(
                    event_id = event_id,
                    attendee_id = attendee.id,
                    "Concurrent scan checked this ticket in first"
                );
                Ok(CheckInOutcome {
                    attendee_id: attendee.id,
                    person_id: person.id,
                    person_name: person.full_name,
                    already_checked_in: true,
                    checked_in_at,
                })
            }
        }
    }

    fn recorded_check_in_time(attendee: &Attendee) -> Result<chrono::DateTime<Utc>> {
        attendee.checked_in_at.ok_or_else(|| {
            EventBuddyError::ServiceUnavailable(format!(
                "registration {} is checked in without a timestamp",
                attendee.id
            ))
        })
    }
}
