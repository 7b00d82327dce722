//! Registration service implementation
//!
//! Admits a person into an event's attendee list under the capacity and
//! uniqueness constraints, and hands them a usable ticket. All storage
//! writes happen inside one transaction holding the event row lock, so two
//! concurrent registrations for the last open spot cannot both pass the
//! capacity count. The confirmation mail is sent after commit; if delivery
//! fails, the registration is deleted again before the error surfaces.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::DatabaseService;
use crate::models::attendee::RegistrationOutcome;
use crate::services::calendar::CalendarService;
use crate::services::notification::{ConfirmationRequest, NotificationService};
use crate::ticket;
use crate::ticket::TicketRenderer;
use crate::utils::errors::{EventBuddyError, Result};
use crate::utils::helpers;

#[derive(Debug, Clone)]
pub struct RegistrationService {
    db: DatabaseService,
    notifications: NotificationService,
    calendar: CalendarService,
    renderer: TicketRenderer,
}

impl RegistrationService {
    /// Create a new RegistrationService instance
    pub fn new(
        db: DatabaseService,
        notifications: NotificationService,
        calendar: CalendarService,
        renderer: TicketRenderer,
    ) -> Self {
        Self {
            db,
            notifications,
            calendar,
            renderer,
        }
    }

    /// Register a person for an event and issue their ticket.
    ///
    /// On success exactly one attendee record exists for (person, event)
    /// with a well-formed unique token, and the person has been notified.
    /// Any failure leaves no registration behind.
    pub async fn register(
        &self,
        event_id: i64,
        full_name: &str,
        email: &str,
        wants_calendar_link: bool,
    ) -> Result<RegistrationOutcome> {
        let full_name = full_name.trim();
        let email = email.trim();

        if full_name.is_empty() {
            return Err(EventBuddyError::InvalidInput("Name must not be empty".to_string()));
        }
        if !helpers::is_valid_email(email) {
            return Err(EventBuddyError::InvalidInput(format!("Invalid email address: {}", email)));
        }

        debug!(event_id = event_id, email = %email, "Starting registration");

        let mut tx = self.db.begin().await?;

        // Row lock held until commit; concurrent registrations for the same
        // event queue up behind it.
        let event = self
            .db
            .events
            .find_by_id_for_update(&mut tx, event_id)
            .await?
            .ok_or(EventBuddyError::EventNotFound { event_id })?;

        if !event.is_published() {
            return Err(EventBuddyError::EventNotPublished { event_id });
        }

        if !event.starts_in_future(Utc::now()) {
            return Err(EventBuddyError::EventInPast { event_id });
        }

        let registered = self.db.attendees.count_for_event_in_tx(&mut tx, event_id).await?;
        if registered >= event.capacity as i64 {
            debug!(event_id = event_id, capacity = event.capacity, "Event is full");
            return Err(EventBuddyError::CapacityExceeded {
                event_id,
                capacity: event.capacity,
            });
        }

        let person = self
            .db
            .people
            .find_or_create_by_email_in_tx(&mut tx, full_name, email)
            .await?;

        if self
            .db
            .attendees
            .find_by_event_and_person_in_tx(&mut tx, event_id, person.id)
            .await?
            .is_some()
        {
            return Err(EventBuddyError::AlreadyRegistered {
                event_id,
                person_id: person.id,
            });
        }

        // The row needs an identity before the real token can name it; the
        // placeholder is unique and never leaves this transaction.
        let placeholder = format!("pending-{}", Uuid::new_v4());
        let attendee = self
            .db
            .attendees
            .insert(&mut tx, event_id, person.id, &placeholder)
            .await?;

        let token = ticket::codec::issue(attendee.id, event_id);
        let attendee = self
            .db
            .attendees
            .set_ticket_token(&mut tx, attendee.id, &token)
            .await?;

        tx.commit().await?;

        let calendar_link = if wants_calendar_link && self.calendar.is_enabled() {
            Some(self.calendar.add_to_calendar_url(&event))
        } else {
            None
        };

        let confirmation = ConfirmationRequest {
            recipient_name: person.full_name.clone(),
            recipient_email: person.email.clone(),
            event_title: event.title.clone(),
            event_date: helpers::format_timestamp(event.event_date),
            event_location: event.location.clone(),
            ticket_token: token.clone(),
            qr_image_url: self.renderer.qr_image_url(&token),
            calendar_link: calendar_link.clone(),
        };

        if let Err(e) = self.notifications.send_confirmation(confirmation).await {
            warn!(
                event_id = event_id,
                attendee_id = attendee.id,
                error = %e,
                "Confirmation delivery failed, rolling the registration back"
            );
            self.db.attendees.delete(attendee.id).await?;
            return Err(e);
        }

        info!(
            event_id = event_id,
            attendee_id = attendee.id,
            person_id = person.id,
            "Registration completed"
        );

        Ok(RegistrationOutcome {
            attendee_id: attendee.id,
            ticket_token: token,
            calendar_link,
        })
    }
}
