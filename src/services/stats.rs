//! Event statistics service implementation
//!
//! Derived numbers recomputed on demand from the attendee set. Nothing here
//! is persisted or cached, and nothing here gates registration — the
//! registration transaction is the single enforcement point for capacity.

use tracing::debug;

use crate::database::DatabaseService;
use crate::models::attendee::EventStats;
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct StatsService {
    db: DatabaseService,
}

impl StatsService {
    /// Create a new StatsService instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Number of registrations for an event
    pub async fn total_registered(&self, event_id: i64) -> Result<i64> {
        self.db.require_event(event_id).await?;
        self.db.attendees.count_for_event(event_id).await
    }

    /// Number of attendees already checked in
    pub async fn total_checked_in(&self, event_id: i64) -> Result<i64> {
        self.db.require_event(event_id).await?;
        self.db.attendees.count_checked_in(event_id).await
    }

    /// Checked-in share of registrations as a whole percentage; 0 when
    /// nobody has registered yet.
    pub async fn check_in_rate(&self, event_id: i64) -> Result<u8> {
        let stats = self.event_stats(event_id).await?;
        Ok(stats.check_in_rate)
    }

    /// Remaining spots for display; floors at 0 and is never consulted by
    /// the registration gate.
    pub async fn available_spots(&self, event_id: i64) -> Result<i64> {
        let stats = self.event_stats(event_id).await?;
        Ok(stats.available_spots)
    }

    /// All derived numbers for one event in a single bundle
    pub async fn event_stats(&self, event_id: i64) -> Result<EventStats> {
        let event = self.db.require_event(event_id).await?;

        let total_registered = self.db.attendees.count_for_event(event_id).await?;
        let total_checked_in = self.db.attendees.count_checked_in(event_id).await?;

        let check_in_rate = Self::rate(total_checked_in, total_registered);
        let available_spots = (event.capacity as i64 - total_registered).max(0);

        debug!(
            event_id = event_id,
            registered = total_registered,
            checked_in = total_checked_in,
            "Event stats computed"
        );

        Ok(EventStats {
            total_registered,
            total_checked_in,
            check_in_rate,
            available_spots,
        })
    }

    fn rate(checked_in: i64, registered: i64) -> u8 {
        if registered == 0 {
            return 0;
        }
        ((checked_in as f64 / registered as f64) * 100.0).round() as u8
    }
}
