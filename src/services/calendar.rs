//! Calendar link service implementation
//!
//! Derives "Add to Calendar" URLs and iCal documents from an event's own
//! fields. Pure formatting, no external calls.

use tracing::debug;
use crate::config::settings::Settings;
use crate::models::event::Event;
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct CalendarService {
    settings: Settings,
}

impl CalendarService {
    /// Create a new CalendarService instance
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Check if calendar links are enabled
    pub fn is_enabled(&self) -> bool {
        self.settings.features.calendar_links
    }

    /// Generate "Add to Calendar" URL for an event
    pub fn add_to_calendar_url(&self, event: &Event) -> String {
        debug!(event_id = event.id, "Generating add to calendar URL");

        let start_time = event.event_date.format("%Y%m%dT%H%M%SZ").to_string();
        let end_time = event.end_date().format("%Y%m%dT%H%M%SZ").to_string();

        let mut url = "https://calendar.google.com/calendar/render?action=TEMPLATE".to_string();

        url.push_str(&format!("&text={}", urlencoding::encode(&event.title)));
        url.push_str(&format!("&dates={}/{}", start_time, end_time));

        if let Some(description) = &event.description {
            url.push_str(&format!("&details={}", urlencoding::encode(description)));
        }

        if let Some(location) = &event.location {
            url.push_str(&format!("&location={}", urlencoding::encode(location)));
        }

        url
    }

    /// Generate iCal format for an event (alternative to the URL form)
    pub fn ical(&self, event: &Event) -> Result<String> {
        debug!(event_id = event.id, "Generating iCal document");

        let start_time = event.event_date.format("%Y%m%dT%H%M%SZ").to_string();
        let end_time = event.end_date().format("%Y%m%dT%H%M%SZ").to_string();
        let created_time = event.created_at.format("%Y%m%dT%H%M%SZ").to_string();

        let mut ical = String::new();
        ical.push_str("BEGIN:VCALENDAR\r\n");
        ical.push_str("VERSION:2.0\r\n");
        ical.push_str("PRODID:-//EventBuddy//EventBuddy//EN\r\n");
        ical.push_str("BEGIN:VEVENT\r\n");
        ical.push_str(&format!("UID:eventbuddy-{}\r\n", event.id));
        ical.push_str(&format!("DTSTART:{}\r\n", start_time));
        ical.push_str(&format!("DTEND:{}\r\n", end_time));
        ical.push_str(&format!("DTSTAMP:{}\r\n", created_time));
        ical.push_str(&format!("SUMMARY:{}\r\n", event.title));

        if let Some(description) = &event.description {
            ical.push_str(&format!("DESCRIPTION:{}\r\n", description.replace('\n', "\\n")));
        }

        if let Some(location) = &event.location {
            ical.push_str(&format!("LOCATION:{}\r\n", location));
        }

        ical.push_str("STATUS:CONFIRMED\r\n");
        ical.push_str("END:VEVENT\r\n");
        ical.push_str("END:VCALENDAR\r\n");

        Ok(ical)
    }
}
