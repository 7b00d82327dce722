//! Notification service implementation
//!
//! This service formats and delivers transactional mail through the
//! configured mail API. Delivery is bounded by the configured timeout; any
//! transport failure, timeout or non-success response is reported as
//! NotificationFailed so registration can run its compensation path.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use crate::config::settings::Settings;
use crate::utils::errors::{EventBuddyError, Result};

/// Everything needed to confirm one registration
#[derive(Debug, Clone)]
pub struct ConfirmationRequest {
    pub recipient_name: String,
    pub recipient_email: String,
    pub event_title: String,
    pub event_date: String,
    pub event_location: Option<String>,
    pub ticket_token: String,
    pub qr_image_url: String,
    pub calendar_link: Option<String>,
}

/// A status update sent to many registered attendees at once
#[derive(Debug, Clone)]
pub struct EventUpdateRequest {
    pub recipient_emails: Vec<String>,
    pub event_title: String,
    pub message: String,
}

/// Outbound mail payload for the mail API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OutboundMail {
    from_name: String,
    from_address: String,
    to_address: String,
    subject: String,
    body: String,
}

#[derive(Debug, Clone)]
pub struct NotificationService {
    settings: Settings,
    http_client: reqwest::Client,
    templates: HashMap<String, String>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(settings: Settings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.mail.timeout_seconds))
            .user_agent("EventBuddy/1.0")
            .build()
            .map_err(EventBuddyError::Http)?;

        Ok(Self {
            settings,
            http_client,
            templates: Self::load_default_templates(),
        })
    }

    /// Send a registration confirmation with the ticket and optional
    /// calendar link. Failure here means the registration must not stand.
    pub async fn send_confirmation(&self, request: ConfirmationRequest) -> Result<()> {
        if !self.settings.features.confirmation_emails {
            debug!(recipient = %request.recipient_email, "Confirmation emails disabled, skipping delivery");
            return Ok(());
        }

        let mut params = HashMap::new();
        params.insert("name".to_string(), request.recipient_name.clone());
        params.insert("event".to_string(), request.event_title.clone());
        params.insert("date".to_string(), request.event_date.clone());
        params.insert(
            "location".to_string(),
            request.event_location.clone().unwrap_or_else(|| "To be announced".to_string()),
        );
        params.insert("token".to_string(), request.ticket_token.clone());
        params.insert("qr_url".to_string(), request.qr_image_url.clone());
        params.insert(
            "calendar".to_string(),
            request
                .calendar_link
                .clone()
                .map(|link| format!("Add to your calendar: {}", link))
                .unwrap_or_default(),
        );

        let subject = self.render_template("confirmation_subject", &params)?;
        let body = self.render_template("confirmation_body", &params)?;

        self.deliver(&request.recipient_email, subject, body).await?;

        info!(
            recipient = %request.recipient_email,
            event = %request.event_title,
            "Registration confirmation sent"
        );
        Ok(())
    }

    /// Send the same update to every registered attendee of an event.
    /// Individual failures are collected, not short-circuited.
    pub async fn send_event_update(&self, request: EventUpdateRequest) -> Result<usize> {
        if !self.settings.features.confirmation_emails {
            debug!(event = %request.event_title, "Confirmation emails disabled, skipping event update");
            return Ok(0);
        }

        let mut params = HashMap::new();
        params.insert("event".to_string(), request.event_title.clone());
        params.insert("message".to_string(), request.message.clone());

        let subject = self.render_template("event_update_subject", &params)?;
        let body = self.render_template("event_update_body", &params)?;

        let sends = request.recipient_emails.iter().map(|email| {
            let subject = subject.clone();
            let body = body.clone();
            async move { self.deliver(email, subject, body).await }
        });

        let results = futures::future::join_all(sends).await;
        let delivered = results.iter().filter(|r| r.is_ok()).count();
        let failed = results.len() - delivered;

        if failed > 0 {
            warn!(
                event = %request.event_title,
                delivered = delivered,
                failed = failed,
                "Some event update deliveries failed"
            );
        }

        Ok(delivered)
    }

    async fn deliver(&self, to_address: &str, subject: String, body: String) -> Result<()> {
        let mail = OutboundMail {
            from_name: self.settings.mail.from_name.clone(),
            from_address: self.settings.mail.from_address.clone(),
            to_address: to_address.to_string(),
            subject,
            body,
        };

        let response = self
            .http_client
            .post(&self.settings.mail.api_url)
            .bearer_auth(&self.settings.mail.api_key)
            .json(&mail)
            .send()
            .await
            .map_err(|e| EventBuddyError::NotificationFailed(e.to_string()))?;

        if !response.status().is_success() {
            warn!(recipient = %to_address, status = %response.status(), "Mail API rejected delivery");
            return Err(EventBuddyError::NotificationFailed(format!(
                "mail API returned {}",
                response.status()
            )));
        }

        debug!(recipient = %to_address, "Mail delivered");
        Ok(())
    }

    /// Render a template by substituting {param} placeholders
    fn render_template(&self, key: &str, params: &HashMap<String, String>) -> Result<String> {
        let template = self.templates.get(key).ok_or_else(|| {
            EventBuddyError::Config(format!("Unknown mail template: {}", key))
        })?;

        let mut rendered = template.clone();
        for (name, value) in params {
            rendered = rendered.replace(&format!("{{{}}}", name), value);
        }

        Ok(rendered)
    }

    fn load_default_templates() -> HashMap<String, String> {
        let mut templates = HashMap::new();

        templates.insert(
            "confirmation_subject".to_string(),
            "Your ticket for {event}".to_string(),
        );
        templates.insert(
            "confirmation_body".to_string(),
            "Hi {name},\n\n\
             You are registered for {event} on {date} at {location}.\n\n\
             Show this QR code at the door: {qr_url}\n\
             Ticket reference: {token}\n\n\
             {calendar}\n\n\
             See you there!"
                .to_string(),
        );
        templates.insert(
            "event_update_subject".to_string(),
            "Update for {event}".to_string(),
        );
        templates.insert(
            "event_update_body".to_string(),
            "An update about {event}:\n\n{message}".to_string(),
        );

        templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> NotificationService {
        NotificationService::new(Settings::default()).expect("client should build")
    }

    #[test]
    fn test_render_template_substitutes_params() {
        let service = service();
        let mut params = HashMap::new();
        params.insert("event".to_string(), "Spring Social".to_string());

        let rendered = service
            .render_template("confirmation_subject", &params)
            .expect("template should render");
        assert_eq!(rendered, "Your ticket for Spring Social");
    }

    #[test]
    fn test_disabled_confirmations_short_circuit() {
        let mut settings = Settings::default();
        settings.features.confirmation_emails = false;
        let service = NotificationService::new(settings).expect("client should build");

        let request = ConfirmationRequest {
            recipient_name: "Ana".to_string(),
            recipient_email: "ana@example.com".to_string(),
            event_title: "Spring Social".to_string(),
            event_date: "2025-06-01 19:00:00 UTC".to_string(),
            event_location: None,
            ticket_token: "1-2-abc".to_string(),
            qr_image_url: "https://example.com/qr".to_string(),
            calendar_link: None,
        };

        // No network involved: the feature flag short-circuits delivery
        tokio_test::block_on(service.send_confirmation(request)).expect("disabled delivery is Ok");
    }

    #[test]
    fn test_render_template_unknown_key() {
        let service = service();
        let result = service.render_template("missing", &HashMap::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_confirmation_body_carries_ticket_assets() {
        let service = service();
        let mut params = HashMap::new();
        params.insert("name".to_string(), "Ana".to_string());
        params.insert("event".to_string(), "Spring Social".to_string());
        params.insert("date".to_string(), "2025-06-01 19:00 UTC".to_string());
        params.insert("location".to_string(), "Main Hall".to_string());
        params.insert("token".to_string(), "1-2-abc".to_string());
        params.insert("qr_url".to_string(), "https://example.com/qr".to_string());
        params.insert("calendar".to_string(), String::new());

        let body = service
            .render_template("confirmation_body", &params)
            .expect("template should render");
        assert!(body.contains("Ana"));
        assert!(body.contains("https://example.com/qr"));
        assert!(body.contains("1-2-abc"));
    }
}
