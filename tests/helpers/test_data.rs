//! Test data helpers for creating test objects
//!
//! This module provides helper functions for building test settings and
//! seeding people, groups and events through the crate's own repositories.

use chrono::{Duration, Utc};
use fake::faker::name::en::Name;
use fake::Fake;
use uuid::Uuid;

use EventBuddy::config::Settings;
use EventBuddy::database::DatabaseService;
use EventBuddy::models::{CreateEventRequest, CreatePersonRequest, Event, Group, Person};

/// Settings wired for tests: confirmation mail disabled unless a mock mail
/// API URL is provided.
pub fn test_settings(database_url: &str, mail_api_url: Option<&str>) -> Settings {
    let mut settings = Settings::default();
    settings.database.url = database_url.to_string();

    match mail_api_url {
        Some(url) => {
            settings.features.confirmation_emails = true;
            settings.mail.api_url = url.to_string();
            settings.mail.api_key = "test-key".to_string();
            settings.mail.timeout_seconds = 2;
        }
        None => {
            settings.features.confirmation_emails = false;
        }
    }

    settings
}

/// Create a person with the given role and a generated name. Emails carry a
/// fresh UUID so parallel fixtures never collide on the unique constraint.
pub async fn create_person(db: &DatabaseService, role: &str) -> Person {
    let full_name: String = Name().fake();
    let email = format!("person-{}@example.com", Uuid::new_v4());

    db.people
        .create(CreatePersonRequest {
            full_name,
            email,
            role: Some(role.to_string()),
        })
        .await
        .expect("Failed to create person")
}

/// Create a community group led by the given person
pub async fn create_group(db: &DatabaseService, leader_id: i64) -> Group {
    db.initialize_group(
        "Test Community".to_string(),
        Some("A community for integration tests".to_string()),
        Some(leader_id),
    )
    .await
    .expect("Failed to create group")
}

/// Create a draft event seven days out
pub async fn create_draft_event(
    db: &DatabaseService,
    group_id: Option<i64>,
    created_by: i64,
    capacity: i32,
) -> Event {
    db.events
        .create(CreateEventRequest {
            group_id,
            title: "Test Social".to_string(),
            description: Some("An evening social for tests".to_string()),
            event_date: Utc::now() + Duration::days(7),
            duration_minutes: None,
            location: Some("Test Venue".to_string()),
            capacity,
            created_by: Some(created_by),
        })
        .await
        .expect("Failed to create event")
}

/// Create a published event seven days out
pub async fn create_published_event(
    db: &DatabaseService,
    group_id: Option<i64>,
    created_by: i64,
    capacity: i32,
) -> Event {
    let event = create_draft_event(db, group_id, created_by, capacity).await;
    db.events
        .set_status(event.id, "published")
        .await
        .expect("Failed to publish event")
}

/// Create a published event whose date is already behind us
pub async fn create_past_event(db: &DatabaseService, created_by: i64, capacity: i32) -> Event {
    let event = db
        .events
        .create(CreateEventRequest {
            group_id: None,
            title: "Yesterday's Social".to_string(),
            description: None,
            event_date: Utc::now() - Duration::days(1),
            duration_minutes: None,
            location: None,
            capacity,
            created_by: Some(created_by),
        })
        .await
        .expect("Failed to create event");

    db.events
        .set_status(event.id, "published")
        .await
        .expect("Failed to publish event")
}
