//! Registration workflow integration tests
//!
//! Exercises the registration gates (status, date, capacity, duplicates),
//! the issued ticket, and the compensation path when confirmation delivery
//! fails.

mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use EventBuddy::ticket;
use EventBuddy::utils::errors::EventBuddyError;
use EventBuddy::ServiceFactory;

use helpers::database_helper::TestDatabase;
use helpers::test_data;

async fn setup() -> (TestDatabase, ServiceFactory) {
    let db = TestDatabase::new().await.expect("Failed to create test database");
    let settings = test_data::test_settings(&db.database_url, None);
    let services =
        ServiceFactory::new(db.pool.clone(), settings).expect("Failed to build services");
    (db, services)
}

#[tokio::test]
#[serial]
async fn test_registration_happy_path() {
    let (db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 2).await;

    let outcome = services
        .registration_service
        .register(event.id, "Ana", "ana@example.com", false)
        .await
        .expect("Registration should succeed");

    assert!(ticket::is_well_formed(&outcome.ticket_token));
    assert!(outcome.calendar_link.is_none());

    let claims = ticket::parse(&outcome.ticket_token).expect("Issued token should parse");
    assert_eq!(claims.attendee_id, outcome.attendee_id);
    assert_eq!(claims.event_id, event.id);

    let count = db.count_records("attendees").await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[serial]
async fn test_registration_returns_calendar_link_on_request() {
    let (_db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 5).await;

    let outcome = services
        .registration_service
        .register(event.id, "Ana", "ana@example.com", true)
        .await
        .expect("Registration should succeed");

    let link = outcome.calendar_link.expect("Calendar link was requested");
    assert!(link.contains("calendar.google.com"));
    assert!(link.contains("Test%20Social"));
}

#[tokio::test]
#[serial]
async fn test_registration_unknown_event() {
    let (_db, services) = setup().await;

    let result = services
        .registration_service
        .register(424242, "Ana", "ana@example.com", false)
        .await;

    assert_matches!(result, Err(EventBuddyError::EventNotFound { event_id: 424242 }));
}

#[tokio::test]
#[serial]
async fn test_registration_rejects_draft_event() {
    let (_db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_draft_event(&services.database, None, leader.id, 5).await;

    let result = services
        .registration_service
        .register(event.id, "Ana", "ana@example.com", false)
        .await;

    assert_matches!(result, Err(EventBuddyError::EventNotPublished { .. }));
}

#[tokio::test]
#[serial]
async fn test_registration_rejects_past_event() {
    let (_db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_past_event(&services.database, leader.id, 5).await;

    let result = services
        .registration_service
        .register(event.id, "Ana", "ana@example.com", false)
        .await;

    assert_matches!(result, Err(EventBuddyError::EventInPast { .. }));
}

#[tokio::test]
#[serial]
async fn test_registration_rejects_full_event() {
    let (db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 1).await;

    services
        .registration_service
        .register(event.id, "A", "a@x.com", false)
        .await
        .expect("First registration should succeed");

    let result = services
        .registration_service
        .register(event.id, "B", "b@x.com", false)
        .await;

    assert_matches!(result, Err(EventBuddyError::CapacityExceeded { capacity: 1, .. }));

    let count = db.count_records("attendees").await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[serial]
async fn test_registration_rejects_duplicate_email() {
    let (db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 5).await;

    services
        .registration_service
        .register(event.id, "Ana", "ana@example.com", false)
        .await
        .expect("First registration should succeed");

    let result = services
        .registration_service
        .register(event.id, "Ana", "ana@example.com", false)
        .await;

    assert_matches!(result, Err(EventBuddyError::AlreadyRegistered { .. }));

    let count = db.count_records("attendees").await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[serial]
async fn test_registration_rejects_invalid_input() {
    let (_db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 5).await;

    let result = services
        .registration_service
        .register(event.id, "", "ana@example.com", false)
        .await;
    assert_matches!(result, Err(EventBuddyError::InvalidInput(_)));

    let result = services
        .registration_service
        .register(event.id, "Ana", "not-an-email", false)
        .await;
    assert_matches!(result, Err(EventBuddyError::InvalidInput(_)));
}

#[tokio::test]
#[serial]
async fn test_concurrent_registrations_respect_capacity() {
    let (db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 1).await;

    let (first, second) = tokio::join!(
        services
            .registration_service
            .register(event.id, "A", "a@x.com", false),
        services
            .registration_service
            .register(event.id, "B", "b@x.com", false),
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one registration may take the last spot");

    let loser = if first.is_ok() { second } else { first };
    assert_matches!(loser, Err(EventBuddyError::CapacityExceeded { .. }));

    let count = db.count_records("attendees").await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[serial]
async fn test_concurrent_duplicate_registrations() {
    let (db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 5).await;

    let (first, second) = tokio::join!(
        services
            .registration_service
            .register(event.id, "Ana", "ana@example.com", false),
        services
            .registration_service
            .register(event.id, "Ana", "ana@example.com", false),
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "the same person may only register once");

    let count = db.count_records("attendees").await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[serial]
async fn test_confirmation_failure_rolls_registration_back() {
    let db = TestDatabase::new().await.expect("Failed to create test database");

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let settings = test_data::test_settings(&db.database_url, Some(&mock_server.uri()));
    let services =
        ServiceFactory::new(db.pool.clone(), settings).expect("Failed to build services");

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 5).await;

    let result = services
        .registration_service
        .register(event.id, "Ana", "ana@example.com", false)
        .await;

    assert_matches!(result, Err(EventBuddyError::NotificationFailed(_)));

    // The half-formed registration must not survive the failed delivery
    let count = db.count_records("attendees").await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[serial]
async fn test_confirmation_delivery_keeps_registration() {
    let db = TestDatabase::new().await.expect("Failed to create test database");

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let settings = test_data::test_settings(&db.database_url, Some(&mock_server.uri()));
    let services =
        ServiceFactory::new(db.pool.clone(), settings).expect("Failed to build services");

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 5).await;

    services
        .registration_service
        .register(event.id, "Ana", "ana@example.com", false)
        .await
        .expect("Registration should succeed when mail delivery succeeds");

    let count = db.count_records("attendees").await.unwrap();
    assert_eq!(count, 1);
}
