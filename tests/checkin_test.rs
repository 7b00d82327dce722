//! Check-in workflow integration tests
//!
//! Exercises door authorization, token validation, the idempotent re-scan
//! branch, and the defenses against foreign or forged tickets.

mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;

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
async fn test_check_in_happy_path_and_idempotent_rescan() {
    let (_db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 2).await;

    let outcome = services
        .registration_service
        .register(event.id, "Ana", "ana@example.com", false)
        .await
        .expect("Registration should succeed");

    let first = services
        .checkin_service
        .check_in(event.id, &outcome.ticket_token, leader.id)
        .await
        .expect("First scan should succeed");

    assert!(!first.already_checked_in);
    assert_eq!(first.attendee_id, outcome.attendee_id);

    let second = services
        .checkin_service
        .check_in(event.id, &outcome.ticket_token, leader.id)
        .await
        .expect("Repeated scan should succeed");

    assert!(second.already_checked_in);
    assert_eq!(second.checked_in_at, first.checked_in_at);
    assert_eq!(second.attendee_id, first.attendee_id);
}

#[tokio::test]
#[serial]
async fn test_check_in_rejects_unauthorized_actor() {
    let (_db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let stranger = test_data::create_person(&services.database, "attendee").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 2).await;

    let outcome = services
        .registration_service
        .register(event.id, "Ana", "ana@example.com", false)
        .await
        .expect("Registration should succeed");

    let result = services
        .checkin_service
        .check_in(event.id, &outcome.ticket_token, stranger.id)
        .await;

    assert_matches!(result, Err(EventBuddyError::PermissionDenied(_)));
}

#[tokio::test]
#[serial]
async fn test_collaborator_can_check_in() {
    let (_db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let door_staff = test_data::create_person(&services.database, "attendee").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 2).await;

    services
        .event_service
        .add_collaborator(leader.id, event.id, door_staff.id)
        .await
        .expect("Leader should be able to grant door rights");

    let outcome = services
        .registration_service
        .register(event.id, "Ana", "ana@example.com", false)
        .await
        .expect("Registration should succeed");

    let scan = services
        .checkin_service
        .check_in(event.id, &outcome.ticket_token, door_staff.id)
        .await
        .expect("Collaborator scan should succeed");

    assert!(!scan.already_checked_in);
}

#[tokio::test]
#[serial]
async fn test_admin_can_check_in_any_event() {
    let (_db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let admin = test_data::create_person(&services.database, "admin").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 2).await;

    let outcome = services
        .registration_service
        .register(event.id, "Ana", "ana@example.com", false)
        .await
        .expect("Registration should succeed");

    let scan = services
        .checkin_service
        .check_in(event.id, &outcome.ticket_token, admin.id)
        .await
        .expect("Admin scan should succeed");

    assert!(!scan.already_checked_in);
}

#[tokio::test]
#[serial]
async fn test_check_in_rejects_malformed_tokens() {
    let (db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 2).await;

    for token in ["", "justone", "two-segments", "a-b-c-d", "1--abc", "abc-def-ghi"] {
        let result = services
            .checkin_service
            .check_in(event.id, token, leader.id)
            .await;
        assert_matches!(result, Err(EventBuddyError::MalformedToken));
    }

    // No scan attempt may have written anything
    let count = db.count_records("attendees").await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[serial]
async fn test_check_in_rejects_foreign_event_ticket() {
    let (_db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event_a = test_data::create_published_event(&services.database, None, leader.id, 2).await;
    let event_b = test_data::create_published_event(&services.database, None, leader.id, 2).await;

    let outcome = services
        .registration_service
        .register(event_a.id, "Ana", "ana@example.com", false)
        .await
        .expect("Registration should succeed");

    let result = services
        .checkin_service
        .check_in(event_b.id, &outcome.ticket_token, leader.id)
        .await;

    assert_matches!(
        result,
        Err(EventBuddyError::TokenEventMismatch { token_event_id, .. }) if token_event_id == event_a.id
    );
}

#[tokio::test]
#[serial]
async fn test_check_in_rejects_unknown_ticket() {
    let (_db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 2).await;

    // Well-formed, event id matches the door, but nobody holds this ticket
    let forged = format!("999999-{}-deadbeefdeadbeef", event.id);
    let result = services
        .checkin_service
        .check_in(event.id, &forged, leader.id)
        .await;

    assert_matches!(result, Err(EventBuddyError::TicketNotFound));
}

#[tokio::test]
#[serial]
async fn test_check_in_flag_set_exactly_once() {
    let (_db, services) = setup().await;

    let leader = test_data::create_person(&services.database, "leader").await;
    let event = test_data::create_published_event(&services.database, None, leader.id, 2).await;

    let outcome = services
        .registration_service
        .register(event.id, "Ana", "ana@example.com", false)
        .await
        .expect("Registration should succeed");

    let first = services
        .checkin_service
        .check_in(event.id, &outcome.ticket_token, leader.id)
        .await
        .expect("First scan should succeed");

    services
        .checkin_service
        .check_in(event.id, &outcome.ticket_token, leader.id)
        .await
        .expect("Repeated scan should succeed");

    let stored = services
        .database
        .attendees
        .find_by_token(&outcome.ticket_token)
        .await
        .expect("Lookup should succeed")
        .expect("Registration should exist");

    assert!(stored.checked_in);
    assert_eq!(stored.checked_in_at, Some(first.checked_in_at));
}
