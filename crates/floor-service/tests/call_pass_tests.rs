//! Integration tests for POST /api/v1/waitlist/{id}/call and /pass.
//!
//! Tests call dispatch including:
//! - Default and custom channels and messages
//! - Per-channel outcomes that never fail the call
//! - The notification log
//! - The pass budget (return to waiting vs removal)

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use floor_service::models::{Channel, DispatchStatus};
use floor_test_utils::{json_request, read_json, TestApp};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

/// Join a waitlist through the API and return the entry id.
async fn join(app: &TestApp, venue_id: Uuid, name: &str, phone: Option<&str>) -> Uuid {
    let token = app.staff_token(Some(venue_id));
    let mut body = json!({
        "venue_id": venue_id,
        "game_type": "nlhe",
        "stakes": "1/2",
        "player_name": name,
    });
    if let Some(phone) = phone {
        body["player_phone"] = json!(phone);
    }

    let response = app
        .router()
        .oneshot(json_request("POST", "/api/v1/waitlist", Some(&token), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = read_json(response).await;
    body["entry"]["entry_id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap()
}

/// Join as a registered player (player token) and return the entry id.
async fn join_as_player(app: &TestApp, venue_id: Uuid, player_id: Uuid) -> Uuid {
    let token = app.player_token(player_id);
    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/v1/waitlist",
            Some(&token),
            Some(json!({
                "venue_id": venue_id,
                "game_type": "nlhe",
                "stakes": "1/2",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = read_json(response).await;
    body["entry"]["entry_id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap()
}

async fn call(app: &TestApp, entry_id: Uuid, body: Option<serde_json::Value>) -> (StatusCode, serde_json::Value) {
    let token = app.staff_token(None);
    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/waitlist/{entry_id}/call"),
            Some(&token),
            body,
        ))
        .await
        .unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

async fn pass(app: &TestApp, entry_id: Uuid, token: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/waitlist/{entry_id}/pass"),
            Some(token),
            None,
        ))
        .await
        .unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

// ----------------------------------------------------------------------
// Call
// ----------------------------------------------------------------------

#[tokio::test]
async fn test_call_transitions_entry_and_dispatches_default_channels() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let entry_id = join(&app, venue_id, "Alice", Some("+15551234567")).await;

    let (status, body) = call(&app, entry_id, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["status"], "called");
    assert_eq!(body["entry"]["call_count"], 1);
    assert_eq!(body["notifications_sent"], 3);

    let outcomes = body["notifications"].as_array().unwrap();
    assert_eq!(outcomes.len(), 3);
    for outcome in outcomes {
        assert_eq!(outcome["status"], "sent");
    }

    // All channels carry the default message with the game type uppercased.
    let sends = app.notifier.sends();
    assert_eq!(sends.len(), 3);
    assert_eq!(
        sends[0].message,
        "Your seat is ready at Lucky Chances for NLHE 1/2. Please check in within 5 minutes."
    );
    assert_eq!(sends[0].channel, Channel::Sms);
    assert_eq!(sends[1].channel, Channel::Push);
    assert_eq!(sends[2].channel, Channel::InApp);

    // Every attempt is persisted to the notification log.
    let log = app.store.notifications();
    assert_eq!(log.len(), 3);
    assert!(log.iter().all(|r| r.entry_id == entry_id));
    assert!(log.iter().all(|r| r.status == DispatchStatus::Sent));
}

#[tokio::test]
async fn test_call_honors_custom_channels_and_message() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let entry_id = join(&app, venue_id, "Alice", None).await;

    let (status, body) = call(
        &app,
        entry_id,
        Some(json!({
            "channels": ["push"],
            "message": "Seat 4 is open, come on down",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notifications_sent"], 1);

    let sends = app.notifier.sends();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].channel, Channel::Push);
    assert_eq!(sends[0].message, "Seat 4 is open, come on down");
}

#[tokio::test]
async fn test_call_skips_sms_when_auto_text_disabled() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Quiet Room", true, false, None);
    let entry_id = join(&app, venue_id, "Alice", Some("+15551234567")).await;

    let (status, body) = call(&app, entry_id, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notifications_sent"], 2);

    let outcomes = body["notifications"].as_array().unwrap();
    assert_eq!(outcomes[0]["channel"], "sms");
    assert_eq!(outcomes[0]["status"], "skipped");
    assert_eq!(outcomes[1]["status"], "sent");
    assert_eq!(outcomes[2]["status"], "sent");

    // The notifier is never invoked for the skipped channel, but the
    // skip still lands in the log.
    assert_eq!(app.notifier.send_count(), 2);
    assert_eq!(app.store.notifications().len(), 3);
}

#[tokio::test]
async fn test_channel_failure_does_not_fail_the_call() {
    let app = TestApp::with_notifier(
        floor_service::services::notifier::mock::MockNotifier::failing_on(&[Channel::Sms]),
    );
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let entry_id = join(&app, venue_id, "Alice", Some("+15551234567")).await;

    let (status, body) = call(&app, entry_id, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["status"], "called");
    assert_eq!(body["notifications_sent"], 2);

    let outcomes = body["notifications"].as_array().unwrap();
    assert_eq!(outcomes[0]["channel"], "sms");
    assert_eq!(outcomes[0]["status"], "failed");
    assert!(outcomes[0]["detail"].as_str().unwrap().contains("sms"));

    let log = app.store.notifications();
    assert_eq!(log[0].status, DispatchStatus::Failed);
}

#[tokio::test]
async fn test_call_on_called_entry_is_conflict() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let entry_id = join(&app, venue_id, "Alice", None).await;

    let (first, _) = call(&app, entry_id, None).await;
    assert_eq!(first, StatusCode::OK);

    let (second, body) = call(&app, entry_id, None).await;
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_call_unknown_entry_is_not_found() {
    let app = TestApp::new();
    app.store.seed_venue("Lucky Chances", true, true, None);

    let (status, body) = call(&app, Uuid::new_v4(), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_call_requires_staff() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let entry_id = join(&app, venue_id, "Alice", None).await;
    let token = app.player_token(Uuid::new_v4());

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/waitlist/{entry_id}/call"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    // No state change and no dispatch happened.
    assert_eq!(app.notifier.send_count(), 0);
    let entry = app.store.entry_snapshot(entry_id).unwrap();
    assert_eq!(entry.call_count, 0);
}

// ----------------------------------------------------------------------
// Pass
// ----------------------------------------------------------------------

#[tokio::test]
async fn test_pass_under_budget_returns_entry_to_waiting() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let entry_id = join(&app, venue_id, "Alice", None).await;
    let staff = app.staff_token(Some(venue_id));

    let (status, _) = call(&app, entry_id, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = pass(&app, entry_id, &staff).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], false);
    assert_eq!(body["entry"]["status"], "waiting");
    assert_eq!(body["entry"]["call_count"], 1);
    // Position is preserved across a pass.
    assert_eq!(body["entry"]["position"], 1);
}

#[tokio::test]
async fn test_pass_at_budget_removes_and_archives() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let entry_id = join(&app, venue_id, "Alice", None).await;
    let staff = app.staff_token(Some(venue_id));

    // Exhaust the pass budget: call and pass three times.
    for expected_removed in [false, false, true] {
        let (status, _) = call(&app, entry_id, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = pass(&app, entry_id, &staff).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed"], expected_removed);
    }

    // The entry is gone and archived as not seated.
    assert!(app.store.entry_snapshot(entry_id).is_none());
    let record = app.store.history_record(entry_id).unwrap();
    assert!(!record.was_seated);

    // A repeat pass finds nothing.
    let (status, body) = pass(&app, entry_id, &staff).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_player_may_pass_own_entry() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let player_id = Uuid::new_v4();
    let entry_id = join_as_player(&app, venue_id, player_id).await;

    let (status, _) = call(&app, entry_id, None).await;
    assert_eq!(status, StatusCode::OK);

    let token = app.player_token(player_id);
    let (status, body) = pass(&app, entry_id, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], false);
}

#[tokio::test]
async fn test_player_may_not_pass_someone_elses_entry() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let entry_id = join_as_player(&app, venue_id, Uuid::new_v4()).await;

    let (status, _) = call(&app, entry_id, None).await;
    assert_eq!(status, StatusCode::OK);

    let token = app.player_token(Uuid::new_v4());
    let (status, body) = pass(&app, entry_id, &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_pass_on_waiting_entry_refreshes_without_removal() {
    // Passing an entry that was never called leaves it waiting.
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let entry_id = join(&app, venue_id, "Alice", None).await;
    let staff = app.staff_token(Some(venue_id));

    let (status, body) = pass(&app, entry_id, &staff).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], false);
    assert_eq!(body["entry"]["status"], "waiting");
}
