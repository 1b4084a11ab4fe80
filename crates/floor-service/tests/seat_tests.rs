//! Integration tests for POST /api/v1/waitlist/{id}/seat.
//!
//! Tests seat allocation including:
//! - Seat occupancy, game player count, and history side effects
//! - Seat exclusivity conflicts
//! - Game and seat existence and seatability checks

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;
use floor_service::models::{GameStatus, SeatStatus};
use floor_test_utils::{json_request, read_json, TestApp};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

async fn join(app: &TestApp, venue_id: Uuid, name: &str) -> Uuid {
    let token = app.staff_token(Some(venue_id));
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
                "player_name": name,
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

async fn seat(
    app: &TestApp,
    entry_id: Uuid,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let token = app.staff_token(None);
    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/waitlist/{entry_id}/seat"),
            Some(&token),
            Some(body),
        ))
        .await
        .unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

async fn call(app: &TestApp, entry_id: Uuid) {
    let token = app.staff_token(None);
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
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_seat_called_entry_occupies_seat() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let game_id = app
        .store
        .seed_game(venue_id, "nlhe", "1/2", GameStatus::Running, 7, 9);
    let entry_id = join(&app, venue_id, "Alice").await;
    call(&app, entry_id).await;

    let (status, body) = seat(
        &app,
        entry_id,
        json!({ "game_id": game_id, "seat_number": 4, "buyin_amount": 300 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["status"], "seated");
    assert_eq!(body["seat_number"], 4);
    assert!(body["wait_time_minutes"].as_i64().unwrap() >= 0);

    let seat = app.store.seat(game_id, 4).unwrap();
    assert_eq!(seat.status, SeatStatus::Occupied);
    assert_eq!(seat.occupant_name.as_deref(), Some("Alice"));
    assert_eq!(seat.buyin_amount, Some(300));

    let game = app.store.game_snapshot(game_id).unwrap();
    assert_eq!(game.player_count, 8);

    let record = app.store.history_record(entry_id).unwrap();
    assert!(record.was_seated);
}

#[tokio::test]
async fn test_seat_waiting_entry_without_call() {
    // Seating straight from `waiting` is allowed for walk-ins the floor
    // seats directly.
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let game_id = app
        .store
        .seed_game(venue_id, "nlhe", "1/2", GameStatus::Running, 7, 9);
    let entry_id = join(&app, venue_id, "Alice").await;

    let (status, body) = seat(
        &app,
        entry_id,
        json!({ "game_id": game_id, "seat_number": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["status"], "seated");
}

#[tokio::test]
async fn test_seat_occupied_is_conflict() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let game_id = app
        .store
        .seed_game(venue_id, "nlhe", "1/2", GameStatus::Running, 7, 9);
    let first = join(&app, venue_id, "Alice").await;
    let second = join(&app, venue_id, "Bob").await;

    let (status, _) = seat(&app, first, json!({ "game_id": game_id, "seat_number": 4 })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = seat(&app, second, json!({ "game_id": game_id, "seat_number": 4 })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "SEAT_TAKEN");

    // The loser's entry is untouched.
    let entry = app.store.entry_snapshot(second).unwrap();
    assert!(entry.status.is_active());
}

#[tokio::test]
async fn test_seat_unknown_seat_is_not_found() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let game_id = app
        .store
        .seed_game(venue_id, "nlhe", "1/2", GameStatus::Running, 7, 9);
    let entry_id = join(&app, venue_id, "Alice").await;

    let (status, body) = seat(
        &app,
        entry_id,
        json!({ "game_id": game_id, "seat_number": 42 }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Seat not found");
}

#[tokio::test]
async fn test_seat_in_closed_game_is_conflict() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let game_id = app
        .store
        .seed_game(venue_id, "nlhe", "1/2", GameStatus::Closed, 0, 9);
    let entry_id = join(&app, venue_id, "Alice").await;

    let (status, body) = seat(
        &app,
        entry_id,
        json!({ "game_id": game_id, "seat_number": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "GAME_CLOSED");
}

#[tokio::test]
async fn test_seat_unknown_game_is_not_found() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let entry_id = join(&app, venue_id, "Alice").await;

    let (status, body) = seat(
        &app,
        entry_id,
        json!({ "game_id": Uuid::new_v4(), "seat_number": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Game not found");
}

#[tokio::test]
async fn test_seat_already_seated_entry_is_conflict() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let game_id = app
        .store
        .seed_game(venue_id, "nlhe", "1/2", GameStatus::Running, 7, 9);
    let entry_id = join(&app, venue_id, "Alice").await;

    let (status, _) = seat(&app, entry_id, json!({ "game_id": game_id, "seat_number": 1 })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = seat(&app, entry_id, json!({ "game_id": game_id, "seat_number": 2 })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_seat_rejects_invalid_seat_number() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let game_id = app
        .store
        .seed_game(venue_id, "nlhe", "1/2", GameStatus::Running, 7, 9);
    let entry_id = join(&app, venue_id, "Alice").await;

    let (status, body) = seat(
        &app,
        entry_id,
        json!({ "game_id": game_id, "seat_number": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MISSING_FIELDS");
}

#[tokio::test]
async fn test_seat_rejects_negative_buyin() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let game_id = app
        .store
        .seed_game(venue_id, "nlhe", "1/2", GameStatus::Running, 7, 9);
    let entry_id = join(&app, venue_id, "Alice").await;

    let (status, _) = seat(
        &app,
        entry_id,
        json!({ "game_id": game_id, "seat_number": 1, "buyin_amount": -50 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_seat_requires_staff() {
    let app = TestApp::new();
    let venue_id = app.store.seed_venue("Lucky Chances", true, true, None);
    let game_id = app
        .store
        .seed_game(venue_id, "nlhe", "1/2", GameStatus::Running, 7, 9);
    let entry_id = join(&app, venue_id, "Alice").await;
    let token = app.player_token(Uuid::new_v4());

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/waitlist/{entry_id}/seat"),
            Some(&token),
            Some(json!({ "game_id": game_id, "seat_number": 1 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let seat = app.store.seat(game_id, 1).unwrap();
    assert_eq!(seat.status, SeatStatus::Empty);
}
