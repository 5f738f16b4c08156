mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{parse_body, TestApp};
use std::sync::Arc;
use tokio::task::JoinSet;

#[tokio::test]
async fn test_registration_stops_at_capacity() {
    let app = TestApp::new().await;
    let token = app.token().await;

    let start = Utc::now() + Duration::days(7);
    let event_id = app.create_event(&token, "Workshop", start, start + Duration::hours(2), 2).await;

    for i in 0..2 {
        let response = app.register(&token, event_id, &format!("guest{}@example.com", i)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = parse_body(response).await;
        assert_eq!(body["event_id"], event_id);
        assert_eq!(body["check_in_status"], false);
    }

    let response = app.register(&token, event_id, "late@example.com").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(response).await;
    assert_eq!(body["error"], "Event is full");
    assert_eq!(body["code"], "capacity_exceeded");

    let response = app.get(&format!("/events/{}/attendees/", event_id), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let attendees = parse_body(response).await;
    assert_eq!(attendees.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_concurrent_registrations_never_overfill() {
    let app = Arc::new(TestApp::new().await);
    let token = app.token().await;

    let capacity = 5;
    let start = Utc::now() + Duration::days(3);
    let event_id = app.create_event(&token, "Popular Talk", start, start + Duration::hours(1), capacity).await;

    let mut set = JoinSet::new();
    for i in 0..20 {
        let app = app.clone();
        let token = token.clone();
        set.spawn(async move {
            app.register(&token, event_id, &format!("rush{}@example.com", i)).await.status()
        });
    }

    let mut created = 0;
    let mut rejected = 0;
    while let Some(res) = set.join_next().await {
        match res.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::BAD_REQUEST => rejected += 1,
            other => panic!("Unexpected status: {}", other),
        }
    }

    assert_eq!(created, capacity);
    assert_eq!(rejected, 20 - capacity);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attendees WHERE event_id = ?")
        .bind(event_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, capacity as i64);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_across_events() {
    let app = TestApp::new().await;
    let token = app.token().await;

    let start = Utc::now() + Duration::days(1);
    let first = app.create_event(&token, "Morning", start, start + Duration::hours(1), 10).await;
    let second = app.create_event(&token, "Evening", start, start + Duration::hours(1), 10).await;

    let response = app.register(&token, first, "dup@example.com").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.register(&token, first, "dup@example.com").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.register(&token, second, "dup@example.com").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_body(response).await;
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn test_duplicate_email_wins_over_full_event() {
    let app = TestApp::new().await;
    let token = app.token().await;

    let start = Utc::now() + Duration::days(1);
    let event_id = app.create_event(&token, "Tiny", start, start + Duration::hours(1), 1).await;

    assert_eq!(app.register(&token, event_id, "only@example.com").await.status(), StatusCode::CREATED);
    assert_eq!(app.register(&token, event_id, "only@example.com").await.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_registration_for_unknown_event() {
    let app = TestApp::new().await;
    let token = app.token().await;

    let response = app.register(&token, 9999, "ghost@example.com").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registration_rejects_invalid_email() {
    let app = TestApp::new().await;
    let token = app.token().await;

    let start = Utc::now() + Duration::days(1);
    let event_id = app.create_event(&token, "Meetup", start, start + Duration::hours(1), 10).await;

    let response = app.register(&token, event_id, "not-an-email").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
