mod common;

use axum::http::StatusCode;
use chrono::{Duration, TimeZone, Utc};
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_event_lifecycle() {
    let app = TestApp::new().await;
    let token = app.token().await;

    let start = Utc::now() + Duration::days(10);
    let payload = json!({
        "name": "RustConf",
        "description": "Talks and workshops",
        "start_time": start.to_rfc3339(),
        "end_time": (start + Duration::hours(6)).to_rfc3339(),
        "location": "Portland",
        "max_attendees": 100,
    });

    let response = app.send_json("POST", "/events/", &token, payload).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = parse_body(response).await;
    assert_eq!(created["status"], "scheduled");
    assert_eq!(created["max_attendees"], 100);
    let event_id = created["event_id"].as_i64().unwrap();

    let response = app.get(&format!("/events/{}/", event_id), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["name"], "RustConf");

    let update = json!({ "location": "Seattle", "status": "ongoing", "description": null });
    let response = app.send_json("PUT", &format!("/events/{}/", event_id), &token, update).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_body(response).await;
    assert_eq!(updated["location"], "Seattle");
    assert_eq!(updated["status"], "ongoing");
    assert_eq!(updated["name"], "RustConf");
    assert!(updated["description"].is_null());
}

#[tokio::test]
async fn test_update_unknown_event() {
    let app = TestApp::new().await;
    let token = app.token().await;

    let response = app.send_json("PUT", "/events/777/", &token, json!({ "name": "Nope" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/events/777/", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/events/seven/", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["code"], "bad_request");
}

#[tokio::test]
async fn test_invalid_status_is_rejected() {
    let app = TestApp::new().await;
    let token = app.token().await;

    let start = Utc::now() + Duration::days(1);
    let payload = json!({
        "name": "Bad Status",
        "start_time": start.to_rfc3339(),
        "end_time": (start + Duration::hours(1)).to_rfc3339(),
        "location": "Nowhere",
        "max_attendees": 5,
        "status": "postponed",
    });
    let response = app.send_json("POST", "/events/", &token, payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["error"], "Invalid event status");

    let response = app.get("/events/?status=postponed", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_event_window_and_capacity_validation() {
    let app = TestApp::new().await;
    let token = app.token().await;

    let start = Utc::now() + Duration::days(1);
    let inverted = json!({
        "name": "Backwards",
        "start_time": start.to_rfc3339(),
        "end_time": (start - Duration::hours(1)).to_rfc3339(),
        "location": "Hall",
        "max_attendees": 5,
    });
    let response = app.send_json("POST", "/events/", &token, inverted).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let empty_capacity = json!({
        "name": "Nobody",
        "start_time": start.to_rfc3339(),
        "end_time": (start + Duration::hours(1)).to_rfc3339(),
        "location": "Hall",
        "max_attendees": 0,
    });
    let response = app.send_json("POST", "/events/", &token, empty_capacity).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.send_json("POST", "/events/", &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_past_events_are_completed_on_next_read() {
    let app = TestApp::new().await;
    let token = app.token().await;

    let start = Utc::now() - Duration::days(2);
    let past = app.create_event(&token, "Yesterday's Meetup", start, start + Duration::hours(3), 10).await;
    let future_start = Utc::now() + Duration::days(2);
    let upcoming = app.create_event(&token, "Next Week", future_start, future_start + Duration::hours(3), 10).await;

    let response = app.get("/events/", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let events = parse_body(response).await;
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 2);

    let status_of = |id: i64| events.iter().find(|e| e["event_id"] == id).unwrap()["status"].clone();
    assert_eq!(status_of(past), "completed");
    assert_eq!(status_of(upcoming), "scheduled");

    let response = app.get("/events/?status=completed", &token).await;
    let completed = parse_body(response).await;
    assert_eq!(completed.as_array().unwrap().len(), 1);
    assert_eq!(completed[0]["event_id"], past);
}

#[tokio::test]
async fn test_list_filters() {
    let app = TestApp::new().await;
    let token = app.token().await;

    let january = Utc.with_ymd_and_hms(2030, 1, 10, 9, 0, 0).unwrap();
    let march = Utc.with_ymd_and_hms(2030, 3, 1, 9, 0, 0).unwrap();
    app.create_event(&token, "Winter Summit", january, january + Duration::hours(4), 20).await;
    let spring = app.create_event(&token, "Spring Summit", march, march + Duration::hours(4), 20).await;

    let response = app.get("/events/?date=2030-02-01", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let events = parse_body(response).await;
    assert_eq!(events.as_array().unwrap().len(), 1);
    assert_eq!(events[0]["event_id"], spring);

    let response = app.get("/events/?location=Main%20Hall", &token).await;
    assert_eq!(parse_body(response).await.as_array().unwrap().len(), 2);

    let response = app.get("/events/?location=Elsewhere", &token).await;
    assert!(parse_body(response).await.as_array().unwrap().is_empty());

    let response = app.get("/events/?date=01-02-2030", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["error"], "Invalid date format. Use YYYY-MM-DD.");
}

#[tokio::test]
async fn test_attendee_list_for_unknown_event_is_empty() {
    let app = TestApp::new().await;
    let token = app.token().await;

    let response = app.get("/events/5150/attendees/", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(parse_body(response).await.as_array().unwrap().is_empty());
}
