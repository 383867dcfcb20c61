//! Event API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_create_list_and_join_event() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;

    let created = app
        .post(
            "/api/events",
            alice.token(),
            json!({
                "title": "Sunday ride",
                "description": "Sierra loop",
                "location": "Madrid",
                "latitude": 40.4168,
                "longitude": -3.7038,
                "category": "ride",
                "date": "2025-06-01",
            }),
        )
        .await;
    assert_status!(created, StatusCode::CREATED);
    let event_id = created.1["id"].as_str().unwrap().to_string();
    assert_eq!(created.1["date"], "2025-06-01T00:00:00Z");

    let listed = app.get("/api/events", None).await;
    assert_status!(listed, StatusCode::OK);
    assert_eq!(listed.1[0]["participants"], json!([]));
    assert_eq!(listed.1[0]["creator"]["username"], "alice");

    let joined = app
        .post_empty(&format!("/api/events/{}/join", event_id), alice.token())
        .await;
    assert_status!(joined, StatusCode::OK);
    assert_eq!(joined.1["message"], "Joined the event successfully");

    let listed = app.get("/api/events", None).await;
    let participants = listed.1[0]["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["id"], alice.id.to_string());
    assert_eq!(participants[0]["username"], "alice");
}

#[tokio::test]
async fn test_create_event_requires_fields_and_token() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;

    let body = json!({ "title": "Sunday ride", "category": "ride" });
    let response = app.post("/api/events", None, body.clone()).await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    let response = app.post("/api/events", alice.token(), body).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(app.store().list_events().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_join_twice_and_leave_without_joining() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;
    let event = create_event(&app, &alice, "Sunday ride", "ride").await;

    let join = format!("/api/events/{}/join", event);
    assert_status!(app.post_empty(&join, bob.token()).await, StatusCode::OK);
    assert_status!(app.post_empty(&join, bob.token()).await, StatusCode::BAD_REQUEST);

    let leave = format!("/api/events/{}/leave", event);
    assert_status!(app.post_empty(&leave, alice.token()).await, StatusCode::BAD_REQUEST);

    let left = app.post_empty(&leave, bob.token()).await;
    assert_status!(left, StatusCode::OK);
    assert_eq!(left.1["event"]["participants"], json!([]));
}

#[tokio::test]
async fn test_like_toggles() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let event = create_event(&app, &alice, "Sunday ride", "ride").await;
    let like = format!("/api/events/{}/like", event);

    let liked = app.post_empty(&like, alice.token()).await;
    assert_status!(liked, StatusCode::OK);
    assert_eq!(liked.1["likes"], json!([alice.id]));

    let unliked = app.post_empty(&like, alice.token()).await;
    assert_eq!(unliked.1["likes"], json!([]));
}

#[tokio::test]
async fn test_comment_uses_token_identity() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;
    let event = create_event(&app, &alice, "Sunday ride", "ride").await;

    let response = app
        .post(
            &format!("/api/events/{}/comment", event),
            bob.token(),
            json!({ "content": "Count me in" }),
        )
        .await;
    assert_status!(response, StatusCode::CREATED);
    assert_eq!(response.1["eventId"], event.to_string());
    let comments = response.1["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["content"], "Count me in");
    assert_eq!(comments[0]["user"]["username"], "bob");
}

#[tokio::test]
async fn test_get_update_and_delete_event() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let event = create_event(&app, &alice, "Sunday ride", "ride").await;
    let uri = format!("/api/events/{}", event);

    let updated = app
        .put(&uri, alice.token(), json!({ "title": "Saturday ride", "description": "" }))
        .await;
    assert_status!(updated, StatusCode::OK);
    assert_eq!(updated.1["title"], "Saturday ride");
    assert_eq!(updated.1["description"], "Coffee stop halfway");

    let fetched = app.get(&uri, None).await;
    assert_status!(fetched, StatusCode::OK);
    assert_eq!(fetched.1["creator"]["username"], "alice");

    let deleted = app.delete(&uri, alice.token()).await;
    assert_status!(deleted, StatusCode::OK);
    assert_message!(deleted, "Event deleted successfully");

    let missing = app.get(&uri, None).await;
    assert_status!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_event_id_is_rejected() {
    let app = TestApp::new();
    let response = app.get("/api/events/not-a-uuid", None).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_filters() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    create_event(&app, &alice, "Sunday ride", "ride").await;
    create_event(&app, &alice, "Track day", "track").await;

    let by_title = app.get("/api/events/title?title=Track%20day", None).await;
    assert_status!(by_title, StatusCode::OK);
    assert_eq!(by_title.1.as_array().unwrap().len(), 1);

    let by_date = app.get("/api/events/date?date=2025-06-01", None).await;
    assert_eq!(by_date.1.as_array().unwrap().len(), 2);

    let by_other_date = app.get("/api/events/date?date=2025-06-02", None).await;
    assert_eq!(by_other_date.1, json!([]));

    let by_location = app.get("/api/events/location?location=Madrid", None).await;
    assert_eq!(by_location.1.as_array().unwrap().len(), 2);

    let by_description = app
        .get("/api/events/description?description=Coffee%20stop%20halfway", None)
        .await;
    assert_eq!(by_description.1.as_array().unwrap().len(), 2);

    let missing = app.get("/api/events/title", None).await;
    assert_status!(missing, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_related_events_share_category() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let first = create_event(&app, &alice, "Sunday ride", "ride").await;
    let second = create_event(&app, &alice, "Night ride", "ride").await;
    create_event(&app, &alice, "Track day", "track").await;

    let related = app.get(&format!("/api/events/{}/related", first), None).await;
    assert_status!(related, StatusCode::OK);
    let related = related.1.as_array().unwrap().clone();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0]["id"], second.to_string());
}

#[tokio::test]
async fn test_events_by_user_requires_token() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    create_event(&app, &alice, "Sunday ride", "ride").await;
    let uri = format!("/api/events/user/{}", alice.id);

    assert_status!(app.get(&uri, None).await, StatusCode::UNAUTHORIZED);
    let response = app.get(&uri, alice.token()).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.1.as_array().unwrap().len(), 1);
}
