//! Community API integration tests
//!
//! CRUD, membership and the community chat.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::*;

async fn create_community(app: &TestApp, owner: &TestUser, name: &str) -> Value {
    let response = app
        .post(
            "/api/communities",
            owner.token(),
            json!({ "name": name, "description": "Weekend group rides" }),
        )
        .await;
    assert_status!(response, StatusCode::CREATED);
    response.1
}

fn id_of(value: &Value) -> Uuid {
    value["id"].as_str().and_then(|id| id.parse().ok()).expect("id")
}

#[tokio::test]
async fn test_creator_is_first_member() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;

    let community = create_community(&app, &alice, "Sierra Riders").await;
    assert_eq!(community["creator"], alice.id.to_string());
    assert_eq!(community["members"], json!([alice.id]));

    let chat_id = app
        .get(&format!("/api/communities/{}/chatId", id_of(&community)), None)
        .await;
    assert_status!(chat_id, StatusCode::OK);
    assert_eq!(chat_id.1, community["chatId"]);
}

#[tokio::test]
async fn test_join_twice_does_not_duplicate() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;
    let community = id_of(&create_community(&app, &alice, "Sierra Riders").await);
    let request = json!({ "communityId": community });

    let first = app.post("/api/communities/join", bob.token(), request.clone()).await;
    assert_status!(first, StatusCode::OK);
    assert_eq!(first.1["message"], "User joined successfully");

    let second = app.post("/api/communities/join", bob.token(), request.clone()).await;
    assert_status!(second, StatusCode::OK);
    assert_eq!(second.1["message"], "User already a member");
    assert_eq!(second.1["community"]["members"], json!([alice.id, bob.id]));

    let left = app.post("/api/communities/leave", bob.token(), request.clone()).await;
    assert_status!(left, StatusCode::OK);
    assert_eq!(left.1["members"], json!([alice.id]));

    let again = app.post("/api/communities/leave", bob.token(), request).await;
    assert_status!(again, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_name_is_rejected() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    create_community(&app, &alice, "Sierra Riders").await;

    let response = app
        .post(
            "/api/communities",
            alice.token(),
            json!({ "name": "Sierra Riders", "description": "Again" }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);

    let missing = app
        .post("/api/communities", alice.token(), json!({ "name": "Only a name" }))
        .await;
    assert_status!(missing, StatusCode::BAD_REQUEST);
    assert_message!(missing, "Missing required fields");
}

#[tokio::test]
async fn test_chat_messages_in_order() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;
    let community = id_of(&create_community(&app, &alice, "Sierra Riders").await);

    for (user, content) in [(&alice, "Who is in for Sunday?"), (&bob, "Me!")] {
        let sent = app
            .post(
                "/api/communities/messages",
                user.token(),
                json!({ "communityId": community, "content": content }),
            )
            .await;
        assert_status!(sent, StatusCode::OK);
        assert_eq!(sent.1["sender"], user.id.to_string());
    }

    let blank = app
        .post(
            "/api/communities/messages",
            bob.token(),
            json!({ "communityId": community, "content": "" }),
        )
        .await;
    assert_status!(blank, StatusCode::BAD_REQUEST);

    let messages = app
        .get(&format!("/api/communities/{}/messages", community), None)
        .await;
    assert_status!(messages, StatusCode::OK);
    let contents: Vec<&str> = messages
        .1
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|message| message["content"].as_str())
        .collect();
    assert_eq!(contents, vec!["Who is in for Sunday?", "Me!"]);

    let detail = app.get(&format!("/api/communities/{}", community), None).await;
    assert_eq!(detail.1["chat"]["messages"].as_array().unwrap().len(), 2);
    assert_eq!(detail.1["members"][0]["username"], "alice");
}

#[tokio::test]
async fn test_member_and_creator_listings() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;
    let sierra = id_of(&create_community(&app, &alice, "Sierra Riders").await);
    create_community(&app, &bob, "Coast Cruisers").await;
    app.post("/api/communities/join", bob.token(), json!({ "communityId": sierra }))
        .await;

    let member_of = app.get("/api/communities/user", bob.token()).await;
    assert_status!(member_of, StatusCode::OK);
    assert_eq!(member_of.1.as_array().unwrap().len(), 2);

    let created = app.get("/api/communities/user/created", bob.token()).await;
    assert_eq!(created.1.as_array().unwrap().len(), 1);
    assert_eq!(created.1[0]["name"], "Coast Cruisers");

    let by_alice = app
        .get(&format!("/api/communities/user/{}", alice.id), None)
        .await;
    assert_eq!(by_alice.1[0]["name"], "Sierra Riders");

    let members = app
        .get(&format!("/api/communities/{}/members", sierra), None)
        .await;
    let names: Vec<&str> = members
        .1
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|user| user["username"].as_str())
        .collect();
    assert_eq!(names, vec!["alice", "bob"]);

    let listed = app.get("/api/communities", None).await;
    assert_eq!(listed.1.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_and_delete_community() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let community = id_of(&create_community(&app, &alice, "Sierra Riders").await);
    let uri = format!("/api/communities/{}", community);

    let updated = app
        .put(
            &uri,
            alice.token(),
            json!({ "name": "Sierra Riders Club", "description": "Now with a club house" }),
        )
        .await;
    assert_status!(updated, StatusCode::OK);
    assert_eq!(updated.1["name"], "Sierra Riders Club");

    let deleted = app.delete(&uri, alice.token()).await;
    assert_status!(deleted, StatusCode::OK);
    assert_message!(deleted, "Community deleted successfully");

    assert_status!(app.get(&uri, None).await, StatusCode::NOT_FOUND);
    let chat = app.get(&format!("{}/messages", uri), None).await;
    assert_status!(chat, StatusCode::NOT_FOUND);
    assert_message!(chat, "Chat not found");
}

#[tokio::test]
async fn test_rejected_community_keeps_no_upload() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    create_community(&app, &alice, "Sierra Riders").await;

    let duplicate = app
        .multipart(
            axum::http::Method::POST,
            "/api/communities",
            alice.token(),
            &[("name", "Sierra Riders"), ("description", "Again")],
            TestFile {
                field: "media",
                file_name: "logo.png",
                content: "pixels",
            },
        )
        .await;
    assert_status!(duplicate, StatusCode::BAD_REQUEST);
    assert!(app.uploaded_files().is_empty());
}
