//! Direct messaging API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::*;

async fn open_conversation(app: &TestApp, caller: &TestUser, sender: &TestUser, receiver: &TestUser) -> TestResponse {
    app.post(
        "/api/messages/conversations",
        caller.token(),
        json!({ "senderId": sender.id, "receiverId": receiver.id }),
    )
    .await
}

#[tokio::test]
async fn test_conversation_is_shared_by_both_orders() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;

    let first = open_conversation(&app, &alice, &alice, &bob).await;
    assert_status!(first, StatusCode::OK);
    let second = open_conversation(&app, &bob, &bob, &alice).await;
    assert_status!(second, StatusCode::OK);

    assert_eq!(first.1, second.1);
    let participants = first.1["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 2);
    assert!(participants.contains(&json!(alice.id)));
    assert!(participants.contains(&json!(bob.id)));
}

#[tokio::test]
async fn test_conversation_rules() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;
    let carol = sign_up(&app, "carol").await;

    let with_self = open_conversation(&app, &alice, &alice, &alice).await;
    assert_status!(with_self, StatusCode::BAD_REQUEST);

    let for_others = open_conversation(&app, &carol, &alice, &bob).await;
    assert_status!(for_others, StatusCode::UNAUTHORIZED);

    let response = app
        .post(
            "/api/messages/conversations",
            alice.token(),
            json!({ "senderId": alice.id, "receiverId": uuid::Uuid::new_v4() }),
        )
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_send_and_list_messages() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;
    let conversation = open_conversation(&app, &alice, &alice, &bob).await.1;
    let conversation_id = conversation["id"].clone();

    let send = |sender: &TestUser, receiver: &TestUser, content: &str| -> Value {
        json!({
            "conversationId": conversation_id,
            "sender": sender.id,
            "receiver": receiver.id,
            "content": content,
        })
    };

    let first = app
        .post("/api/messages", alice.token(), send(&alice, &bob, "Ride on Sunday?"))
        .await;
    assert_status!(first, StatusCode::CREATED);
    let reply = app
        .post("/api/messages", bob.token(), send(&bob, &alice, "Sure"))
        .await;
    assert_status!(reply, StatusCode::CREATED);

    let spoofed = app
        .post("/api/messages", alice.token(), send(&bob, &alice, "Not me"))
        .await;
    assert_status!(spoofed, StatusCode::UNAUTHORIZED);

    let empty = app
        .post("/api/messages", alice.token(), send(&alice, &bob, " "))
        .await;
    assert_status!(empty, StatusCode::BAD_REQUEST);

    let listed = app
        .get(&format!("/api/messages/{}", conversation_id.as_str().unwrap()), None)
        .await;
    assert_status!(listed, StatusCode::OK);
    let contents: Vec<&str> = listed
        .1
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|message| message["content"].as_str())
        .collect();
    assert_eq!(contents, vec!["Ride on Sunday?", "Sure"]);
}

#[tokio::test]
async fn test_message_to_missing_conversation() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;
    let missing = uuid::Uuid::new_v4();

    let sent = app
        .post(
            "/api/messages",
            alice.token(),
            json!({
                "conversationId": missing,
                "sender": alice.id,
                "receiver": bob.id,
                "content": "Hello?",
            }),
        )
        .await;
    assert_status!(sent, StatusCode::NOT_FOUND);

    let listed = app.get(&format!("/api/messages/{}", missing), None).await;
    assert_status!(listed, StatusCode::NOT_FOUND);
    assert_message!(listed, "Conversation not found");
}

#[tokio::test]
async fn test_conversation_lookups() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;
    let carol = sign_up(&app, "carol").await;
    let with_bob = open_conversation(&app, &alice, &alice, &bob).await.1;
    open_conversation(&app, &carol, &carol, &alice).await;
    open_conversation(&app, &bob, &bob, &alice).await;

    let fetched = app
        .get(
            &format!("/api/messages/conversation/{}", with_bob["id"].as_str().unwrap()),
            None,
        )
        .await;
    assert_status!(fetched, StatusCode::OK);
    assert_eq!(fetched.1, with_bob);

    let partners = app
        .get(&format!("/api/messages/conversations/{}", alice.id), None)
        .await;
    assert_status!(partners, StatusCode::OK);
    let mut names: Vec<&str> = partners
        .1
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|user| user["username"].as_str())
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["bob", "carol"]);
    assert!(partners.1[0].get("passwordHash").is_none());

    let missing = app
        .get(&format!("/api/messages/conversation/{}", uuid::Uuid::new_v4()), None)
        .await;
    assert_status!(missing, StatusCode::NOT_FOUND);
}
