//! Authentication API integration tests
//!
//! Registration, login, token handling and account management under
//! `/api/auth`.

use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use ridehub::backend::auth::{AuthConfig, TokenKeys};
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_register_returns_user_without_password() {
    let app = TestApp::new();
    let response = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": TEST_PASSWORD,
                "fullName": "Alice Rider",
            }),
        )
        .await;

    assert_status!(response, StatusCode::CREATED);
    let (_, body) = response;
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_requires_every_field() {
    let app = TestApp::new();
    let response = app
        .post(
            "/api/auth/register",
            None,
            json!({ "username": "alice", "email": "alice@example.com", "password": "  " }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::new();
    register(&app, "alice").await;

    let response = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "username": "alice",
                "email": "other@example.com",
                "password": TEST_PASSWORD,
                "fullName": "Another Alice",
            }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_email_or_username() {
    let app = TestApp::new();
    let id = register(&app, "alice").await;

    for identifier in ["alice", "alice@example.com"] {
        let token = login(&app, identifier).await;
        let response = app.get("/api/auth/verify", Some(&token)).await;
        assert_status!(response, StatusCode::OK);
        assert_eq!(response.1["id"], id.to_string());
    }
}

#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new();
    register(&app, "alice").await;

    let unknown = app
        .post(
            "/api/auth/login",
            None,
            json!({ "emailOrUsername": "bob", "password": TEST_PASSWORD }),
        )
        .await;
    assert_status!(unknown, StatusCode::BAD_REQUEST);
    assert_message!(unknown, "User not found");

    let wrong = app
        .post(
            "/api/auth/login",
            None,
            json!({ "emailOrUsername": "alice", "password": "wrong password" }),
        )
        .await;
    assert_status!(wrong, StatusCode::BAD_REQUEST);
    assert_message!(wrong, "Incorrect password");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new();
    let response = app.get("/api/auth/profile", None).await;
    assert_status!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_is_bad_request() {
    let app = TestApp::new();
    let response = app.get("/api/auth/profile", Some("not-a-token")).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;

    let foreign = TokenKeys::new(&AuthConfig {
        secret: "another-secret".to_string(),
        ttl: Duration::from_secs(3600),
    })
    .issue(alice.id)
    .unwrap();

    let response = app.get("/api/auth/verify", Some(&foreign)).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_token_of_deleted_user_is_unauthorized() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;

    let deleted = app
        .delete(&format!("/api/auth/profile/{}", alice.id), alice.token())
        .await;
    assert_status!(deleted, StatusCode::OK);

    let response = app.get("/api/auth/profile", alice.token()).await;
    assert_status!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_profile() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;

    let response = app
        .put(
            "/api/auth/profile",
            alice.token(),
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "fullName": "Alice Rider",
                "bio": "Weekend tourer",
                "bikeDetails": {
                    "brand": "Honda",
                    "model": "Africa Twin",
                    "year": "2021",
                    "licensePlate": "1234ABC",
                },
            }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.1["user"]["bio"], "Weekend tourer");
    assert_eq!(response.1["user"]["bikeDetails"]["model"], "Africa Twin");
}

#[tokio::test]
async fn test_profile_conflict_discards_photo() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    sign_up(&app, "bob").await;
    let photo = TestFile {
        field: "photo",
        file_name: "me.jpg",
        content: "face",
    };

    let taken = app
        .multipart(
            axum::http::Method::PUT,
            "/api/auth/profile",
            alice.token(),
            &[
                ("username", "bob"),
                ("email", "alice@example.com"),
                ("fullName", "alice Rider"),
            ],
            photo,
        )
        .await;
    assert_status!(taken, StatusCode::BAD_REQUEST);
    assert!(app.uploaded_files().is_empty());

    let saved = app
        .multipart(
            axum::http::Method::PUT,
            "/api/auth/profile",
            alice.token(),
            &[
                ("username", "alice"),
                ("email", "alice@example.com"),
                ("fullName", "alice Rider"),
            ],
            photo,
        )
        .await;
    assert_status!(saved, StatusCode::OK);
    let url = saved.1["user"]["photo"].as_str().unwrap();
    assert_eq!(app.uploaded_files(), vec![url.trim_start_matches("/uploads/").to_string()]);
}

#[tokio::test]
async fn test_update_profile_rejects_incomplete_bike() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;

    let response = app
        .put(
            "/api/auth/profile",
            alice.token(),
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "fullName": "Alice Rider",
                "bikeDetails": { "brand": "Honda", "model": "", "year": "", "licensePlate": "" },
            }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_message!(response, "Missing bike details");

    let response = app
        .put("/api/auth/profile", alice.token(), json!({ "username": "alice" }))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_message!(response, "Missing required fields");
}

/// App whose `root` account registers as an admin
fn app_with_admin() -> TestApp {
    TestApp::with_config(|builder| builder.admin_emails(["Root@Example.com"]))
}

#[tokio::test]
async fn test_admin_email_registers_as_admin() {
    let app = app_with_admin();

    let root = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "username": "root",
                "email": "root@example.com",
                "password": TEST_PASSWORD,
                "fullName": "Root Rider",
            }),
        )
        .await;
    assert_status!(root, StatusCode::CREATED);
    assert_eq!(root.1["user"]["role"], "admin");

    let alice = sign_up(&app, "alice").await;
    let profile = app.get("/api/auth/profile", alice.token()).await;
    assert_eq!(profile.1["role"], "user");
}

#[tokio::test]
async fn test_update_role_requires_admin() {
    let app = app_with_admin();
    let root = sign_up(&app, "root").await;
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;

    let response = app
        .put(
            "/api/auth/profile/role",
            alice.token(),
            json!({ "userId": alice.id, "role": "admin" }),
        )
        .await;
    assert_status!(response, StatusCode::UNAUTHORIZED);
    assert_message!(response, "Only admins can change roles");

    let response = app
        .put(
            "/api/auth/profile/role",
            root.token(),
            json!({ "userId": alice.id, "role": "admin" }),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.1["user"]["role"], "admin");

    // Promoted through the API, alice can now grant roles herself
    let response = app
        .put(
            "/api/auth/profile/role",
            alice.token(),
            json!({ "userId": bob.id, "role": "admin" }),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    let response = app
        .put(
            "/api/auth/profile/role",
            alice.token(),
            json!({ "userId": bob.id, "role": "user" }),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.1["user"]["role"], "user");
}

#[tokio::test]
async fn test_update_role_rejects_unknown_role() {
    let app = app_with_admin();
    let root = sign_up(&app, "root").await;
    let bob = sign_up(&app, "bob").await;

    let response = app
        .put(
            "/api/auth/profile/role",
            root.token(),
            json!({ "userId": bob.id, "role": "admn" }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_message!(response, "role must be one of user, admin");

    let profile = app.get("/api/auth/profile", bob.token()).await;
    assert_eq!(profile.1["role"], "user");

    let missing = app
        .put(
            "/api/auth/profile/role",
            root.token(),
            json!({ "userId": uuid::Uuid::new_v4(), "role": "admin" }),
        )
        .await;
    assert_status!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_account_only_self_or_admin() {
    let app = app_with_admin();
    let root = sign_up(&app, "root").await;
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;

    let response = app
        .delete(&format!("/api/auth/profile/{}", bob.id), alice.token())
        .await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    let response = app
        .delete(&format!("/api/auth/profile/{}", bob.id), root.token())
        .await;
    assert_status!(response, StatusCode::OK);
    assert!(app.store().user_by_id(bob.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_account_cascades() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;

    create_event(&app, &alice, "Sunday ride", "ride").await;
    create_post(&app, &alice, "touring").await;
    let bob_event = create_event(&app, &bob, "Track day", "track").await;
    app.post_empty(&format!("/api/events/{}/join", bob_event), alice.token())
        .await;
    app.post_empty(&format!("/api/users/follow/{}", bob.id), alice.token())
        .await;
    let conversation = app
        .post(
            "/api/messages/conversations",
            alice.token(),
            json!({ "senderId": alice.id, "receiverId": bob.id }),
        )
        .await;
    app.post(
        "/api/messages",
        alice.token(),
        json!({
            "conversationId": conversation.1["id"],
            "sender": alice.id,
            "receiver": bob.id,
            "content": "See you Sunday",
        }),
    )
    .await;

    let response = app
        .delete(&format!("/api/auth/profile/{}", alice.id), alice.token())
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(
        response.1["deleted"],
        json!({ "events": 1, "posts": 1, "communities": 0, "conversations": 1, "messages": 1 })
    );

    let event = app.store().event_by_id(bob_event).await.unwrap().unwrap();
    assert!(event.participants.is_empty());
    let bob_record = app.store().user_by_id(bob.id).await.unwrap().unwrap();
    assert!(bob_record.followers.is_empty());
}

#[tokio::test]
async fn test_list_users() {
    let app = TestApp::new();
    register(&app, "alice").await;
    register(&app, "bob").await;

    let response = app.get("/api/auth/users", None).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.1.as_array().map(Vec::len), Some(2));
}
