//! User API integration tests
//!
//! Directory lookups, profiles and the follow graph.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_follow_then_unfollow_restores_both_sets() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;

    let followed = app
        .post_empty(&format!("/api/users/follow/{}", bob.id), alice.token())
        .await;
    assert_status!(followed, StatusCode::OK);
    assert_message!(followed, "You are now following this user");

    let alice_record = app.store().user_by_id(alice.id).await.unwrap().unwrap();
    let bob_record = app.store().user_by_id(bob.id).await.unwrap().unwrap();
    assert_eq!(alice_record.following, vec![bob.id]);
    assert_eq!(bob_record.followers, vec![alice.id]);

    let unfollowed = app
        .post_empty(&format!("/api/users/unfollow/{}", bob.id), alice.token())
        .await;
    assert_status!(unfollowed, StatusCode::OK);

    let alice_record = app.store().user_by_id(alice.id).await.unwrap().unwrap();
    let bob_record = app.store().user_by_id(bob.id).await.unwrap().unwrap();
    assert!(alice_record.following.is_empty());
    assert!(bob_record.followers.is_empty());
}

#[tokio::test]
async fn test_follow_errors() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;

    let own = app
        .post_empty(&format!("/api/users/follow/{}", alice.id), alice.token())
        .await;
    assert_status!(own, StatusCode::BAD_REQUEST);

    let follow = format!("/api/users/follow/{}", bob.id);
    assert_status!(app.post_empty(&follow, alice.token()).await, StatusCode::OK);
    assert_status!(app.post_empty(&follow, alice.token()).await, StatusCode::BAD_REQUEST);

    let unknown = app
        .post_empty(
            &format!("/api/users/follow/{}", uuid::Uuid::new_v4()),
            alice.token(),
        )
        .await;
    assert_status!(unknown, StatusCode::NOT_FOUND);

    let not_following = app
        .post_empty(&format!("/api/users/unfollow/{}", alice.id), bob.token())
        .await;
    assert_status!(not_following, StatusCode::BAD_REQUEST);

    let anonymous = app.post_empty(&follow, None).await;
    assert_status!(anonymous, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_by_username() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;
    create_post(&app, &alice, "touring").await;
    app.post_empty(&format!("/api/users/follow/{}", alice.id), bob.token())
        .await;

    let anonymous = app.get("/api/users/profile/alice", None).await;
    assert_status!(anonymous, StatusCode::OK);
    assert_eq!(anonymous.1["followersCount"], 1);
    assert_eq!(anonymous.1["followers"][0]["username"], "bob");
    assert_eq!(anonymous.1["posts"].as_array().unwrap().len(), 1);
    assert!(anonymous.1.get("isFollowing").is_none());
    assert!(anonymous.1.get("email").is_none());

    let as_bob = app.get("/api/users/profile/alice", bob.token()).await;
    assert_eq!(as_bob.1["isFollowing"], true);

    let as_alice = app.get("/api/users/profile/alice", alice.token()).await;
    assert_eq!(as_alice.1["isFollowing"], false);

    let missing = app.get("/api/users/profile/carol", None).await;
    assert_status!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_by_id() {
    let app = TestApp::new();
    let alice = sign_up(&app, "alice").await;

    let found = app.get(&format!("/api/users/{}", alice.id), None).await;
    assert_status!(found, StatusCode::OK);
    assert_eq!(found.1["username"], "alice");

    let missing = app
        .get(&format!("/api/users/{}", uuid::Uuid::new_v4()), None)
        .await;
    assert_status!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_users() {
    let app = TestApp::new();
    register(&app, "alice").await;
    register(&app, "malika").await;
    register(&app, "bob").await;

    let found = app.get("/api/users/search/ALI", None).await;
    assert_status!(found, StatusCode::OK);
    let names: Vec<&str> = found
        .1
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|user| user["username"].as_str())
        .collect();
    assert_eq!(names, vec!["alice", "malika"]);

    let none = app.get("/api/users/search/zed", None).await;
    assert_status!(none, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users_hides_password() {
    let app = TestApp::new();
    register(&app, "alice").await;

    let response = app.get("/api/users", None).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.1.as_array().unwrap().len(), 1);
    assert_eq!(response.1[0].get("passwordHash"), None);
    assert_eq!(response.1[0]["followers"], json!([]));
}
