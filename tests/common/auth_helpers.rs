//! Authentication test helpers
//!
//! Accounts are created through the public endpoints so the tests exercise
//! the same path as a client.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use super::app::TestApp;

pub const TEST_PASSWORD: &str = "correct horse battery";

/// Registered and logged-in user
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

impl TestUser {
    pub fn token(&self) -> Option<&str> {
        Some(&self.token)
    }
}

/// Register `username` with a derived email and full name
pub async fn register(app: &TestApp, username: &str) -> Uuid {
    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": TEST_PASSWORD,
                "fullName": format!("{} Rider", username),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["user"]["id"]
        .as_str()
        .and_then(|id| id.parse().ok())
        .expect("Register response carries the user id")
}

/// Log in with an email or username and return the token
pub async fn login(app: &TestApp, email_or_username: &str) -> String {
    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "emailOrUsername": email_or_username, "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"]
        .as_str()
        .expect("Login response carries a token")
        .to_string()
}

/// Register and log in
pub async fn sign_up(app: &TestApp, username: &str) -> TestUser {
    let id = register(app, username).await;
    let token = login(app, username).await;
    TestUser {
        id,
        username: username.to_string(),
        token,
    }
}

/// Create an event owned by `user` and return its id
pub async fn create_event(app: &TestApp, user: &TestUser, title: &str, category: &str) -> Uuid {
    let (status, body) = app
        .post(
            "/api/events",
            user.token(),
            json!({
                "title": title,
                "description": "Coffee stop halfway",
                "location": {"name": "Madrid", "country": "Spain"},
                "latitude": 40.4168,
                "longitude": -3.7038,
                "category": category,
                "date": "2025-06-01T09:00:00Z",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create event failed: {}", body);
    body["id"].as_str().and_then(|id| id.parse().ok()).expect("event id")
}

/// Create a post owned by `user` and return its id
pub async fn create_post(app: &TestApp, user: &TestUser, category: &str) -> Uuid {
    let (status, body) = app
        .post(
            "/api/posts",
            user.token(),
            json!({ "description": "Mountain pass at dawn", "category": category }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create post failed: {}", body);
    body["post"]["id"].as_str().and_then(|id| id.parse().ok()).expect("post id")
}
