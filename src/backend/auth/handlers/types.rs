/**
 * Authentication Handler Types
 *
 * Request and response bodies of the `/api/auth` routes. Field names are
 * camelCase on the wire. Required fields are `Option` so that a missing
 * field produces the same validation message as a blank one.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::store::DeletionReport;
use crate::shared::forms::{opt_bike_details, opt_text};
use crate::shared::users::{BikeDetails, User};

/// Registration request
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    /// Plain password, hashed before storage
    pub password: Option<String>,
    pub full_name: Option<String>,
}

/// Login request; the identifier may be an email or a username
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_or_username: Option<String>,
    pub password: Option<String>,
}

/// Profile update, as JSON or multipart text fields
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "opt_text")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "opt_bike_details")]
    pub bike_details: Option<BikeDetails>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub user_id: Uuid,
    pub role: String,
}

/// Login response
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    /// Signed token, valid for the configured TTL
    pub token: String,
    pub user: User,
}

/// Confirmation carrying the affected user
#[derive(Serialize, Debug)]
pub struct UserMessage {
    pub message: String,
    pub user: User,
}

#[derive(Serialize, Debug)]
pub struct DeletionResponse {
    pub message: String,
    pub deleted: DeletionReport,
}
