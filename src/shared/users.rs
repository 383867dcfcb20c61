//! User accounts
//!
//! `User` is the stored record. It never serialises its password hash, so a
//! `User` can be returned from any handler as-is. `PublicUser` is the reduced
//! shape used whenever another record references a user (comment authors,
//! creators, members, followers).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Motorcycle details on a profile
///
/// Missing fields deserialise as empty strings so `is_complete` can report them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BikeDetails {
    pub brand: String,
    pub model: String,
    pub year: String,
    pub license_plate: String,
}

impl BikeDetails {
    /// All four fields must be filled in
    pub fn is_complete(&self) -> bool {
        [&self.brand, &self.model, &self.year, &self.license_plate]
            .iter()
            .all(|value| !value.trim().is_empty())
    }
}

/// Role tag; `user` unless changed
///
/// Stored as text. Rows are read back with `new`, but anything a client
/// sends goes through `parse`, which only knows `user` and `admin`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub const USER: &'static str = "user";
    pub const ADMIN: &'static str = "admin";
    pub const KNOWN: [&'static str; 2] = [Self::USER, Self::ADMIN];

    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// Role named by a client, case-insensitive
    pub fn parse(role: &str) -> Result<Self, SharedError> {
        let role = role.trim().to_ascii_lowercase();
        if Self::KNOWN.contains(&role.as_str()) {
            Ok(Self(role))
        } else {
            Err(SharedError::validation(
                "role",
                format!("must be one of {}", Self::KNOWN.join(", ")),
            ))
        }
    }

    pub fn user() -> Self {
        Self::new(Self::USER)
    }

    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::user()
    }
}

/// Stored user record
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
    /// bcrypt hash, never serialised
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub bike_details: Option<BikeDetails>,
    pub role: Role,
    pub photo: Option<String>,
    pub followers: Vec<Uuid>,
    pub following: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a freshly registered user
    pub fn new(new_user: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: new_user.username,
            full_name: new_user.full_name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            bio: None,
            location: None,
            bike_details: None,
            role: new_user.role,
            photo: None,
            followers: Vec::new(),
            following: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_following(&self, other: Uuid) -> bool {
        self.following.contains(&other)
    }

    pub fn is_followed_by(&self, other: Uuid) -> bool {
        self.followers.contains(&other)
    }

    pub fn public(&self) -> PublicUser {
        PublicUser::from(self)
    }
}

/// Public fields of a referenced user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub photo: Option<String>,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            photo: user.photo.clone(),
            role: user.role.clone(),
        }
    }
}

/// Profile page of a user: followers and following resolved, plus their posts
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub bike_details: Option<BikeDetails>,
    pub photo: Option<String>,
    pub role: Role,
    pub followers: Vec<PublicUser>,
    pub following: Vec<PublicUser>,
    pub followers_count: usize,
    pub following_count: usize,
    pub posts: Vec<crate::shared::content::Post>,
    /// Whether the viewer follows this user; absent without a viewer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

/// Input for account registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Replacement values for a profile update
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    /// `None` keeps the stored details
    pub bike_details: Option<BikeDetails>,
    /// `None` keeps the stored photo
    pub photo: Option<String>,
}

impl ProfileUpdate {
    /// Apply the update onto a stored record
    pub fn apply(self, user: &mut User) {
        user.username = self.username;
        user.email = self.email;
        user.full_name = self.full_name;
        user.bio = self.bio;
        user.location = self.location;
        if let Some(bike) = self.bike_details {
            user.bike_details = Some(bike);
        }
        if let Some(photo) = self.photo {
            user.photo = Some(photo);
        }
        user.updated_at = Utc::now();
    }
}
