/**
 * Authentication Extractors
 *
 * Routes opt into authentication by taking `AuthUser` (required) or
 * `OptionalAuthUser` as a handler argument. The extractor reads the
 * `Authorization: Bearer <token>` header, verifies the token and loads the
 * user, so a handler holding an `AuthUser` knows the account still exists.
 *
 * | Situation                 | `AuthUser`         | `OptionalAuthUser` |
 * |---------------------------|--------------------|--------------------|
 * | No header                 | 401                | `None`             |
 * | Bad signature or expired  | 400                | `None`             |
 * | User no longer exists     | 401                | `None`             |
 */

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::users::User;

/// Authenticated caller
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub user: User,
}

/// Caller identity when a valid token is present
#[derive(Clone, Debug)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|auth| auth.id)
    }
}

/// Token from the `Authorization` header, `None` when the header is absent
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| BackendError::unauthorized("Access denied. No token provided."))?;

        let claims = state.tokens.verify(token)?;

        let user = state
            .store
            .user_by_id(claims.id)
            .await?
            .ok_or_else(|| BackendError::unauthorized("User not found"))?;

        Ok(AuthUser { id: user.id, user })
    }
}

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(auth) => Ok(Self(Some(auth))),
            Err(BackendError::Internal(detail)) => Err(BackendError::Internal(detail)),
            Err(_) => Ok(Self(None)),
        }
    }
}
