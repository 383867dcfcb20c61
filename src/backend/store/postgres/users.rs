/**
 * User queries
 *
 * Follower edges live in the `followers` and `following` arrays of both
 * users. Follow and unfollow lock the two rows in ID order and update both
 * arrays inside one transaction.
 */

use std::collections::HashMap;

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{conflict_on_unique, escape_like, UserRow, USER_COLUMNS};
use crate::backend::store::StoreError;
use crate::shared::users::{NewUser, ProfileUpdate, Role, User};

const USER_NOT_FOUND: &str = "User not found";

pub async fn create_user(pool: &PgPool, new_user: NewUser) -> Result<User, StoreError> {
    let user = User::new(new_user);

    sqlx::query(
        r#"
        INSERT INTO users (id, username, full_name, email, password_hash, role, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.full_name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await
    .map_err(|err| conflict_on_unique(err, "User already exists"))?;

    Ok(user)
}

pub async fn user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, StoreError> {
    let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(User::from))
}

pub async fn user_by_login(pool: &PgPool, email_or_username: &str) -> Result<Option<User>, StoreError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1 OR username = $1 LIMIT 1"
    ))
    .bind(email_or_username)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(User::from))
}

pub async fn user_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, StoreError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(User::from))
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, StoreError> {
    let rows = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(User::from).collect())
}

pub async fn search_users(pool: &PgPool, fragment: &str) -> Result<Vec<User>, StoreError> {
    let pattern = format!("%{}%", escape_like(fragment));
    let rows = sqlx::query_as::<_, UserRow>(&format!(
        r"SELECT {USER_COLUMNS} FROM users WHERE username ILIKE $1 ESCAPE '\' ORDER BY username"
    ))
    .bind(pattern)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(User::from).collect())
}

pub async fn users_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<HashMap<Uuid, User>, StoreError> {
    let rows = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let user = User::from(row);
            (user.id, user)
        })
        .collect())
}

pub async fn update_profile(pool: &PgPool, id: Uuid, update: ProfileUpdate) -> Result<User, StoreError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        UPDATE users
        SET username = $2, email = $3, full_name = $4, bio = $5, location = $6,
            bike_details = COALESCE($7, bike_details),
            photo = COALESCE($8, photo),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&update.username)
    .bind(&update.email)
    .bind(&update.full_name)
    .bind(&update.bio)
    .bind(&update.location)
    .bind(update.bike_details.map(Json))
    .bind(&update.photo)
    .fetch_optional(pool)
    .await
    .map_err(|err| conflict_on_unique(err, "Username, email or full name already in use"))?;

    row.map(User::from).ok_or(StoreError::NotFound(USER_NOT_FOUND))
}

pub async fn update_role(pool: &PgPool, id: Uuid, role: Role) -> Result<User, StoreError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
    ))
    .bind(id)
    .bind(role.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(User::from).ok_or(StoreError::NotFound(USER_NOT_FOUND))
}

/// Lock both users in ID order; `NotFound` unless both exist
async fn lock_pair(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    a: Uuid,
    b: Uuid,
) -> Result<(), StoreError> {
    let locked: Vec<Uuid> =
        sqlx::query_scalar("SELECT id FROM users WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(vec![a, b])
            .fetch_all(&mut **tx)
            .await?;
    if locked.len() != 2 {
        return Err(StoreError::NotFound(USER_NOT_FOUND));
    }
    Ok(())
}

pub async fn follow(pool: &PgPool, follower: Uuid, followee: Uuid) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;
    lock_pair(&mut tx, follower, followee).await?;

    let updated = sqlx::query(
        r#"
        UPDATE users SET following = array_append(following, $2), updated_at = NOW()
        WHERE id = $1 AND NOT ($2 = ANY(following))
        "#,
    )
    .bind(follower)
    .bind(followee)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(StoreError::conflict("You already follow this user"));
    }

    sqlx::query(
        r#"
        UPDATE users SET followers = array_append(followers, $1), updated_at = NOW()
        WHERE id = $2 AND NOT ($1 = ANY(followers))
        "#,
    )
    .bind(follower)
    .bind(followee)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn unfollow(pool: &PgPool, follower: Uuid, followee: Uuid) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;
    lock_pair(&mut tx, follower, followee).await?;

    let updated = sqlx::query(
        r#"
        UPDATE users SET following = array_remove(following, $2), updated_at = NOW()
        WHERE id = $1 AND $2 = ANY(following)
        "#,
    )
    .bind(follower)
    .bind(followee)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(StoreError::rejected("You do not follow this user"));
    }

    sqlx::query(
        "UPDATE users SET followers = array_remove(followers, $1), updated_at = NOW() WHERE id = $2",
    )
    .bind(follower)
    .bind(followee)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
