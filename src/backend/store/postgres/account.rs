/**
 * Account deletion
 *
 * Removes a user together with everything they own, inside one transaction.
 * Any failing statement drops the transaction, which rolls every earlier
 * step back; the error is returned to the caller unchanged.
 *
 * Order matters only for the report: messages are counted before their
 * conversations go, since the foreign key would otherwise remove them
 * silently. Comments and chats disappear through `ON DELETE CASCADE`.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::store::{DeletionReport, StoreError};

pub async fn delete_account(pool: &PgPool, id: Uuid) -> Result<DeletionReport, StoreError> {
    let mut tx = pool.begin().await?;

    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(StoreError::NotFound("User not found"));
    }

    let mut report = DeletionReport::default();

    report.events = sqlx::query("DELETE FROM events WHERE creator = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    report.posts = sqlx::query("DELETE FROM posts WHERE creator = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    report.communities = sqlx::query("DELETE FROM communities WHERE creator = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    report.messages = sqlx::query(
        r#"
        DELETE FROM messages
        WHERE conversation_id IN (
            SELECT id FROM conversations WHERE participant_a = $1 OR participant_b = $1
        )
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    report.conversations =
        sqlx::query("DELETE FROM conversations WHERE participant_a = $1 OR participant_b = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

    sqlx::query(
        r#"
        UPDATE users
        SET followers = array_remove(followers, $1), following = array_remove(following, $1)
        WHERE $1 = ANY(followers) OR $1 = ANY(following)
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE posts SET likes = array_remove(likes, $1) WHERE $1 = ANY(likes)")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        UPDATE events
        SET likes = array_remove(likes, $1), participants = array_remove(participants, $1)
        WHERE $1 = ANY(likes) OR $1 = ANY(participants)
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE communities SET members = array_remove(members, $1) WHERE $1 = ANY(members)")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        "Deleted account {} ({} events, {} posts, {} communities, {} conversations)",
        id,
        report.events,
        report.posts,
        report.communities,
        report.conversations
    );

    Ok(report)
}
