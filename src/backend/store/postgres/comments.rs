//! Comment rows for posts and events

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use super::CommentRow;
use crate::backend::store::StoreError;
use crate::shared::content::{Comment, ContentKind};

fn select_for(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Post => {
            "SELECT post_id AS item_id, id, author, content, created_at \
             FROM comments WHERE post_id = ANY($1) ORDER BY seq"
        }
        ContentKind::Event => {
            "SELECT event_id AS item_id, id, author, content, created_at \
             FROM comments WHERE event_id = ANY($1) ORDER BY seq"
        }
    }
}

/// Comments of several items, grouped by item ID, in insertion order
pub(crate) async fn load_comments(
    pool: &PgPool,
    kind: ContentKind,
    items: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Comment>>, StoreError> {
    let mut grouped: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    if items.is_empty() {
        return Ok(grouped);
    }

    let rows = sqlx::query_as::<_, CommentRow>(select_for(kind))
        .bind(items)
        .fetch_all(pool)
        .await?;
    for row in rows {
        grouped.entry(row.item_id).or_default().push(Comment::from(row));
    }
    Ok(grouped)
}

/// Comments of one item
pub(crate) async fn comments_of(
    pool: &PgPool,
    kind: ContentKind,
    item: Uuid,
) -> Result<Vec<Comment>, StoreError> {
    let mut grouped = load_comments(pool, kind, &[item]).await?;
    Ok(grouped.remove(&item).unwrap_or_default())
}

pub async fn add_comment(
    pool: &PgPool,
    kind: ContentKind,
    item: Uuid,
    comment: Comment,
) -> Result<Vec<Comment>, StoreError> {
    let (post_id, event_id) = match kind {
        ContentKind::Post => (Some(item), None),
        ContentKind::Event => (None, Some(item)),
    };

    sqlx::query(
        r#"
        INSERT INTO comments (id, post_id, event_id, author, content, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(comment.id)
    .bind(post_id)
    .bind(event_id)
    .bind(comment.author)
    .bind(&comment.content)
    .bind(comment.created_at)
    .execute(pool)
    .await
    .map_err(|err| match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::NotFound(kind.not_found_message())
        }
        _ => StoreError::Database(err),
    })?;

    comments_of(pool, kind, item).await
}
