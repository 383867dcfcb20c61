//! Post queries

use sqlx::PgPool;
use uuid::Uuid;

use super::comments::{comments_of, load_comments};
use super::{PostRow, POST_COLUMNS};
use crate::backend::store::{StoreError, RELATED_LIMIT};
use crate::shared::content::{ContentKind, NewPost, Post, PostUpdate};

const POST_NOT_FOUND: &str = "Post not found";

/// Attach comments to a batch of rows, keeping row order
async fn with_comments(pool: &PgPool, rows: Vec<PostRow>) -> Result<Vec<Post>, StoreError> {
    let ids: Vec<Uuid> = rows.iter().map(PostRow::id).collect();
    let mut comments = load_comments(pool, ContentKind::Post, &ids).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let own = comments.remove(&row.id()).unwrap_or_default();
            row.into_post(own)
        })
        .collect())
}

async fn single(pool: &PgPool, row: Option<PostRow>) -> Result<Post, StoreError> {
    let row = row.ok_or(StoreError::NotFound(POST_NOT_FOUND))?;
    let comments = comments_of(pool, ContentKind::Post, row.id()).await?;
    Ok(row.into_post(comments))
}

pub async fn create_post(pool: &PgPool, new_post: NewPost) -> Result<Post, StoreError> {
    let post = Post::new(new_post);

    sqlx::query(
        r#"
        INSERT INTO posts (id, description, location, category, tagged_users, media, creator, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(post.id)
    .bind(&post.description)
    .bind(&post.location)
    .bind(&post.category)
    .bind(&post.tagged_users)
    .bind(&post.media)
    .bind(post.creator)
    .bind(post.created_at)
    .bind(post.updated_at)
    .execute(pool)
    .await?;

    Ok(post)
}

pub async fn list_posts(pool: &PgPool) -> Result<Vec<Post>, StoreError> {
    let rows = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    with_comments(pool, rows).await
}

pub async fn post_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Post>, StoreError> {
    let row = sqlx::query_as::<_, PostRow>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match row {
        Some(row) => single(pool, Some(row)).await.map(Some),
        None => Ok(None),
    }
}

pub async fn posts_by_creator(pool: &PgPool, creator: Uuid) -> Result<Vec<Post>, StoreError> {
    let rows = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE creator = $1 ORDER BY created_at DESC"
    ))
    .bind(creator)
    .fetch_all(pool)
    .await?;
    with_comments(pool, rows).await
}

pub async fn update_post(pool: &PgPool, id: Uuid, update: PostUpdate) -> Result<Post, StoreError> {
    let row = sqlx::query_as::<_, PostRow>(&format!(
        r#"
        UPDATE posts
        SET description = COALESCE($2, description),
            location = COALESCE($3, location),
            category = COALESCE($4, category),
            tagged_users = COALESCE($5, tagged_users),
            media = COALESCE($6, media),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(update.description)
    .bind(update.location)
    .bind(update.category)
    .bind(update.tagged_users)
    .bind(update.media)
    .fetch_optional(pool)
    .await?;
    single(pool, row).await
}

pub async fn delete_post(pool: &PgPool, id: Uuid) -> Result<(), StoreError> {
    let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(StoreError::NotFound(POST_NOT_FOUND));
    }
    Ok(())
}

pub async fn related_posts(pool: &PgPool, id: Uuid) -> Result<Vec<Post>, StoreError> {
    let category: Option<Option<String>> =
        sqlx::query_scalar("SELECT category FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    let Some(category) = category.ok_or(StoreError::NotFound(POST_NOT_FOUND))? else {
        return Ok(Vec::new());
    };

    let rows = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE category = $1 AND id <> $2 ORDER BY created_at LIMIT $3"
    ))
    .bind(category)
    .bind(id)
    .bind(RELATED_LIMIT as i64)
    .fetch_all(pool)
    .await?;
    with_comments(pool, rows).await
}

pub async fn toggle_like(pool: &PgPool, id: Uuid, user: Uuid) -> Result<Post, StoreError> {
    let row = sqlx::query_as::<_, PostRow>(&format!(
        r#"
        UPDATE posts
        SET likes = CASE WHEN $2 = ANY(likes) THEN array_remove(likes, $2)
                         ELSE array_append(likes, $2) END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user)
    .fetch_optional(pool)
    .await?;
    single(pool, row).await
}
