/**
 * Community and chat queries
 *
 * A community row and its chat row are written in one transaction. The chat
 * references the community with `ON DELETE CASCADE`, so deleting the
 * community removes the chat and its messages.
 */

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{conflict_on_unique, ChatRow, CommunityRow, COMMUNITY_COLUMNS};
use crate::backend::store::{JoinOutcome, StoreError};
use crate::shared::community::{Chat, ChatMessage, Community, CommunityUpdate, NewCommunity};

const COMMUNITY_NOT_FOUND: &str = "Community not found";
const NAME_TAKEN: &str = "A community with this name already exists";

#[derive(Debug, sqlx::FromRow)]
struct ChatMessageRow {
    id: Uuid,
    community_id: Uuid,
    sender: Uuid,
    content: String,
    sent_at: DateTime<Utc>,
}

impl From<ChatMessageRow> for ChatMessage {
    fn from(row: ChatMessageRow) -> Self {
        Self {
            id: row.id,
            community_id: row.community_id,
            sender: row.sender,
            content: row.content,
            timestamp: row.sent_at,
        }
    }
}

pub async fn create_community(pool: &PgPool, new_community: NewCommunity) -> Result<Community, StoreError> {
    let creator = new_community.creator;
    let chat_id = Uuid::new_v4();
    let community = Community::new(new_community, chat_id);
    let chat = Chat::new(community.id, creator);
    let chat = Chat { id: chat_id, ..chat };

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO communities (id, name, description, media, creator, members, chat_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(community.id)
    .bind(&community.name)
    .bind(&community.description)
    .bind(&community.media)
    .bind(community.creator)
    .bind(&community.members)
    .bind(community.chat_id)
    .bind(community.created_at)
    .bind(community.updated_at)
    .execute(&mut *tx)
    .await
    .map_err(|err| conflict_on_unique(err, NAME_TAKEN))?;

    sqlx::query(
        r#"
        INSERT INTO chats (id, community_id, creator, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(chat.id)
    .bind(chat.community_id)
    .bind(chat.creator)
    .bind(chat.created_at)
    .bind(chat.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(community)
}

async fn fetch_many(pool: &PgPool, filter: &str, bind: Option<Uuid>) -> Result<Vec<Community>, StoreError> {
    let sql = format!("SELECT {COMMUNITY_COLUMNS} FROM communities {filter} ORDER BY created_at");
    let query = sqlx::query_as::<_, CommunityRow>(&sql);
    let query = match bind {
        Some(id) => query.bind(id),
        None => query,
    };
    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(Community::from).collect())
}

pub async fn list_communities(pool: &PgPool) -> Result<Vec<Community>, StoreError> {
    fetch_many(pool, "", None).await
}

pub async fn community_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Community>, StoreError> {
    let row = sqlx::query_as::<_, CommunityRow>(&format!(
        "SELECT {COMMUNITY_COLUMNS} FROM communities WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Community::from))
}

pub async fn communities_by_creator(pool: &PgPool, creator: Uuid) -> Result<Vec<Community>, StoreError> {
    fetch_many(pool, "WHERE creator = $1", Some(creator)).await
}

pub async fn communities_by_member(pool: &PgPool, member: Uuid) -> Result<Vec<Community>, StoreError> {
    fetch_many(pool, "WHERE $1 = ANY(members)", Some(member)).await
}

pub async fn update_community(
    pool: &PgPool,
    id: Uuid,
    update: CommunityUpdate,
) -> Result<Community, StoreError> {
    let row = sqlx::query_as::<_, CommunityRow>(&format!(
        r#"
        UPDATE communities
        SET name = $2, description = $3, media = COALESCE($4, media), updated_at = NOW()
        WHERE id = $1
        RETURNING {COMMUNITY_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(update.name)
    .bind(update.description)
    .bind(update.media)
    .fetch_optional(pool)
    .await
    .map_err(|err| conflict_on_unique(err, NAME_TAKEN))?;

    row.map(Community::from)
        .ok_or(StoreError::NotFound(COMMUNITY_NOT_FOUND))
}

pub async fn delete_community(pool: &PgPool, id: Uuid) -> Result<(), StoreError> {
    let deleted = sqlx::query("DELETE FROM communities WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(StoreError::NotFound(COMMUNITY_NOT_FOUND));
    }
    Ok(())
}

pub async fn join_community(pool: &PgPool, id: Uuid, user: Uuid) -> Result<JoinOutcome, StoreError> {
    let row = sqlx::query_as::<_, CommunityRow>(&format!(
        r#"
        UPDATE communities SET members = array_append(members, $2), updated_at = NOW()
        WHERE id = $1 AND NOT ($2 = ANY(members))
        RETURNING {COMMUNITY_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user)
    .fetch_optional(pool)
    .await?;

    if let Some(row) = row {
        return Ok(JoinOutcome {
            community: Community::from(row),
            joined: true,
        });
    }

    let community = community_by_id(pool, id)
        .await?
        .ok_or(StoreError::NotFound(COMMUNITY_NOT_FOUND))?;
    Ok(JoinOutcome {
        community,
        joined: false,
    })
}

pub async fn leave_community(pool: &PgPool, id: Uuid, user: Uuid) -> Result<Community, StoreError> {
    let row = sqlx::query_as::<_, CommunityRow>(&format!(
        r#"
        UPDATE communities SET members = array_remove(members, $2), updated_at = NOW()
        WHERE id = $1 AND $2 = ANY(members)
        RETURNING {COMMUNITY_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user)
    .fetch_optional(pool)
    .await?;

    if let Some(row) = row {
        return Ok(Community::from(row));
    }
    match community_by_id(pool, id).await? {
        Some(_) => Err(StoreError::rejected("User not in the community")),
        None => Err(StoreError::NotFound(COMMUNITY_NOT_FOUND)),
    }
}

pub async fn chat_by_community(pool: &PgPool, community: Uuid) -> Result<Option<Chat>, StoreError> {
    let row = sqlx::query_as::<_, ChatRow>(
        "SELECT id, community_id, creator, created_at, updated_at FROM chats WHERE community_id = $1",
    )
    .bind(community)
    .fetch_optional(pool)
    .await?;
    let Some(row) = row else {
        return Ok(None);
    };

    let messages = sqlx::query_as::<_, ChatMessageRow>(
        r#"
        SELECT m.id, c.community_id, m.sender, m.content, m.sent_at
        FROM chat_messages m JOIN chats c ON c.id = m.chat_id
        WHERE m.chat_id = $1
        ORDER BY m.seq
        "#,
    )
    .bind(row.id())
    .fetch_all(pool)
    .await?;

    Ok(Some(row.into_chat(
        messages.into_iter().map(ChatMessage::from).collect(),
    )))
}

pub async fn append_chat_message(pool: &PgPool, message: ChatMessage) -> Result<ChatMessage, StoreError> {
    let mut tx = pool.begin().await?;

    let chat_id: Option<Uuid> = sqlx::query_scalar(
        "UPDATE chats SET updated_at = NOW() WHERE community_id = $1 RETURNING id",
    )
    .bind(message.community_id)
    .fetch_optional(&mut *tx)
    .await?;
    let chat_id = chat_id.ok_or(StoreError::NotFound(COMMUNITY_NOT_FOUND))?;

    sqlx::query(
        r#"
        INSERT INTO chat_messages (id, chat_id, sender, content, sent_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(message.id)
    .bind(chat_id)
    .bind(message.sender)
    .bind(&message.content)
    .bind(message.timestamp)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(message)
}
