/**
 * Conversation and direct message queries
 *
 * `get_or_create_conversation` is a single upsert on the
 * `(participant_a, participant_b)` unique key. The no-op `DO UPDATE` makes
 * `RETURNING` yield the existing row when the pair is already present, so
 * concurrent callers converge on one conversation.
 */

use sqlx::PgPool;
use uuid::Uuid;

use super::{ConversationRow, MessageRow};
use crate::backend::store::StoreError;
use crate::shared::messaging::{CanonicalPair, Conversation, DirectMessage, NewDirectMessage};

const CONVERSATION_COLUMNS: &str = "id, participant_a, participant_b, created_at, updated_at";

pub async fn get_or_create_conversation(
    pool: &PgPool,
    pair: CanonicalPair,
) -> Result<Conversation, StoreError> {
    let fresh = Conversation::new(pair);

    let row = sqlx::query_as::<_, ConversationRow>(&format!(
        r#"
        INSERT INTO conversations (id, participant_a, participant_b, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (participant_a, participant_b)
        DO UPDATE SET updated_at = conversations.updated_at
        RETURNING {CONVERSATION_COLUMNS}
        "#
    ))
    .bind(fresh.id)
    .bind(pair.first())
    .bind(pair.second())
    .bind(fresh.created_at)
    .bind(fresh.updated_at)
    .fetch_one(pool)
    .await?;

    Ok(Conversation::try_from(row)?)
}

pub async fn conversation_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Conversation>, StoreError> {
    let row = sqlx::query_as::<_, ConversationRow>(&format!(
        "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Conversation::try_from).transpose()?)
}

pub async fn conversations_for_user(pool: &PgPool, user: Uuid) -> Result<Vec<Conversation>, StoreError> {
    let rows = sqlx::query_as::<_, ConversationRow>(&format!(
        r#"
        SELECT {CONVERSATION_COLUMNS} FROM conversations
        WHERE participant_a = $1 OR participant_b = $1
        ORDER BY created_at
        "#
    ))
    .bind(user)
    .fetch_all(pool)
    .await?;
    let conversations = rows
        .into_iter()
        .map(Conversation::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(conversations)
}

pub async fn send_message(pool: &PgPool, new_message: NewDirectMessage) -> Result<DirectMessage, StoreError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, ConversationRow>(&format!(
        "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1 FOR UPDATE"
    ))
    .bind(new_message.conversation_id)
    .fetch_optional(&mut *tx)
    .await?;
    let conversation = match row {
        Some(row) => Conversation::try_from(row)?,
        None => return Err(StoreError::NotFound("Conversation not found")),
    };
    if !conversation.is_between(new_message.sender, new_message.receiver) {
        return Err(StoreError::rejected(
            "Sender and receiver must be the participants of the conversation",
        ));
    }

    let message = DirectMessage::new(new_message);
    sqlx::query(
        r#"
        INSERT INTO messages (id, conversation_id, sender, receiver, content, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(message.id)
    .bind(message.conversation_id)
    .bind(message.sender)
    .bind(message.receiver)
    .bind(&message.content)
    .bind(message.created_at)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE conversations SET updated_at = $2 WHERE id = $1")
        .bind(message.conversation_id)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(message)
}

pub async fn messages_by_conversation(
    pool: &PgPool,
    conversation: Uuid,
) -> Result<Vec<DirectMessage>, StoreError> {
    let rows = sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT id, conversation_id, sender, receiver, content, created_at
        FROM messages
        WHERE conversation_id = $1
        ORDER BY created_at, seq
        "#,
    )
    .bind(conversation)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(DirectMessage::from).collect())
}
