//! Event queries

use chrono::{Days, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use super::comments::{comments_of, load_comments};
use super::{EventRow, EVENT_COLUMNS};
use crate::backend::store::{StoreError, RELATED_LIMIT};
use crate::shared::content::{ContentKind, Event, EventFilter, EventUpdate, NewEvent};

const EVENT_NOT_FOUND: &str = "Event not found";

async fn with_comments(pool: &PgPool, rows: Vec<EventRow>) -> Result<Vec<Event>, StoreError> {
    let ids: Vec<Uuid> = rows.iter().map(EventRow::id).collect();
    let mut comments = load_comments(pool, ContentKind::Event, &ids).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let own = comments.remove(&row.id()).unwrap_or_default();
            row.into_event(own)
        })
        .collect())
}

async fn single(pool: &PgPool, row: EventRow) -> Result<Event, StoreError> {
    let comments = comments_of(pool, ContentKind::Event, row.id()).await?;
    Ok(row.into_event(comments))
}

async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, StoreError> {
    let found: Option<Uuid> = sqlx::query_scalar("SELECT id FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub async fn create_event(pool: &PgPool, new_event: NewEvent) -> Result<Event, StoreError> {
    let event = Event::new(new_event);

    sqlx::query(
        r#"
        INSERT INTO events (id, title, description, location, latitude, longitude, category, date, image, creator, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(event.id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(&event.location)
    .bind(event.latitude)
    .bind(event.longitude)
    .bind(&event.category)
    .bind(event.date)
    .bind(&event.image)
    .bind(event.creator)
    .bind(event.created_at)
    .bind(event.updated_at)
    .execute(pool)
    .await?;

    Ok(event)
}

pub async fn list_events(pool: &PgPool) -> Result<Vec<Event>, StoreError> {
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?;
    with_comments(pool, rows).await
}

pub async fn event_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Event>, StoreError> {
    let row = sqlx::query_as::<_, EventRow>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match row {
        Some(row) => single(pool, row).await.map(Some),
        None => Ok(None),
    }
}

pub async fn events_by_creator(pool: &PgPool, creator: Uuid) -> Result<Vec<Event>, StoreError> {
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE creator = $1 ORDER BY created_at"
    ))
    .bind(creator)
    .fetch_all(pool)
    .await?;
    with_comments(pool, rows).await
}

pub async fn filter_events(pool: &PgPool, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
    let rows = match filter {
        EventFilter::Date(day) => {
            let start = day.and_time(NaiveTime::MIN).and_utc();
            let end = start
                .checked_add_days(Days::new(1))
                .ok_or_else(|| StoreError::rejected("date is out of range"))?;
            sqlx::query_as::<_, EventRow>(&format!(
                "SELECT {EVENT_COLUMNS} FROM events WHERE date >= $1 AND date < $2 ORDER BY created_at"
            ))
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?
        }
        EventFilter::Location(location) => {
            sqlx::query_as::<_, EventRow>(&format!(
                r#"
                SELECT {EVENT_COLUMNS} FROM events
                WHERE location #>> '{{}}' = $1
                   OR EXISTS (
                        SELECT 1 FROM jsonb_each_text(
                            CASE WHEN jsonb_typeof(location) = 'object' THEN location ELSE '{{}}'::jsonb END
                        ) AS field
                        WHERE jsonb_typeof(location -> field.key) = 'string' AND field.value = $1
                   )
                ORDER BY created_at
                "#
            ))
            .bind(location)
            .fetch_all(pool)
            .await?
        }
        EventFilter::Title(title) => {
            sqlx::query_as::<_, EventRow>(&format!(
                "SELECT {EVENT_COLUMNS} FROM events WHERE title = $1 ORDER BY created_at"
            ))
            .bind(title)
            .fetch_all(pool)
            .await?
        }
        EventFilter::Description(description) => {
            sqlx::query_as::<_, EventRow>(&format!(
                "SELECT {EVENT_COLUMNS} FROM events WHERE description = $1 ORDER BY created_at"
            ))
            .bind(description)
            .fetch_all(pool)
            .await?
        }
    };
    with_comments(pool, rows).await
}

pub async fn update_event(pool: &PgPool, id: Uuid, update: EventUpdate) -> Result<Event, StoreError> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        UPDATE events
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            location = COALESCE($4, location),
            latitude = COALESCE($5, latitude),
            longitude = COALESCE($6, longitude),
            category = COALESCE($7, category),
            date = COALESCE($8, date),
            image = COALESCE($9, image),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(update.title)
    .bind(update.description)
    .bind(update.location)
    .bind(update.latitude)
    .bind(update.longitude)
    .bind(update.category)
    .bind(update.date)
    .bind(update.image)
    .fetch_optional(pool)
    .await?;
    let row = row.ok_or(StoreError::NotFound(EVENT_NOT_FOUND))?;
    single(pool, row).await
}

pub async fn delete_event(pool: &PgPool, id: Uuid) -> Result<(), StoreError> {
    let deleted = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(StoreError::NotFound(EVENT_NOT_FOUND));
    }
    Ok(())
}

pub async fn related_events(pool: &PgPool, id: Uuid) -> Result<Vec<Event>, StoreError> {
    let category: Option<String> = sqlx::query_scalar("SELECT category FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let category = category.ok_or(StoreError::NotFound(EVENT_NOT_FOUND))?;

    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE category = $1 AND id <> $2 ORDER BY created_at LIMIT $3"
    ))
    .bind(category)
    .bind(id)
    .bind(RELATED_LIMIT as i64)
    .fetch_all(pool)
    .await?;
    with_comments(pool, rows).await
}

pub async fn toggle_like(pool: &PgPool, id: Uuid, user: Uuid) -> Result<Event, StoreError> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        UPDATE events
        SET likes = CASE WHEN $2 = ANY(likes) THEN array_remove(likes, $2)
                         ELSE array_append(likes, $2) END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user)
    .fetch_optional(pool)
    .await?;
    let row = row.ok_or(StoreError::NotFound(EVENT_NOT_FOUND))?;
    single(pool, row).await
}

pub async fn join_event(pool: &PgPool, id: Uuid, user: Uuid) -> Result<Event, StoreError> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        UPDATE events SET participants = array_append(participants, $2), updated_at = NOW()
        WHERE id = $1 AND NOT ($2 = ANY(participants))
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return if exists(pool, id).await? {
            Err(StoreError::conflict("You have already joined this event"))
        } else {
            Err(StoreError::NotFound(EVENT_NOT_FOUND))
        };
    };
    single(pool, row).await
}

pub async fn leave_event(pool: &PgPool, id: Uuid, user: Uuid) -> Result<Event, StoreError> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        UPDATE events SET participants = array_remove(participants, $2), updated_at = NOW()
        WHERE id = $1 AND $2 = ANY(participants)
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return if exists(pool, id).await? {
            Err(StoreError::rejected("You have not joined this event"))
        } else {
            Err(StoreError::NotFound(EVENT_NOT_FOUND))
        };
    };
    single(pool, row).await
}
