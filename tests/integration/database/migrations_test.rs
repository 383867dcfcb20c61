//! Database migration tests
//!
//! Skipped unless `DATABASE_URL` is set.

use uuid::Uuid;

use crate::common::{create_test_pool, run_migrations, unique_name};

#[tokio::test]
async fn test_migrations_run_twice() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    assert!(run_migrations(&pool).await.is_ok(), "First run failed");
    assert!(run_migrations(&pool).await.is_ok(), "Second run failed");
}

#[tokio::test]
async fn test_tables_exist() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    run_migrations(&pool).await.unwrap();

    for table in [
        "users",
        "posts",
        "events",
        "comments",
        "communities",
        "chats",
        "chat_messages",
        "conversations",
        "messages",
    ] {
        let result = sqlx::query(&format!("SELECT 1 FROM {} LIMIT 1", table))
            .execute(&pool)
            .await;
        assert!(result.is_ok(), "{} table should exist", table);
    }
}

#[tokio::test]
async fn test_conversation_pair_must_be_ordered() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    run_migrations(&pool).await.unwrap();

    let mut ids = Vec::new();
    for name in ["pair-a", "pair-b"] {
        let id = Uuid::new_v4();
        let name = unique_name(name);
        sqlx::query(
            "INSERT INTO users (id, username, full_name, email, password_hash) VALUES ($1, $2, $3, $4, 'x')",
        )
        .bind(id)
        .bind(&name)
        .bind(&name)
        .bind(format!("{}@example.com", name))
        .execute(&pool)
        .await
        .unwrap();
        ids.push(id);
    }
    ids.sort();
    let (low, high) = (ids[0], ids[1]);

    let insert = |a: Uuid, b: Uuid| {
        sqlx::query(
            "INSERT INTO conversations (id, participant_a, participant_b) VALUES ($1, $2, $3)",
        )
        .bind(Uuid::new_v4())
        .bind(a)
        .bind(b)
    };

    let reversed = insert(high, low).execute(&pool).await;
    assert!(reversed.is_err(), "Reversed pair should violate the check");
    let ordered = insert(low, high).execute(&pool).await;
    assert!(ordered.is_ok(), "Ordered pair should be accepted");

    sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(&ids)
        .execute(&pool)
        .await
        .unwrap();
}
