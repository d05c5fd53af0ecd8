//! SQLite-backed ticket message store using an sqlx async pool.
//!
//! The rewriting core never talks to this module directly; migration and
//! reversion pull `(id, content)` pairs out, transform them, and hand
//! changed bodies back through [`MessageStore::update_content`].

use crate::error::StoreError;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;

/// One message of a support ticket conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketMessage {
    pub id: i64,
    pub ticket_id: i64,
    pub author: String,
    pub content: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

pub struct MessageStore {
    pool: SqlitePool,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS ticket_messages (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    ticket_id  INTEGER NOT NULL,
    author     TEXT NOT NULL,
    content    TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

impl MessageStore {
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Self::with_pool(pool).await
    }

    /// In-memory store for tests. Pinned to one connection so every query
    /// sees the same database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::new().in_memory(true))
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn insert_message(
        &self,
        ticket_id: i64,
        author: &str,
        content: &str,
    ) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO ticket_messages (ticket_id, author, content, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(ticket_id)
        .bind(author)
        .bind(content)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// All messages in insertion order.
    pub async fn list_messages(&self) -> Result<Vec<TicketMessage>, StoreError> {
        let rows: Vec<(i64, i64, String, String, String)> = sqlx::query_as(
            "SELECT id, ticket_id, author, content, created_at
             FROM ticket_messages ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, ticket_id, author, content, created_at)| TicketMessage {
                id,
                ticket_id,
                author,
                content,
                created_at,
            })
            .collect())
    }

    pub async fn update_content(&self, id: i64, content: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE ticket_messages SET content = $1 WHERE id = $2")
            .bind(content)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get_content(&self, id: i64) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT content FROM ticket_messages WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(content,)| content))
    }
}
