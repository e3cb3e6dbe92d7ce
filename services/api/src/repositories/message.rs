//! Message repository for database operations
//!
//! Every lookup and mutation is scoped by `id AND user_id`, so a record
//! owned by someone else behaves exactly like a missing one.

use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::message::Message;

/// Message repository for database operations
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new message
    pub async fn insert(&self, message: &Message) -> ApiResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (
                id, user_id, email, name, title, content,
                is_recent, is_read, is_answered, is_banned, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(message.id)
        .bind(message.user_id)
        .bind(&message.email)
        .bind(&message.name)
        .bind(&message.title)
        .bind(&message.content)
        .bind(message.is_recent)
        .bind(message.is_read)
        .bind(message.is_answered)
        .bind(message.is_banned)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        info!("Created message {} for user {}", message.id, message.user_id);
        Ok(())
    }

    /// List all messages owned by a user, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> ApiResult<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, user_id, email, name, title, content,
                   is_recent, is_read, is_answered, is_banned, created_at
            FROM messages
            WHERE user_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Find a message by ID, scoped to its owner
    pub async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> ApiResult<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, user_id, email, name, title, content,
                   is_recent, is_read, is_answered, is_banned, created_at
            FROM messages
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    /// Persist the mutable fields of a message
    pub async fn update(&self, message: &Message) -> ApiResult<()> {
        sqlx::query(
            r#"
            UPDATE messages
            SET email = ?1, name = ?2, title = ?3, content = ?4,
                is_recent = ?5, is_read = ?6, is_answered = ?7, is_banned = ?8
            WHERE id = ?9 AND user_id = ?10
            "#,
        )
        .bind(&message.email)
        .bind(&message.name)
        .bind(&message.title)
        .bind(&message.content)
        .bind(message.is_recent)
        .bind(message.is_read)
        .bind(message.is_answered)
        .bind(message.is_banned)
        .bind(message.id)
        .bind(message.user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a message by ID, scoped to its owner. Returns whether a
    /// record was removed.
    pub async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
