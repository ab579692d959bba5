//! Message repository for database operations.

use sqlx::PgPool;

use crate::entities::MessageEntity;
use crate::metrics::QueryTimer;

/// Repository for message-related database operations.
#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Creates a new MessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all approved messages, newest first. This is the public wall
    /// snapshot used to seed the live feed.
    pub async fn get_approved(&self) -> Result<Vec<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_approved_messages");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT id, author_name, message, approved, created_at
            FROM messages
            WHERE approved = true
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Get every message regardless of approval state, newest first.
    /// Moderation view only.
    pub async fn get_all(&self) -> Result<Vec<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_all_messages");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT id, author_name, message, approved, created_at
            FROM messages
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Get a message by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_message_by_id");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT id, author_name, message, approved, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a new message. Submissions always start unapproved; visibility
    /// is granted only through [`set_approval`](Self::set_approval).
    pub async fn create(
        &self,
        author_name: &str,
        message: &str,
    ) -> Result<MessageEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_message");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            INSERT INTO messages (author_name, message, approved)
            VALUES ($1, $2, false)
            RETURNING id, author_name, message, approved, created_at
            "#,
        )
        .bind(author_name)
        .bind(message)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set the approval flag on a message.
    pub async fn set_approval(
        &self,
        id: i64,
        approved: bool,
    ) -> Result<Option<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_message_approval");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            UPDATE messages
            SET approved = $2
            WHERE id = $1
            RETURNING id, author_name, message, approved, created_at
            "#,
        )
        .bind(id)
        .bind(approved)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a message. Returns true when a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_message");
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|done| done.rows_affected() > 0);
        timer.record();
        result
    }
}
