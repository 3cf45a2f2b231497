use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    entities::message::{
        BulkDeleteMessagesRequest, Message, MessageReply, MessageRow, MessageStatus,
        NewMessageRequest,
    },
    errors::AppError,
    repositories::{page_offset, sqlx_repo::SqlxMessageRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, request: &NewMessageRequest) -> Result<Message, AppError>;
    /// Fetch by id, flipping unread → read as a side effect.
    async fn get_marking_read(&self, id: &Uuid) -> Result<Message, AppError>;
    async fn list(
        &self,
        status: Option<MessageStatus>,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Message>, i64), AppError>;
    async fn count_unread(&self) -> Result<i64, AppError>;
    async fn set_status(&self, id: &Uuid, status: MessageStatus) -> Result<Message, AppError>;
    async fn append_reply(&self, id: &Uuid, reply: &MessageReply) -> Result<Message, AppError>;
    async fn delete(&self, id: &Uuid) -> Result<(), AppError>;
    async fn bulk_delete(&self, request: &BulkDeleteMessagesRequest) -> Result<u64, AppError>;
}

impl SqlxMessageRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxMessageRepo { pool }
    }
}

#[async_trait]
impl MessageRepository for SqlxMessageRepo {
    async fn create(&self, request: &NewMessageRequest) -> Result<Message, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (name, email, subject, category, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.subject)
        .bind(&request.category)
        .bind(&request.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_marking_read(&self, id: &Uuid) -> Result<Message, AppError> {
        // Two statements so a plain read does not touch updated_at.
        sqlx::query("UPDATE messages SET status = 'read' WHERE id = $1 AND status = 'unread'")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let row = sqlx::query_as::<_, MessageRow>("SELECT * FROM messages WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn list(
        &self,
        status: Option<MessageStatus>,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Message>, i64), AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM messages WHERE TRUE");
        if let Some(status) = status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        builder.push(" ORDER BY created_at DESC");
        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let rows: Vec<MessageRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM messages WHERE TRUE");
        if let Some(status) = status {
            count_builder.push(" AND status = ").push_bind(status.as_str());
        }
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn count_unread(&self) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE status = 'unread'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn set_status(&self, id: &Uuid, status: MessageStatus) -> Result<Message, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            "UPDATE messages SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn append_reply(&self, id: &Uuid, reply: &MessageReply) -> Result<Message, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            UPDATE messages SET
                replies = replies || jsonb_build_array($1::jsonb),
                status = 'replied',
                updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(Json(reply))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Message not found".into()));
        }

        Ok(())
    }

    async fn bulk_delete(&self, request: &BulkDeleteMessagesRequest) -> Result<u64, AppError> {
        let result = if let Some(ids) = &request.ids {
            sqlx::query("DELETE FROM messages WHERE id = ANY($1)")
                .bind(ids)
                .execute(&self.pool)
                .await?
        } else if let Some(days) = request.older_than_days {
            sqlx::query(
                "DELETE FROM messages WHERE created_at < NOW() - make_interval(days => $1::int)",
            )
            .bind(days as i32)
            .execute(&self.pool)
            .await?
        } else {
            sqlx::query("DELETE FROM messages").execute(&self.pool).await?
        };

        Ok(result.rows_affected())
    }
}
