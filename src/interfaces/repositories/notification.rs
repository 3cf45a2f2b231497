use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::notification::{
        BulkDeleteNotificationsRequest, ListNotificationsQuery, NewNotificationRequest,
        Notification, NotificationRow,
    },
    errors::AppError,
    repositories::{page_offset, sqlx_repo::SqlxNotificationRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, request: &NewNotificationRequest) -> Result<Notification, AppError>;
    async fn list(
        &self,
        filter: &ListNotificationsQuery,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Notification>, i64), AppError>;
    async fn count_unread(&self) -> Result<i64, AppError>;
    async fn mark_read(&self, id: &Uuid) -> Result<Notification, AppError>;
    async fn mark_all_read(&self) -> Result<u64, AppError>;
    async fn delete(&self, id: &Uuid) -> Result<(), AppError>;
    async fn bulk_delete(&self, request: &BulkDeleteNotificationsRequest) -> Result<u64, AppError>;
    async fn purge_read_older_than(&self, days: i64) -> Result<u64, AppError>;
}

impl SqlxNotificationRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxNotificationRepo { pool }
    }
}

#[async_trait]
impl NotificationRepository for SqlxNotificationRepo {
    async fn create(&self, request: &NewNotificationRequest) -> Result<Notification, AppError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (
                kind, title, message, priority, related_id, related_kind, action_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(request.kind.as_str())
        .bind(&request.title)
        .bind(&request.message)
        .bind(request.priority.as_str())
        .bind(&request.related_id)
        .bind(&request.related_kind)
        .bind(&request.action_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list(
        &self,
        filter: &ListNotificationsQuery,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Notification>, i64), AppError> {
        let unread_only = filter.unread_only.unwrap_or(false);

        let mut builder = QueryBuilder::new("SELECT * FROM notifications WHERE TRUE");
        if unread_only {
            builder.push(" AND is_read = FALSE");
        }
        if let Some(kind) = filter.kind {
            builder.push(" AND kind = ").push_bind(kind.as_str());
        }
        builder.push(" ORDER BY created_at DESC");
        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let rows: Vec<NotificationRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM notifications WHERE TRUE");
        if unread_only {
            count_builder.push(" AND is_read = FALSE");
        }
        if let Some(kind) = filter.kind {
            count_builder.push(" AND kind = ").push_bind(kind.as_str());
        }
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn count_unread(&self) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE is_read = FALSE")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn mark_read(&self, id: &Uuid) -> Result<Notification, AppError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notifications SET
                is_read = TRUE,
                read_at = COALESCE(read_at, NOW())
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn mark_all_read(&self) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() WHERE is_read = FALSE",
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification not found".into()));
        }

        Ok(())
    }

    async fn bulk_delete(&self, request: &BulkDeleteNotificationsRequest) -> Result<u64, AppError> {
        let result = if let Some(ids) = &request.ids {
            sqlx::query("DELETE FROM notifications WHERE id = ANY($1)")
                .bind(ids)
                .execute(&self.pool)
                .await?
        } else if let Some(days) = request.older_than_days {
            sqlx::query(
                "DELETE FROM notifications WHERE created_at < NOW() - make_interval(days => $1::int)",
            )
            .bind(days as i32)
            .execute(&self.pool)
            .await?
        } else {
            sqlx::query("DELETE FROM notifications WHERE is_read = TRUE")
                .execute(&self.pool)
                .await?
        };

        Ok(result.rows_affected())
    }

    async fn purge_read_older_than(&self, days: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM notifications
            WHERE is_read = TRUE
              AND created_at < NOW() - make_interval(days => $1::int)
            "#,
        )
        .bind(days as i32)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
