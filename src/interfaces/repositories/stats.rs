use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::dashboard::{BlogCounts, MessageCounts, ProjectStatusCounts, TrendingPost},
    errors::AppError,
    repositories::sqlx_repo::SqlxStatsRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn blog_counts(&self) -> Result<BlogCounts, AppError>;
    async fn trending_posts(&self, limit: i64) -> Result<Vec<TrendingPost>, AppError>;
    async fn project_counts(&self) -> Result<ProjectStatusCounts, AppError>;
    async fn message_counts(&self) -> Result<MessageCounts, AppError>;
    async fn unread_notifications(&self) -> Result<i64, AppError>;
    async fn skill_count(&self) -> Result<i64, AppError>;
    async fn recent_messages(
        &self,
        limit: i64,
    ) -> Result<Vec<(Uuid, String, DateTime<Utc>)>, AppError>;
    async fn recent_published_posts(
        &self,
        limit: i64,
    ) -> Result<Vec<(Uuid, String, DateTime<Utc>)>, AppError>;
}

impl SqlxStatsRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxStatsRepo { pool }
    }
}

#[async_trait]
impl StatsRepository for SqlxStatsRepo {
    async fn blog_counts(&self) -> Result<BlogCounts, AppError> {
        let counts = sqlx::query_as::<_, BlogCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'published') AS published,
                COUNT(*) FILTER (WHERE status = 'draft') AS draft
            FROM blog_posts
            WHERE deleted_at IS NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn trending_posts(&self, limit: i64) -> Result<Vec<TrendingPost>, AppError> {
        let posts = sqlx::query_as::<_, TrendingPost>(
            r#"
            SELECT
                id, title, slug, views, likes, comments,
                views + 5 * likes + 10 * comments AS score
            FROM blog_posts
            WHERE deleted_at IS NULL AND status = 'published'
            ORDER BY score DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn project_counts(&self) -> Result<ProjectStatusCounts, AppError> {
        let counts = sqlx::query_as::<_, ProjectStatusCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'active') AS active,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                COUNT(*) FILTER (WHERE status = 'archived') AS archived,
                COUNT(*) FILTER (WHERE featured) AS featured
            FROM projects
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn message_counts(&self) -> Result<MessageCounts, AppError> {
        let counts = sqlx::query_as::<_, MessageCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'unread') AS unread
            FROM messages
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn unread_notifications(&self) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE is_read = FALSE")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn skill_count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM skills")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn recent_messages(
        &self,
        limit: i64,
    ) -> Result<Vec<(Uuid, String, DateTime<Utc>)>, AppError> {
        let rows: Vec<(Uuid, String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT id, name, created_at FROM messages ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn recent_published_posts(
        &self,
        limit: i64,
    ) -> Result<Vec<(Uuid, String, DateTime<Utc>)>, AppError> {
        let rows: Vec<(Uuid, String, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT id, title, COALESCE(published_at, created_at)
            FROM blog_posts
            WHERE deleted_at IS NULL AND status = 'published'
            ORDER BY COALESCE(published_at, created_at) DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
