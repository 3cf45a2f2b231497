use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    entities::blog_post::{
        BlogPost, BlogPostInsert, BlogPostRow, EngagementCounter, ListBlogPostsQuery,
        UpdateBlogPostRequest,
    },
    errors::AppError,
    repositories::{page_offset, sqlx_repo::SqlxBlogPostRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    async fn create(&self, post: &BlogPostInsert) -> Result<BlogPost, AppError>;
    async fn get_by_id(&self, id: &Uuid) -> Result<BlogPost, AppError>;
    async fn get_by_slug(&self, slug: &str) -> Result<BlogPost, AppError>;
    async fn list(
        &self,
        filter: &ListBlogPostsQuery,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<BlogPost>, i64), AppError>;
    /// `slug`, `read_time` and `published_at` arrive pre-resolved from the
    /// use case; the remaining fields follow COALESCE semantics.
    async fn update(
        &self,
        id: &Uuid,
        patch: &UpdateBlogPostRequest,
        slug: &str,
        read_time: Option<i32>,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<BlogPost, AppError>;
    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError>;
    async fn soft_delete(&self, id: &Uuid) -> Result<(), AppError>;
    async fn hard_delete(&self, id: &Uuid) -> Result<(), AppError>;
    async fn increment_counter(
        &self,
        slug: &str,
        counter: EngagementCounter,
    ) -> Result<i64, AppError>;
}

impl SqlxBlogPostRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxBlogPostRepo { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListBlogPostsQuery) {
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(category) = &filter.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(tag) = &filter.tag {
        builder.push(" AND tags @> ").push_bind(vec![tag.clone()]);
    }
    if let Some(search) = &filter.search {
        let search = search.trim();
        if !search.is_empty() {
            let pattern = format!("%{}%", search);
            builder.push(" AND (title ILIKE ").push_bind(pattern.clone());
            builder.push(" OR excerpt ILIKE ").push_bind(pattern);
            builder.push(")");
        }
    }
}

#[async_trait]
impl BlogPostRepository for SqlxBlogPostRepo {
    async fn create(&self, post: &BlogPostInsert) -> Result<BlogPost, AppError> {
        let row = sqlx::query_as::<_, BlogPostRow>(
            r#"
            INSERT INTO blog_posts (
                title, slug, excerpt, content_html, category, tags,
                author, status, published_at, read_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content_html)
        .bind(&post.category)
        .bind(&post.tags)
        .bind(post.author.as_ref().map(Json))
        .bind(post.status.as_str())
        .bind(post.published_at)
        .bind(post.read_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("blog_posts_slug_active_idx") {
                    return AppError::Conflict("Slug already exists".into());
                }
            }
            AppError::from(e)
        })?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<BlogPost, AppError> {
        let row = sqlx::query_as::<_, BlogPostRow>(
            "SELECT * FROM blog_posts WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<BlogPost, AppError> {
        let row = sqlx::query_as::<_, BlogPostRow>(
            "SELECT * FROM blog_posts WHERE slug = $1 AND deleted_at IS NULL",
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list(
        &self,
        filter: &ListBlogPostsQuery,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<BlogPost>, i64), AppError> {
        let mut builder =
            QueryBuilder::new("SELECT * FROM blog_posts WHERE deleted_at IS NULL");
        push_filters(&mut builder, filter);
        builder.push(" ORDER BY COALESCE(published_at, created_at) DESC");
        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let rows: Vec<BlogPostRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        let mut count_builder =
            QueryBuilder::new("SELECT COUNT(*) FROM blog_posts WHERE deleted_at IS NULL");
        push_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(
        &self,
        id: &Uuid,
        patch: &UpdateBlogPostRequest,
        slug: &str,
        read_time: Option<i32>,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<BlogPost, AppError> {
        let row = sqlx::query_as::<_, BlogPostRow>(
            r#"
            UPDATE blog_posts SET
                title = COALESCE($1, title),
                slug = $2,
                excerpt = COALESCE($3, excerpt),
                content_html = COALESCE($4, content_html),
                category = COALESCE($5, category),
                tags = COALESCE($6, tags),
                author = COALESCE($7, author),
                status = COALESCE($8, status),
                published_at = $9,
                read_time = COALESCE($10, read_time),
                updated_at = NOW()
            WHERE id = $11 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(patch.title.flatten_str())
        .bind(slug)
        .bind(patch.excerpt.flatten_str())
        .bind(patch.content_html.flatten_str())
        .bind(patch.category.flatten_str())
        .bind(patch.tags.flatten_slice())
        .bind(patch.author.flatten_ref().map(Json))
        .bind(patch.status.flatten_ref().map(|s| s.as_str()))
        .bind(published_at)
        .bind(read_time)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("blog_posts_slug_active_idx") {
                    return AppError::Conflict("Slug already exists".into());
                }
            }
            AppError::from(e)
        })?;

        Ok(row.into())
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM blog_posts
                WHERE slug = $1
                  AND deleted_at IS NULL
                  AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE blog_posts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Blog post not found".into()));
        }

        Ok(())
    }

    async fn hard_delete(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Blog post not found".into()));
        }

        Ok(())
    }

    async fn increment_counter(
        &self,
        slug: &str,
        counter: EngagementCounter,
    ) -> Result<i64, AppError> {
        // Column name comes from the enum, never from user input.
        let sql = format!(
            "UPDATE blog_posts SET {col} = {col} + 1 \
             WHERE slug = $1 AND deleted_at IS NULL RETURNING {col}",
            col = counter.column()
        );

        let value: i64 = sqlx::query_scalar(&sql)
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;

        Ok(value)
    }
}
