use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::{
        dashboard::ProjectStatusCounts,
        project::{
            ListProjectsQuery, NewProjectRequest, Project, ProjectRow, ProjectStats,
            ReorderItem, TechnologyCount, UpdateProjectRequest,
        },
    },
    errors::AppError,
    repositories::{page_offset, sqlx_repo::SqlxProjectRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: &NewProjectRequest) -> Result<Project, AppError>;
    /// Inserts the whole batch inside one transaction; any failure rolls
    /// everything back.
    async fn create_many(&self, projects: &[NewProjectRequest]) -> Result<Vec<Uuid>, AppError>;
    async fn get(&self, id: &Uuid) -> Result<Project, AppError>;
    async fn list(
        &self,
        filter: &ListProjectsQuery,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Project>, i64), AppError>;
    async fn update(&self, id: &Uuid, patch: &UpdateProjectRequest) -> Result<Project, AppError>;
    /// Returns the deleted row so the caller can clean up CDN assets.
    async fn delete(&self, id: &Uuid) -> Result<Project, AppError>;
    async fn reorder(&self, items: &[ReorderItem]) -> Result<u64, AppError>;
    async fn stats(&self, top_technologies: i64) -> Result<ProjectStats, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListProjectsQuery) {
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(category) = &filter.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(featured) = filter.featured {
        builder.push(" AND featured = ").push_bind(featured);
    }
    if let Some(search) = &filter.search {
        let search = search.trim();
        if !search.is_empty() {
            let pattern = format!("%{}%", search);
            builder.push(" AND (title ILIKE ").push_bind(pattern.clone());
            builder.push(" OR description ILIKE ").push_bind(pattern);
            builder.push(")");
        }
    }
}

const INSERT_PROJECT: &str = r#"
    INSERT INTO projects (
        title, description, category, technologies, repositories, demo_urls,
        image_url, image_public_id, status, featured, sort_order
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
    RETURNING *
"#;

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn create(&self, project: &NewProjectRequest) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(INSERT_PROJECT)
            .bind(&project.title)
            .bind(&project.description)
            .bind(&project.category)
            .bind(&project.technologies)
            .bind(&project.repositories)
            .bind(&project.demo_urls)
            .bind(&project.image_url)
            .bind(&project.image_public_id)
            .bind(project.status.as_str())
            .bind(project.featured)
            .bind(project.sort_order)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn create_many(&self, projects: &[NewProjectRequest]) -> Result<Vec<Uuid>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(projects.len());

        for project in projects {
            let row = sqlx::query_as::<_, ProjectRow>(INSERT_PROJECT)
                .bind(&project.title)
                .bind(&project.description)
                .bind(&project.category)
                .bind(&project.technologies)
                .bind(&project.repositories)
                .bind(&project.demo_urls)
                .bind(&project.image_url)
                .bind(&project.image_public_id)
                .bind(project.status.as_str())
                .bind(project.featured)
                .bind(project.sort_order)
                .fetch_one(&mut *tx)
                .await?;
            ids.push(row.id);
        }

        tx.commit().await?;
        Ok(ids)
    }

    async fn get(&self, id: &Uuid) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn list(
        &self,
        filter: &ListProjectsQuery,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Project>, i64), AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM projects WHERE TRUE");
        push_filters(&mut builder, filter);
        builder.push(" ORDER BY sort_order ASC, created_at DESC");
        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let rows: Vec<ProjectRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM projects WHERE TRUE");
        push_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: &Uuid, patch: &UpdateProjectRequest) -> Result<Project, AppError> {
        // image_url and image_public_id accept explicit null (image removal),
        // so they bypass COALESCE.
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                category = COALESCE($3, category),
                technologies = COALESCE($4, technologies),
                repositories = COALESCE($5, repositories),
                demo_urls = COALESCE($6, demo_urls),
                image_url = CASE WHEN $7 THEN $8 ELSE image_url END,
                image_public_id = CASE WHEN $9 THEN $10 ELSE image_public_id END,
                status = COALESCE($11, status),
                featured = COALESCE($12, featured),
                sort_order = COALESCE($13, sort_order),
                updated_at = NOW()
            WHERE id = $14
            RETURNING *
            "#,
        )
        .bind(patch.title.flatten_str())
        .bind(patch.description.flatten_str())
        .bind(patch.category.flatten_str())
        .bind(patch.technologies.flatten_slice())
        .bind(patch.repositories.flatten_slice())
        .bind(patch.demo_urls.flatten_slice())
        .bind(!patch.image_url.is_unchanged())
        .bind(patch.image_url.flatten_str())
        .bind(!patch.image_public_id.is_unchanged())
        .bind(patch.image_public_id.flatten_str())
        .bind(patch.status.flatten_ref().map(|s| s.as_str()))
        .bind(patch.featured.flatten_bool())
        .bind(patch.sort_order.flatten_i32())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, id: &Uuid) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>("DELETE FROM projects WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn reorder(&self, items: &[ReorderItem]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut updated = 0;

        for item in items {
            let result = sqlx::query(
                "UPDATE projects SET sort_order = $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(item.sort_order)
            .bind(item.id)
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }

        tx.commit().await?;
        Ok(updated)
    }

    async fn stats(&self, top_technologies: i64) -> Result<ProjectStats, AppError> {
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

        let technologies = sqlx::query_as::<_, TechnologyCount>(
            r#"
            SELECT technology, COUNT(*) AS count
            FROM projects, UNNEST(technologies) AS technology
            GROUP BY technology
            ORDER BY count DESC, technology ASC
            LIMIT $1
            "#,
        )
        .bind(top_technologies)
        .fetch_all(&self.pool)
        .await?;

        Ok(ProjectStats {
            total: counts.total,
            active: counts.active,
            completed: counts.completed,
            archived: counts.archived,
            featured: counts.featured,
            top_technologies: technologies,
        })
    }
}
