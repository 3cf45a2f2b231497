use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::portfolio::{
        Achievement, NewAchievementRequest, NewSkillRequest, Skill, StatCounter,
        UpdateAchievementRequest, UpdateSkillRequest, UpsertStatCounterRequest,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxPortfolioRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    async fn create_skill(&self, request: &NewSkillRequest) -> Result<Skill, AppError>;
    async fn list_skills(&self) -> Result<Vec<Skill>, AppError>;
    async fn update_skill(&self, id: &Uuid, patch: &UpdateSkillRequest) -> Result<Skill, AppError>;
    async fn delete_skill(&self, id: &Uuid) -> Result<(), AppError>;

    async fn create_achievement(
        &self,
        request: &NewAchievementRequest,
    ) -> Result<Achievement, AppError>;
    async fn list_achievements(&self) -> Result<Vec<Achievement>, AppError>;
    async fn update_achievement(
        &self,
        id: &Uuid,
        patch: &UpdateAchievementRequest,
    ) -> Result<Achievement, AppError>;
    async fn delete_achievement(&self, id: &Uuid) -> Result<(), AppError>;

    async fn list_counters(&self) -> Result<Vec<StatCounter>, AppError>;
    async fn upsert_counter(
        &self,
        request: &UpsertStatCounterRequest,
    ) -> Result<StatCounter, AppError>;
}

impl SqlxPortfolioRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxPortfolioRepo { pool }
    }
}

#[async_trait]
impl PortfolioRepository for SqlxPortfolioRepo {
    async fn create_skill(&self, request: &NewSkillRequest) -> Result<Skill, AppError> {
        let skill = sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (name, category, proficiency, icon, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.category)
        .bind(request.proficiency)
        .bind(&request.icon)
        .bind(request.sort_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(skill)
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        let skills = sqlx::query_as::<_, Skill>(
            "SELECT * FROM skills ORDER BY sort_order ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(skills)
    }

    async fn update_skill(&self, id: &Uuid, patch: &UpdateSkillRequest) -> Result<Skill, AppError> {
        let skill = sqlx::query_as::<_, Skill>(
            r#"
            UPDATE skills SET
                name = COALESCE($1, name),
                category = COALESCE($2, category),
                proficiency = COALESCE($3, proficiency),
                icon = CASE WHEN $4 THEN $5 ELSE icon END,
                sort_order = COALESCE($6, sort_order),
                updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(patch.name.flatten_str())
        .bind(patch.category.flatten_str())
        .bind(patch.proficiency.flatten_i32())
        .bind(!patch.icon.is_unchanged())
        .bind(patch.icon.flatten_str())
        .bind(patch.sort_order.flatten_i32())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(skill)
    }

    async fn delete_skill(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Skill not found".into()));
        }

        Ok(())
    }

    async fn create_achievement(
        &self,
        request: &NewAchievementRequest,
    ) -> Result<Achievement, AppError> {
        let achievement = sqlx::query_as::<_, Achievement>(
            r#"
            INSERT INTO achievements (title, description, achieved_on, icon)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.achieved_on)
        .bind(&request.icon)
        .fetch_one(&self.pool)
        .await?;

        Ok(achievement)
    }

    async fn list_achievements(&self) -> Result<Vec<Achievement>, AppError> {
        let achievements = sqlx::query_as::<_, Achievement>(
            "SELECT * FROM achievements ORDER BY achieved_on DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(achievements)
    }

    async fn update_achievement(
        &self,
        id: &Uuid,
        patch: &UpdateAchievementRequest,
    ) -> Result<Achievement, AppError> {
        let achievement = sqlx::query_as::<_, Achievement>(
            r#"
            UPDATE achievements SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                achieved_on = COALESCE($3, achieved_on),
                icon = CASE WHEN $4 THEN $5 ELSE icon END,
                updated_at = NOW()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(patch.title.flatten_str())
        .bind(patch.description.flatten_str())
        .bind(patch.achieved_on.flatten_ref())
        .bind(!patch.icon.is_unchanged())
        .bind(patch.icon.flatten_str())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(achievement)
    }

    async fn delete_achievement(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM achievements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Achievement not found".into()));
        }

        Ok(())
    }

    async fn list_counters(&self) -> Result<Vec<StatCounter>, AppError> {
        let counters = sqlx::query_as::<_, StatCounter>(
            "SELECT * FROM site_stats ORDER BY key ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counters)
    }

    async fn upsert_counter(
        &self,
        request: &UpsertStatCounterRequest,
    ) -> Result<StatCounter, AppError> {
        let counter = sqlx::query_as::<_, StatCounter>(
            r#"
            INSERT INTO site_stats (key, label, value, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (key) DO UPDATE SET
                label = EXCLUDED.label,
                value = EXCLUDED.value,
                description = EXCLUDED.description,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&request.key)
        .bind(&request.label)
        .bind(request.value)
        .bind(&request.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(counter)
    }
}
