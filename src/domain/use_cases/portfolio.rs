use validator::Validate;

use crate::{
    entities::portfolio::{
        Achievement, NewAchievementRequest, NewSkillRequest, Skill, StatCounter,
        UpdateAchievementRequest, UpdateSkillRequest, UpsertStatCounterRequest,
    },
    errors::AppError,
    repositories::portfolio::PortfolioRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct PortfolioHandler<R>
where
    R: PortfolioRepository,
{
    pub repo: R,
}

impl<R> PortfolioHandler<R>
where
    R: PortfolioRepository,
{
    pub fn new(repo: R) -> Self {
        PortfolioHandler { repo }
    }

    pub async fn create_skill(&self, request: NewSkillRequest) -> Result<Skill, AppError> {
        request.validate()?;
        self.repo.create_skill(&request).await
    }

    pub async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        self.repo.list_skills().await
    }

    pub async fn update_skill(
        &self,
        id: &str,
        patch: UpdateSkillRequest,
    ) -> Result<Skill, AppError> {
        patch.validate()?;
        let id = valid_uuid(id)?;
        self.repo.update_skill(&id, &patch).await
    }

    pub async fn delete_skill(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.repo.delete_skill(&id).await
    }

    pub async fn create_achievement(
        &self,
        request: NewAchievementRequest,
    ) -> Result<Achievement, AppError> {
        request.validate()?;
        self.repo.create_achievement(&request).await
    }

    pub async fn list_achievements(&self) -> Result<Vec<Achievement>, AppError> {
        self.repo.list_achievements().await
    }

    pub async fn update_achievement(
        &self,
        id: &str,
        patch: UpdateAchievementRequest,
    ) -> Result<Achievement, AppError> {
        patch.validate()?;
        let id = valid_uuid(id)?;
        self.repo.update_achievement(&id, &patch).await
    }

    pub async fn delete_achievement(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.repo.delete_achievement(&id).await
    }

    pub async fn list_counters(&self) -> Result<Vec<StatCounter>, AppError> {
        self.repo.list_counters().await
    }

    /// Counters are keyed, so writes are idempotent upserts.
    pub async fn upsert_counter(
        &self,
        request: UpsertStatCounterRequest,
    ) -> Result<StatCounter, AppError> {
        request.validate()?;
        self.repo.upsert_counter(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::portfolio::MockPortfolioRepository;

    #[tokio::test]
    async fn out_of_range_proficiency_never_reaches_the_repo() {
        let mut repo = MockPortfolioRepository::new();
        repo.expect_create_skill().never();

        let handler = PortfolioHandler::new(repo);
        let request = NewSkillRequest {
            name: "Rust".into(),
            category: "languages".into(),
            proficiency: 150,
            icon: None,
            sort_order: 0,
        };

        assert!(handler.create_skill(request).await.is_err());
    }

    #[tokio::test]
    async fn counter_key_is_validated() {
        let mut repo = MockPortfolioRepository::new();
        repo.expect_upsert_counter().never();

        let handler = PortfolioHandler::new(repo);
        let request = UpsertStatCounterRequest {
            key: "Years Coding".into(),
            label: "Years coding".into(),
            value: 6,
            description: None,
        };

        assert!(handler.upsert_counter(request).await.is_err());
    }
}
