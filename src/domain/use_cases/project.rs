use validator::Validate;

use crate::{
    entities::{
        project::{
            BulkProjectImportRequest, BulkProjectImportResponse, ListProjectsQuery,
            NewProjectRequest, Project, ProjectStats, ReorderProjectsRequest,
            UpdateProjectRequest,
        },
        Paginated,
    },
    errors::{AppError, FieldError},
    media::cdn::CdnClient,
    repositories::project::ProjectRepository,
    use_cases::page_params,
    utils::valid_uuid::valid_uuid,
};

const TOP_TECHNOLOGIES: i64 = 5;

pub struct ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub repo: R,
    pub cdn: Option<CdnClient>,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub fn new(repo: R, cdn: Option<CdnClient>) -> Self {
        ProjectHandler { repo, cdn }
    }

    pub async fn create(&self, request: NewProjectRequest) -> Result<Project, AppError> {
        request.validate()?;
        self.repo.create(&request).await
    }

    /// All rows are validated up front; one bad row fails the whole batch
    /// with its index in the field path.
    pub async fn bulk_import(
        &self,
        request: BulkProjectImportRequest,
    ) -> Result<BulkProjectImportResponse, AppError> {
        request.validate()?;

        let mut errors = Vec::new();
        for (index, project) in request.projects.iter().enumerate() {
            if let Err(validation) = project.validate() {
                for (field, field_errors) in validation.field_errors() {
                    for error in field_errors {
                        errors.push(FieldError {
                            field: format!("projects[{}].{}", index, field),
                            message: error
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| "Invalid value".to_string()),
                        });
                    }
                }
            }
        }
        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors));
        }

        let ids = self.repo.create_many(&request.projects).await?;

        Ok(BulkProjectImportResponse {
            inserted: ids.len(),
            ids,
        })
    }

    pub async fn get(&self, id: &str) -> Result<Project, AppError> {
        let id = valid_uuid(id)?;
        self.repo.get(&id).await.map_err(not_found)
    }

    pub async fn list(&self, query: &ListProjectsQuery) -> Result<Paginated<Project>, AppError> {
        let (page, per_page) = page_params(query.page, query.per_page);
        let (projects, total) = self.repo.list(query, page, per_page).await?;

        Ok(Paginated {
            items: projects,
            total,
            page,
            per_page,
        })
    }

    /// A replaced or cleared image gets its old CDN asset deleted after the
    /// row update commits.
    pub async fn update(&self, id: &str, patch: UpdateProjectRequest) -> Result<Project, AppError> {
        patch.validate()?;
        let id = valid_uuid(id)?;

        let before = self.repo.get(&id).await.map_err(not_found)?;
        let updated = self.repo.update(&id, &patch).await?;

        if let (Some(cdn), Some(old_public_id)) = (&self.cdn, &before.image_public_id) {
            if updated.image_public_id.as_deref() != Some(old_public_id.as_str()) {
                cdn.delete_images_best_effort(std::slice::from_ref(old_public_id))
                    .await;
            }
        }

        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        let deleted = self.repo.delete(&id).await.map_err(not_found)?;

        if let (Some(cdn), Some(public_id)) = (&self.cdn, &deleted.image_public_id) {
            cdn.delete_images_best_effort(std::slice::from_ref(public_id))
                .await;
        }

        Ok(())
    }

    pub async fn reorder(&self, request: ReorderProjectsRequest) -> Result<u64, AppError> {
        request.validate()?;
        self.repo.reorder(&request.items).await
    }

    pub async fn stats(&self) -> Result<ProjectStats, AppError> {
        self.repo.stats(TOP_TECHNOLOGIES).await
    }
}

fn not_found(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => AppError::NotFound("Project not found".to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::project::ProjectStatus;
    use crate::repositories::project::MockProjectRepository;
    use uuid::Uuid;

    fn valid_project(title: &str) -> NewProjectRequest {
        NewProjectRequest {
            title: title.to_string(),
            description: "A personal portfolio site built for fun.".into(),
            category: "web".into(),
            technologies: vec!["rust".into()],
            repositories: vec!["https://github.com/me/portfolio".into()],
            demo_urls: vec![],
            image_url: None,
            image_public_id: None,
            status: ProjectStatus::Active,
            featured: false,
            sort_order: 0,
        }
    }

    #[tokio::test]
    async fn bulk_import_reports_errors_with_row_index() {
        let mut repo = MockProjectRepository::new();
        repo.expect_create_many().never();

        let handler = ProjectHandler::new(repo, None);
        let mut bad = valid_project("Broken");
        bad.repositories = vec![];

        let request = BulkProjectImportRequest {
            projects: vec![valid_project("Fine"), bad],
        };

        let err = handler.bulk_import(request).await.unwrap_err();
        match err {
            AppError::ValidationError(errors) => {
                assert!(errors.iter().all(|e| e.field.starts_with("projects[1].")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn bulk_import_inserts_every_row() {
        let mut repo = MockProjectRepository::new();
        repo.expect_create_many()
            .withf(|projects| projects.len() == 2)
            .returning(|projects| Ok(projects.iter().map(|_| Uuid::new_v4()).collect()));

        let handler = ProjectHandler::new(repo, None);
        let request = BulkProjectImportRequest {
            projects: vec![valid_project("One"), valid_project("Two")],
        };

        let response = handler.bulk_import(request).await.unwrap();
        assert_eq!(response.inserted, 2);
        assert_eq!(response.ids.len(), 2);
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let mut repo = MockProjectRepository::new();
        repo.expect_create_many().never();

        let handler = ProjectHandler::new(repo, None);
        let request = BulkProjectImportRequest { projects: vec![] };

        assert!(handler.bulk_import(request).await.is_err());
    }
}
