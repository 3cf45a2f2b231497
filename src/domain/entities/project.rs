use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::{
    blog_post::{new_validation_error, validate_http_url},
    option_fields::OptionField,
};

const MAX_TITLE_LENGTH: u64 = 150;
const MAX_DESCRIPTION_LENGTH: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProjectStatus::Active),
            "completed" => Ok(ProjectStatus::Completed),
            "archived" => Ok(ProjectStatus::Archived),
            _ => Err(()),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub technologies: Vec<String>,
    pub repositories: Vec<String>,
    pub demo_urls: Vec<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub status: String,
    pub featured: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub technologies: Vec<String>,
    pub repositories: Vec<String>,
    pub demo_urls: Vec<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub status: ProjectStatus,
    pub featured: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            technologies: row.technologies,
            repositories: row.repositories,
            demo_urls: row.demo_urls,
            image_url: row.image_url,
            image_public_id: row.image_public_id,
            status: row.status.parse().unwrap_or(ProjectStatus::Active),
            featured: row.featured,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProjectRequest {
    #[validate(length(min = 2, max = MAX_TITLE_LENGTH))]
    pub title: String,

    #[validate(length(min = 10, max = MAX_DESCRIPTION_LENGTH))]
    pub description: String,

    #[serde(default = "default_category")]
    #[validate(length(min = 1, max = 50))]
    pub category: String,

    // A project without at least one technology and one repository is
    // not importable.
    #[validate(custom(function = "validate_non_empty_list"))]
    pub technologies: Vec<String>,

    #[validate(custom(function = "validate_repository_list"))]
    pub repositories: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_url_list"))]
    pub demo_urls: Vec<String>,

    #[validate(custom(function = "validate_optional_url"))]
    pub image_url: Option<String>,

    pub image_public_id: Option<String>,

    #[serde(default = "default_status")]
    pub status: ProjectStatus,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub sort_order: i32,
}

fn default_category() -> String {
    "web".to_string()
}

fn default_status() -> ProjectStatus {
    ProjectStatus::Active
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 2, max = MAX_TITLE_LENGTH))]
    pub title: OptionField<String>,

    #[validate(length(min = 10, max = MAX_DESCRIPTION_LENGTH))]
    pub description: OptionField<String>,

    #[validate(length(min = 1, max = 50))]
    pub category: OptionField<String>,

    #[validate(custom(function = "validate_optional_non_empty_list"))]
    pub technologies: OptionField<Vec<String>>,

    #[validate(custom(function = "validate_optional_repository_list"))]
    pub repositories: OptionField<Vec<String>>,

    #[validate(custom(function = "validate_optional_url_list"))]
    pub demo_urls: OptionField<Vec<String>>,

    pub image_url: OptionField<String>,

    pub image_public_id: OptionField<String>,

    pub status: OptionField<ProjectStatus>,

    pub featured: OptionField<bool>,

    pub sort_order: OptionField<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkProjectImportRequest {
    #[validate(length(min = 1, message = "At least one project is required"))]
    pub projects: Vec<NewProjectRequest>,
}

#[derive(Debug, Serialize)]
pub struct BulkProjectImportResponse {
    pub inserted: usize,
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReorderItem {
    pub id: Uuid,
    pub sort_order: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReorderProjectsRequest {
    #[validate(length(min = 1, message = "At least one entry is required"))]
    pub items: Vec<ReorderItem>,
}

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<ProjectStatus>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectStats {
    pub total: i64,
    pub active: i64,
    pub completed: i64,
    pub archived: i64,
    pub featured: i64,
    pub top_technologies: Vec<TechnologyCount>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TechnologyCount {
    pub technology: String,
    pub count: i64,
}

// ───── Validation Helpers ───────────────────────────────────────────

fn validate_non_empty_list(values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() || values.iter().all(|v| v.trim().is_empty()) {
        return Err(new_validation_error("empty_list", "At least one entry is required"));
    }
    Ok(())
}

fn validate_repository_list(urls: &[String]) -> Result<(), ValidationError> {
    validate_non_empty_list(urls)?;
    validate_url_list(urls)
}

fn validate_url_list(urls: &[String]) -> Result<(), ValidationError> {
    for url in urls {
        validate_http_url(url)?;
    }
    Ok(())
}

fn validate_optional_url(url: &str) -> Result<(), ValidationError> {
    validate_http_url(url)
}

fn validate_optional_non_empty_list(value: &OptionField<Vec<String>>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(values) = value {
        validate_non_empty_list(values)?;
    }
    Ok(())
}

fn validate_optional_repository_list(value: &OptionField<Vec<String>>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(urls) = value {
        validate_repository_list(urls)?;
    }
    Ok(())
}

fn validate_optional_url_list(value: &OptionField<Vec<String>>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(urls) = value {
        validate_url_list(urls)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> NewProjectRequest {
        NewProjectRequest {
            title: "Portfolio".into(),
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

    #[test]
    fn valid_project_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn project_requires_a_technology() {
        let mut request = valid_request();
        request.technologies = vec![];
        assert!(request.validate().is_err());
    }

    #[test]
    fn project_requires_a_repository() {
        let mut request = valid_request();
        request.repositories = vec![];
        assert!(request.validate().is_err());
    }

    #[test]
    fn repository_must_be_http_url() {
        let mut request = valid_request();
        request.repositories = vec!["git@github.com:me/portfolio.git".into()];
        assert!(request.validate().is_err());
    }
}
