pub mod option_fields;
pub mod blog_post;
pub mod project;
pub mod message;
pub mod notification;
pub mod portfolio;
pub mod outreach;
pub mod dashboard;

use serde::Serialize;

/// Shared list envelope for paginated endpoints.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}
