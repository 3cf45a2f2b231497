pub mod blog_post;
pub mod message;
pub mod notification;
pub mod outreach;
pub mod portfolio;
pub mod project;
pub mod sqlx_repo;
pub mod stats;

/// Computes OFFSET from 1-based `page` and `per_page`.
pub(crate) fn page_offset(page: u32, per_page: u32) -> i64 {
    let page = page.saturating_sub(1);
    (page as i64) * (per_page as i64)
}
