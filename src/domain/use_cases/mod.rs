pub mod blog;
pub mod message;
pub mod notification;
pub mod outreach;
pub mod portfolio;
pub mod project;
pub mod stats;

const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 100;

/// Resolve page/per_page query values into sane bounds.
pub(crate) fn page_params(page: Option<u32>, per_page: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    (page, per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_clamp_out_of_range_values() {
        assert_eq!(page_params(None, None), (1, 20));
        assert_eq!(page_params(Some(0), Some(0)), (1, 1));
        assert_eq!(page_params(Some(3), Some(500)), (3, 100));
    }
}
