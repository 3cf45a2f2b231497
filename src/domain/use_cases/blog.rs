use chrono::Utc;
use validator::Validate;

use crate::{
    entities::{
        blog_post::{
            estimate_read_time, BlogPostCreated, BlogPostDetail, BlogPostListItem,
            CounterValue, EngagementCounter, ListBlogPostsQuery, NewBlogPostRequest,
            PostStatus, UpdateBlogPostRequest,
        },
        option_fields::OptionField,
        Paginated,
    },
    errors::AppError,
    repositories::blog_post::BlogPostRepository,
    use_cases::page_params,
    utils::sanitize::sanitize_html,
};

pub struct BlogHandler<R>
where
    R: BlogPostRepository,
{
    pub repo: R,
}

impl<R> BlogHandler<R>
where
    R: BlogPostRepository,
{
    pub fn new(repo: R) -> Self {
        BlogHandler { repo }
    }

    pub async fn create(&self, request: NewBlogPostRequest) -> Result<BlogPostCreated, AppError> {
        let mut insert = request.into_insert()?;
        insert.slug = self.unique_slug(&insert.title, None).await?;

        let post = self.repo.create(&insert).await?;

        Ok(BlogPostCreated {
            id: post.id,
            preview_url: format!("/blog/{}", post.slug),
            slug: post.slug,
        })
    }

    pub async fn list(
        &self,
        query: &ListBlogPostsQuery,
    ) -> Result<Paginated<BlogPostListItem>, AppError> {
        let (page, per_page) = page_params(query.page, query.per_page);
        let (posts, total) = self.repo.list(query, page, per_page).await?;

        Ok(Paginated {
            items: posts.iter().map(|p| p.to_list_item()).collect(),
            total,
            page,
            per_page,
        })
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<BlogPostDetail, AppError> {
        let post = self.repo.get_by_slug(slug).await.map_err(not_found)?;
        Ok(post.to_detail())
    }

    pub async fn update(
        &self,
        slug: &str,
        mut patch: UpdateBlogPostRequest,
    ) -> Result<BlogPostDetail, AppError> {
        patch.validate()?;

        let current = self.repo.get_by_slug(slug).await.map_err(not_found)?;

        // Sanitized content drives a fresh read-time estimate.
        let mut read_time = None;
        patch.content_html = patch.content_html.map_value(|html| {
            let clean = sanitize_html(&html);
            read_time = Some(estimate_read_time(&clean));
            clean
        });

        // The slug follows the title, kept unique against other live posts.
        let new_slug = match patch.title.flatten_str() {
            Some(title) if title != current.title => {
                self.unique_slug(title, Some(current.id)).await?
            }
            _ => current.slug.clone(),
        };

        // Publication timestamp: an explicit value always wins, null clears
        // it, and a draft flipping to published without one gets stamped now.
        let new_status = patch.status.flatten_ref().copied().unwrap_or(current.status);
        let published_at = match &patch.published_at {
            OptionField::SetToValue(at) => Some(*at),
            OptionField::SetToNull => None,
            OptionField::Unchanged => match (current.status, new_status, current.published_at) {
                (PostStatus::Draft, PostStatus::Published, None) => Some(Utc::now()),
                (_, _, existing) => existing,
            },
        };

        let updated = self
            .repo
            .update(&current.id, &patch, &new_slug, read_time, published_at)
            .await?;

        Ok(updated.to_detail())
    }

    pub async fn delete(&self, slug: &str, hard_delete: bool) -> Result<(), AppError> {
        let post = self.repo.get_by_slug(slug).await.map_err(not_found)?;

        if hard_delete {
            self.repo.hard_delete(&post.id).await
        } else {
            self.repo.soft_delete(&post.id).await
        }
    }

    pub async fn increment_counter(
        &self,
        slug: &str,
        counter: EngagementCounter,
    ) -> Result<CounterValue, AppError> {
        let value = self
            .repo
            .increment_counter(slug, counter)
            .await
            .map_err(not_found)?;

        Ok(CounterValue {
            counter: counter.column(),
            value,
        })
    }

    /// Slugify the title and probe for collisions, appending `-1`, `-2`, ...
    /// until a free slug is found among non-deleted posts.
    async fn unique_slug(&self, title: &str, exclude_id: Option<uuid::Uuid>) -> Result<String, AppError> {
        let base = slug::slugify(title);
        if base.is_empty() {
            return Err(AppError::field(
                "title",
                "Title must contain alphanumeric characters",
            ));
        }

        if !self.repo.slug_exists(&base, exclude_id).await? {
            return Ok(base);
        }

        for suffix in 1.. {
            let candidate = format!("{}-{}", base, suffix);
            if !self.repo.slug_exists(&candidate, exclude_id).await? {
                return Ok(candidate);
            }
        }

        unreachable!()
    }
}

fn not_found(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => AppError::NotFound("Blog post not found".to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::blog_post::MockBlogPostRepository;
    use mockall::predicate::eq;

    fn new_request(title: &str) -> NewBlogPostRequest {
        NewBlogPostRequest {
            title: title.to_string(),
            excerpt: "An excerpt".into(),
            content_html: "<p>Body</p>".into(),
            category: "general".into(),
            tags: vec![],
            author: None,
            status: PostStatus::Draft,
            published_at: None,
        }
    }

    fn stored_post(slug: &str) -> crate::entities::blog_post::BlogPost {
        crate::entities::blog_post::BlogPost {
            id: uuid::Uuid::new_v4(),
            title: "Hello World".into(),
            slug: slug.to_string(),
            excerpt: "An excerpt".into(),
            content_html: "<p>Body</p>".into(),
            category: "general".into(),
            tags: vec![],
            author: None,
            status: PostStatus::Draft,
            published_at: None,
            read_time: 1,
            views: 0,
            likes: 0,
            comments: 0,
            shares: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_slugifies_the_title() {
        let mut repo = MockBlogPostRepository::new();
        repo.expect_slug_exists()
            .with(eq("hello-world"), eq(None))
            .returning(|_, _| Ok(false));
        repo.expect_create()
            .withf(|insert| insert.slug == "hello-world")
            .returning(|_| Ok(stored_post("hello-world")));

        let handler = BlogHandler::new(repo);
        let created = handler.create(new_request("Hello World")).await.unwrap();

        assert_eq!(created.slug, "hello-world");
        assert_eq!(created.preview_url, "/blog/hello-world");
    }

    #[tokio::test]
    async fn create_appends_suffix_on_slug_collision() {
        let mut repo = MockBlogPostRepository::new();
        repo.expect_slug_exists()
            .with(eq("hello-world"), eq(None))
            .returning(|_, _| Ok(true));
        repo.expect_slug_exists()
            .with(eq("hello-world-1"), eq(None))
            .returning(|_, _| Ok(true));
        repo.expect_slug_exists()
            .with(eq("hello-world-2"), eq(None))
            .returning(|_, _| Ok(false));
        repo.expect_create()
            .withf(|insert| insert.slug == "hello-world-2")
            .returning(|_| Ok(stored_post("hello-world-2")));

        let handler = BlogHandler::new(repo);
        let created = handler.create(new_request("Hello World")).await.unwrap();

        assert_eq!(created.slug, "hello-world-2");
    }

    #[tokio::test]
    async fn symbol_only_title_is_rejected() {
        let mut repo = MockBlogPostRepository::new();
        repo.expect_slug_exists().never();

        let handler = BlogHandler::new(repo);
        let err = handler.create(new_request("!!!")).await.unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn update_restamps_published_at_on_publish() {
        let current = stored_post("hello-world");
        let current_id = current.id;

        let mut repo = MockBlogPostRepository::new();
        repo.expect_get_by_slug()
            .with(eq("hello-world"))
            .return_once(move |_| Ok(current));
        repo.expect_update()
            .withf(move |id, _, slug, _, published_at| {
                *id == current_id && slug == "hello-world" && published_at.is_some()
            })
            .returning(|id, _, slug, _, published_at| {
                let mut post = stored_post(slug);
                post.id = *id;
                post.status = PostStatus::Published;
                post.published_at = published_at;
                Ok(post)
            });

        let handler = BlogHandler::new(repo);
        let patch = UpdateBlogPostRequest {
            status: OptionField::SetToValue(PostStatus::Published),
            ..Default::default()
        };

        let updated = handler.update("hello-world", patch).await.unwrap();
        assert!(updated.published_at.is_some());
    }

    #[tokio::test]
    async fn counter_bump_reports_the_new_value() {
        let mut repo = MockBlogPostRepository::new();
        repo.expect_increment_counter()
            .with(eq("hello-world"), eq(EngagementCounter::Likes))
            .returning(|_, _| Ok(7));

        let handler = BlogHandler::new(repo);
        let result = handler
            .increment_counter("hello-world", EngagementCounter::Likes)
            .await
            .unwrap();

        assert_eq!(result.counter, "likes");
        assert_eq!(result.value, 7);
    }
}
