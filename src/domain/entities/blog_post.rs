use std::borrow::Cow;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    constants::READ_TIME_WPM,
    entities::option_fields::OptionField,
    utils::sanitize::sanitize_html,
};

// ───── Constants ──────────────────────────────────────────────────────
const MIN_TITLE_LENGTH: u64 = 3;
const MAX_TITLE_LENGTH: u64 = 150;
const MAX_EXCERPT_LENGTH: u64 = 300;
const MAX_CATEGORY_LENGTH: u64 = 50;
const MAX_TAGS: usize = 10;
const MAX_TAG_LENGTH: usize = 30;

// ───── Enums ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl FromStr for PostStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            _ => Err(()),
        }
    }
}

/// Engagement counters a visitor can bump through the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementCounter {
    Views,
    Likes,
    Shares,
}

impl EngagementCounter {
    pub fn column(&self) -> &'static str {
        match self {
            EngagementCounter::Views => "views",
            EngagementCounter::Likes => "likes",
            EngagementCounter::Shares => "shares",
        }
    }
}

impl FromStr for EngagementCounter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "views" => Ok(EngagementCounter::Views),
            "likes" => Ok(EngagementCounter::Likes),
            "shares" => Ok(EngagementCounter::Shares),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CounterValue {
    pub counter: &'static str,
    pub value: i64,
}

/// Embedded author document (JSONB column).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Author {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 500))]
    pub bio: Option<String>,

    #[validate(custom(function = "validate_optional_http_url"))]
    pub avatar_url: Option<String>,

    #[validate(custom(function = "validate_optional_http_url"))]
    pub website: Option<String>,
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct BlogPostRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content_html: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Option<Json<Author>>,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: i32,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content_html: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Option<Author>,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: i32,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct BlogPostInsert {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content_html: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Option<Author>,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: i32,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BlogPostListItem {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: i32,
    pub views: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BlogPostDetail {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content_html: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Option<Author>,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: i32,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BlogPostCreated {
    pub id: Uuid,
    pub slug: String,
    pub preview_url: String,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewBlogPostRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(length(min = 1, max = MAX_EXCERPT_LENGTH))]
    pub excerpt: String,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content_html: String,

    #[serde(default = "default_category")]
    #[validate(length(min = 1, max = MAX_CATEGORY_LENGTH))]
    pub category: String,

    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,

    #[validate(nested)]
    pub author: Option<Author>,

    #[serde(default = "default_status")]
    pub status: PostStatus,

    pub published_at: Option<DateTime<Utc>>,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_status() -> PostStatus {
    PostStatus::Draft
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateBlogPostRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_optional_title")
    )]
    pub title: OptionField<String>,

    #[validate(length(min = 1, max = MAX_EXCERPT_LENGTH))]
    pub excerpt: OptionField<String>,

    pub content_html: OptionField<String>,

    #[validate(length(min = 1, max = MAX_CATEGORY_LENGTH))]
    pub category: OptionField<String>,

    #[validate(custom(function = "validate_optional_tags"))]
    pub tags: OptionField<Vec<String>>,

    pub author: OptionField<Author>,

    pub status: OptionField<PostStatus>,

    pub published_at: OptionField<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ListBlogPostsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<PostStatus>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

// ───── Validation Helpers ───────────────────────────────────────────

pub fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        Ok(_) => Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://")),
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

fn validate_optional_http_url(url: &str) -> Result<(), ValidationError> {
    validate_http_url(url)
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().len() != title.len() {
        return Err(new_validation_error("title_whitespace", "Title must not have leading or trailing whitespace"));
    }
    Ok(())
}

fn validate_optional_title(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(title) = value {
        validate_title(title)?;
    }
    Ok(())
}

pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(new_validation_error("too_many_tags", "Too many tags provided"));
    }
    for tag in tags {
        if tag.is_empty() || tag.len() > MAX_TAG_LENGTH {
            return Err(new_validation_error("invalid_tag_length", "Tag length must be within allowed range"));
        }
        if !tag.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(new_validation_error("invalid_tag_chars", "Tags must be alphanumeric or hyphens"));
        }
    }
    Ok(())
}

fn validate_optional_tags(value: &OptionField<Vec<String>>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(tags) = value {
        validate_tags(tags)?;
    }
    Ok(())
}

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

// ───── Derivations ──────────────────────────────────────────────────

/// Fallback read-time estimate: ceil(words / 200), at least one minute.
/// Tags are stripped first so markup does not inflate the word count.
pub fn estimate_read_time(content_html: &str) -> i32 {
    let mut text = String::with_capacity(content_html.len());
    let mut in_tag = false;
    for c in content_html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                text.push(' ');
            }
            c if !in_tag => text.push(c),
            _ => {}
        }
    }

    let words = text.split_whitespace().count();
    (words.div_ceil(READ_TIME_WPM)).max(1) as i32
}

// ───── Conversions ──────────────────────────────────────────────────

impl From<BlogPostRow> for BlogPost {
    fn from(row: BlogPostRow) -> Self {
        BlogPost {
            id: row.id,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            content_html: row.content_html,
            category: row.category,
            tags: row.tags,
            author: row.author.map(|a| a.0),
            status: row.status.parse().unwrap_or(PostStatus::Draft),
            published_at: row.published_at,
            read_time: row.read_time,
            views: row.views,
            likes: row.likes,
            comments: row.comments,
            shares: row.shares,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl NewBlogPostRequest {
    /// Validates and shapes the request into an insertable post.
    /// The slug is filled in later by the uniqueness loop in the use case.
    pub fn into_insert(self) -> Result<BlogPostInsert, validator::ValidationErrors> {
        self.validate()?;

        let content_html = sanitize_html(&self.content_html);
        let read_time = estimate_read_time(&content_html);

        let published_at = match (self.status, self.published_at) {
            (PostStatus::Published, None) => Some(Utc::now()),
            (_, explicit) => explicit,
        };

        Ok(BlogPostInsert {
            title: self.title,
            slug: String::new(),
            excerpt: self.excerpt,
            content_html,
            category: self.category,
            tags: self.tags,
            author: self.author,
            status: self.status,
            published_at,
            read_time,
        })
    }
}

impl BlogPost {
    pub fn to_list_item(&self) -> BlogPostListItem {
        BlogPostListItem {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            status: self.status,
            published_at: self.published_at,
            read_time: self.read_time,
            views: self.views,
            updated_at: self.updated_at,
        }
    }

    pub fn to_detail(&self) -> BlogPostDetail {
        BlogPostDetail {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            content_html: self.content_html.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            author: self.author.clone(),
            status: self.status,
            published_at: self.published_at,
            read_time: self.read_time,
            views: self.views,
            likes: self.likes,
            comments: self.comments,
            shares: self.shares,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_time_rounds_up_and_floors_at_one() {
        assert_eq!(estimate_read_time("<p>short post</p>"), 1);

        let words = vec!["word"; 401].join(" ");
        assert_eq!(estimate_read_time(&words), 3);
    }

    #[test]
    fn read_time_ignores_markup() {
        let html = format!("<article class=\"post\">{}</article>", vec!["w"; 200].join(" "));
        assert_eq!(estimate_read_time(&html), 1);
    }

    #[test]
    fn new_post_published_without_date_gets_one() {
        let request = NewBlogPostRequest {
            title: "Hello World".into(),
            excerpt: "Greetings".into(),
            content_html: "<p>Hello</p>".into(),
            category: "general".into(),
            tags: vec![],
            author: None,
            status: PostStatus::Published,
            published_at: None,
        };

        let insert = request.into_insert().unwrap();
        assert!(insert.published_at.is_some());
    }

    #[test]
    fn draft_keeps_published_at_empty() {
        let request = NewBlogPostRequest {
            title: "Hello World".into(),
            excerpt: "Greetings".into(),
            content_html: "<p>Hello</p>".into(),
            category: "general".into(),
            tags: vec![],
            author: None,
            status: PostStatus::Draft,
            published_at: None,
        };

        let insert = request.into_insert().unwrap();
        assert!(insert.published_at.is_none());
    }

    #[test]
    fn tags_reject_punctuation() {
        assert!(validate_tags(&["rust".into(), "web-dev".into()]).is_ok());
        assert!(validate_tags(&["bad tag!".into()]).is_err());
    }
}
