use actix_web::{web, Responder};
use tracing::instrument;

use crate::{
    entities::blog_post::{
        EngagementCounter, ListBlogPostsQuery, NewBlogPostRequest, UpdateBlogPostRequest,
    },
    errors::AppError,
    handlers::{created, ok},
    AppState,
};

#[instrument(skip(state, data))]
pub async fn create_blog_post(
    state: web::Data<AppState>,
    data: web::Json<NewBlogPostRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.blog_handler.create(data.into_inner()).await?;
    Ok(created(response))
}

#[instrument(skip(state, query))]
pub async fn list_blog_posts(
    state: web::Data<AppState>,
    query: web::Query<ListBlogPostsQuery>,
) -> Result<impl Responder, AppError> {
    let posts = state.blog_handler.list(&query).await?;
    Ok(ok(posts))
}

#[instrument(skip(state))]
pub async fn get_blog_post(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.get_by_slug(&slug).await?;
    Ok(ok(post))
}

#[instrument(skip(state, data))]
pub async fn update_blog_post(
    slug: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateBlogPostRequest>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.update(&slug, data.into_inner()).await?;
    Ok(ok(post))
}

#[instrument(skip(state, query))]
pub async fn delete_blog_post(
    slug: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let hard_delete = query
        .get("hard_delete")
        .map(|v| v == "true")
        .unwrap_or(false);

    state.blog_handler.delete(&slug, hard_delete).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}

#[instrument(skip(state))]
pub async fn increment_counter(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (slug, counter) = path.into_inner();
    let counter: EngagementCounter = counter
        .parse()
        .map_err(|_| AppError::InvalidInput("Unknown counter".to_string()))?;

    let value = state.blog_handler.increment_counter(&slug, counter).await?;
    Ok(ok(value))
}
