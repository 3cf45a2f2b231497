use actix_web::{web, Responder};
use tracing::instrument;

use crate::{
    entities::project::{
        BulkProjectImportRequest, ListProjectsQuery, NewProjectRequest, ReorderProjectsRequest,
        UpdateProjectRequest,
    },
    errors::AppError,
    handlers::{created, ok},
    AppState,
};

#[instrument(skip(state, data))]
pub async fn create_project(
    state: web::Data<AppState>,
    data: web::Json<NewProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.create(data.into_inner()).await?;
    Ok(created(project))
}

#[instrument(skip(state, data))]
pub async fn bulk_import_projects(
    state: web::Data<AppState>,
    data: web::Json<BulkProjectImportRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.project_handler.bulk_import(data.into_inner()).await?;
    Ok(created(response))
}

#[instrument(skip(state, query))]
pub async fn list_projects(
    state: web::Data<AppState>,
    query: web::Query<ListProjectsQuery>,
) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list(&query).await?;
    Ok(ok(projects))
}

#[instrument(skip(state))]
pub async fn get_project(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get(&project_id).await?;
    Ok(ok(project))
}

#[instrument(skip(state, data))]
pub async fn update_project(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state
        .project_handler
        .update(&project_id, data.into_inner())
        .await?;
    Ok(ok(project))
}

#[instrument(skip(state))]
pub async fn delete_project(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.project_handler.delete(&project_id).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}

#[instrument(skip(state, data))]
pub async fn reorder_projects(
    state: web::Data<AppState>,
    data: web::Json<ReorderProjectsRequest>,
) -> Result<impl Responder, AppError> {
    let updated = state.project_handler.reorder(data.into_inner()).await?;
    Ok(ok(serde_json::json!({ "updated": updated })))
}

#[instrument(skip(state))]
pub async fn project_stats(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let stats = state.project_handler.stats().await?;
    Ok(ok(stats))
}
