use actix_web::{web, Responder};
use tracing::instrument;

use crate::{
    entities::portfolio::{
        NewAchievementRequest, NewSkillRequest, UpdateAchievementRequest, UpdateSkillRequest,
        UpsertStatCounterRequest,
    },
    errors::AppError,
    handlers::{created, ok},
    AppState,
};

#[instrument(skip(state, data))]
pub async fn create_skill(
    state: web::Data<AppState>,
    data: web::Json<NewSkillRequest>,
) -> Result<impl Responder, AppError> {
    let skill = state.portfolio_handler.create_skill(data.into_inner()).await?;
    Ok(created(skill))
}

#[instrument(skip(state))]
pub async fn list_skills(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let skills = state.portfolio_handler.list_skills().await?;
    Ok(ok(skills))
}

#[instrument(skip(state, data))]
pub async fn update_skill(
    skill_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateSkillRequest>,
) -> Result<impl Responder, AppError> {
    let skill = state
        .portfolio_handler
        .update_skill(&skill_id, data.into_inner())
        .await?;
    Ok(ok(skill))
}

#[instrument(skip(state))]
pub async fn delete_skill(
    skill_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.portfolio_handler.delete_skill(&skill_id).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}

#[instrument(skip(state, data))]
pub async fn create_achievement(
    state: web::Data<AppState>,
    data: web::Json<NewAchievementRequest>,
) -> Result<impl Responder, AppError> {
    let achievement = state
        .portfolio_handler
        .create_achievement(data.into_inner())
        .await?;
    Ok(created(achievement))
}

#[instrument(skip(state))]
pub async fn list_achievements(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let achievements = state.portfolio_handler.list_achievements().await?;
    Ok(ok(achievements))
}

#[instrument(skip(state, data))]
pub async fn update_achievement(
    achievement_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateAchievementRequest>,
) -> Result<impl Responder, AppError> {
    let achievement = state
        .portfolio_handler
        .update_achievement(&achievement_id, data.into_inner())
        .await?;
    Ok(ok(achievement))
}

#[instrument(skip(state))]
pub async fn delete_achievement(
    achievement_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state
        .portfolio_handler
        .delete_achievement(&achievement_id)
        .await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}

#[instrument(skip(state))]
pub async fn list_counters(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let counters = state.portfolio_handler.list_counters().await?;
    Ok(ok(counters))
}

#[instrument(skip(state, data))]
pub async fn upsert_counter(
    state: web::Data<AppState>,
    data: web::Json<UpsertStatCounterRequest>,
) -> Result<impl Responder, AppError> {
    let counter = state
        .portfolio_handler
        .upsert_counter(data.into_inner())
        .await?;
    Ok(ok(counter))
}
