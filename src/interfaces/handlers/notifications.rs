use actix_web::{web, Responder};
use tracing::instrument;

use crate::{
    entities::notification::{
        BulkDeleteNotificationsRequest, ListNotificationsQuery, NewNotificationRequest,
    },
    errors::AppError,
    handlers::{created, ok},
    AppState,
};

#[instrument(skip(state, data))]
pub async fn create_notification(
    state: web::Data<AppState>,
    data: web::Json<NewNotificationRequest>,
) -> Result<impl Responder, AppError> {
    let notification = state.notification_handler.create(data.into_inner()).await?;
    Ok(created(notification))
}

#[instrument(skip(state, query))]
pub async fn list_notifications(
    state: web::Data<AppState>,
    query: web::Query<ListNotificationsQuery>,
) -> Result<impl Responder, AppError> {
    let notifications = state.notification_handler.list(&query).await?;
    Ok(ok(notifications))
}

#[instrument(skip(state))]
pub async fn unread_notification_count(
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let unread = state.notification_handler.unread_count().await?;
    Ok(ok(serde_json::json!({ "unread": unread })))
}

#[instrument(skip(state))]
pub async fn mark_notification_read(
    notification_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let notification = state
        .notification_handler
        .mark_read(&notification_id)
        .await?;
    Ok(ok(notification))
}

#[instrument(skip(state))]
pub async fn mark_all_notifications_read(
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let updated = state.notification_handler.mark_all_read().await?;
    Ok(ok(serde_json::json!({ "updated": updated })))
}

#[instrument(skip(state))]
pub async fn delete_notification(
    notification_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.notification_handler.delete(&notification_id).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}

#[instrument(skip(state, data))]
pub async fn bulk_delete_notifications(
    state: web::Data<AppState>,
    data: web::Json<BulkDeleteNotificationsRequest>,
) -> Result<impl Responder, AppError> {
    let deleted = state.notification_handler.bulk_delete(&data).await?;
    Ok(ok(serde_json::json!({ "deleted": deleted })))
}
