use actix_web::{web, HttpRequest, Responder};
use tracing::instrument;

use crate::{
    entities::message::{
        BulkDeleteMessagesRequest, ListMessagesQuery, NewMessageRequest, ReplyRequest,
        UpdateMessageStatusRequest,
    },
    errors::AppError,
    handlers::{created, ok},
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// Public contact-form endpoint; everything else under /messages is for
/// the dashboard.
#[instrument(skip(req, state, data))]
pub async fn submit_message(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: web::Json<NewMessageRequest>,
) -> Result<impl Responder, AppError> {
    let client_ip = get_client_ip(&req, true);
    let response = state
        .message_handler
        .submit(&client_ip, data.into_inner())
        .await?;
    Ok(created(response))
}

#[instrument(skip(state, query))]
pub async fn list_messages(
    state: web::Data<AppState>,
    query: web::Query<ListMessagesQuery>,
) -> Result<impl Responder, AppError> {
    let messages = state.message_handler.list(&query).await?;
    Ok(ok(messages))
}

#[instrument(skip(state))]
pub async fn unread_message_count(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let unread = state.message_handler.unread_count().await?;
    Ok(ok(serde_json::json!({ "unread": unread })))
}

#[instrument(skip(state))]
pub async fn get_message(
    message_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let message = state.message_handler.get(&message_id).await?;
    Ok(ok(message))
}

#[instrument(skip(state, data))]
pub async fn update_message_status(
    message_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateMessageStatusRequest>,
) -> Result<impl Responder, AppError> {
    let message = state
        .message_handler
        .set_status(&message_id, data.status)
        .await?;
    Ok(ok(message))
}

#[instrument(skip(state, data))]
pub async fn reply_to_message(
    message_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<ReplyRequest>,
) -> Result<impl Responder, AppError> {
    let message = state
        .message_handler
        .reply(&message_id, data.into_inner())
        .await?;
    Ok(ok(message))
}

#[instrument(skip(state))]
pub async fn delete_message(
    message_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.message_handler.delete(&message_id).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}

#[instrument(skip(state, data))]
pub async fn bulk_delete_messages(
    state: web::Data<AppState>,
    data: web::Json<BulkDeleteMessagesRequest>,
) -> Result<impl Responder, AppError> {
    let deleted = state.message_handler.bulk_delete(&data).await?;
    Ok(ok(serde_json::json!({ "deleted": deleted })))
}
