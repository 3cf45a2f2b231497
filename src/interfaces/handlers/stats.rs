use actix_web::{web, Responder};
use tracing::instrument;

use crate::{errors::AppError, handlers::ok, AppState};

#[instrument(skip(state))]
pub async fn dashboard_stats(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let stats = state.stats_handler.dashboard().await?;
    Ok(ok(stats))
}
