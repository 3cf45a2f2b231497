use actix_web::HttpResponse;
use serde::Serialize;

pub mod blog_posts;
pub mod home;
pub mod messages;
pub mod notifications;
pub mod outreach;
pub mod portfolio;
pub mod projects;
pub mod stats;
pub mod system;
pub mod uploads;

/// 200 response in the standard `{"success": true, "data": ...}` envelope.
pub(crate) fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "success": true, "data": data }))
}

/// 201 response in the standard envelope.
pub(crate) fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(serde_json::json!({ "success": true, "data": data }))
}
