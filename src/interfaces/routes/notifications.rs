use actix_web::web;

use crate::handlers::notifications;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .service(
                web::resource("")
                    .route(web::post().to(notifications::create_notification))
                    .route(web::get().to(notifications::list_notifications)),
            )
            .service(
                web::resource("/unread-count")
                    .route(web::get().to(notifications::unread_notification_count)),
            )
            .service(
                web::resource("/read-all")
                    .route(web::post().to(notifications::mark_all_notifications_read)),
            )
            .service(
                web::resource("/bulk-delete")
                    .route(web::post().to(notifications::bulk_delete_notifications)),
            )
            .service(
                web::resource("/{notification_id}")
                    .route(web::delete().to(notifications::delete_notification)),
            )
            .service(
                web::resource("/{notification_id}/read")
                    .route(web::post().to(notifications::mark_notification_read)),
            ),
    );
}
