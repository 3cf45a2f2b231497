use actix_web::web;

use crate::handlers::messages;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/messages")
            .service(
                web::resource("")
                    .route(web::post().to(messages::submit_message))
                    .route(web::get().to(messages::list_messages)),
            )
            .service(
                web::resource("/unread-count")
                    .route(web::get().to(messages::unread_message_count)),
            )
            .service(
                web::resource("/bulk-delete")
                    .route(web::post().to(messages::bulk_delete_messages)),
            )
            .service(
                web::resource("/{message_id}")
                    .route(web::get().to(messages::get_message))
                    .route(web::delete().to(messages::delete_message)),
            )
            .service(
                web::resource("/{message_id}/status")
                    .route(web::patch().to(messages::update_message_status)),
            )
            .service(
                web::resource("/{message_id}/reply")
                    .route(web::post().to(messages::reply_to_message)),
            ),
    );
}
