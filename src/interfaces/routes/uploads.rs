use actix_web::web;

use crate::handlers::uploads;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/uploads")
            .service(web::resource("").route(web::post().to(uploads::upload_image)))
            .service(
                // CDN public ids may contain slashes.
                web::resource("/{public_id:.*}").route(web::delete().to(uploads::delete_image)),
            ),
    );
}
