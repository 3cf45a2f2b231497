use actix_web::web;

use crate::handlers::portfolio;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/skills")
            .service(
                web::resource("")
                    .route(web::post().to(portfolio::create_skill))
                    .route(web::get().to(portfolio::list_skills)),
            )
            .service(
                web::resource("/{skill_id}")
                    .route(web::patch().to(portfolio::update_skill))
                    .route(web::delete().to(portfolio::delete_skill)),
            ),
    );

    cfg.service(
        web::scope("/achievements")
            .service(
                web::resource("")
                    .route(web::post().to(portfolio::create_achievement))
                    .route(web::get().to(portfolio::list_achievements)),
            )
            .service(
                web::resource("/{achievement_id}")
                    .route(web::patch().to(portfolio::update_achievement))
                    .route(web::delete().to(portfolio::delete_achievement)),
            ),
    );

    cfg.service(
        web::scope("/counters").service(
            web::resource("")
                .route(web::get().to(portfolio::list_counters))
                .route(web::put().to(portfolio::upsert_counter)),
        ),
    );
}
