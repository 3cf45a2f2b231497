use actix_web::web;

use crate::handlers::stats;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stats")
            .service(web::resource("/dashboard").route(web::get().to(stats::dashboard_stats))),
    );
}
