use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod blogs;
mod json_error;
mod messages;
mod notifications;
mod outreach;
mod portfolio;
mod projects;
mod stats;
mod uploads;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api/v1")
            .service(health_check)
            .configure(blogs::config_routes)
            .configure(projects::config_routes)
            .configure(messages::config_routes)
            .configure(notifications::config_routes)
            .configure(portfolio::config_routes)
            .configure(outreach::config_routes)
            .configure(stats::config_routes)
            .configure(uploads::config_routes),
    );

    cfg.configure(json_error::config_routes);
}
