use actix_web::web;

use crate::handlers::projects;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .service(
                web::resource("")
                    .route(web::post().to(projects::create_project))
                    .route(web::get().to(projects::list_projects)),
            )
            .service(web::resource("/bulk").route(web::post().to(projects::bulk_import_projects)))
            .service(web::resource("/reorder").route(web::patch().to(projects::reorder_projects)))
            .service(web::resource("/stats").route(web::get().to(projects::project_stats)))
            .service(
                web::resource("/{project_id}")
                    .route(web::get().to(projects::get_project))
                    .route(web::patch().to(projects::update_project))
                    .route(web::delete().to(projects::delete_project)),
            ),
    );
}
