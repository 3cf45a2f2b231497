use actix_web::web;

use crate::handlers::outreach;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/outreach")
            .service(
                web::scope("/companies")
                    .service(
                        web::resource("")
                            .route(web::post().to(outreach::create_company))
                            .route(web::get().to(outreach::list_companies)),
                    )
                    .service(
                        web::resource("/import").route(web::post().to(outreach::import_companies)),
                    )
                    .service(
                        web::resource("/{company_id}")
                            .route(web::get().to(outreach::get_company))
                            .route(web::patch().to(outreach::update_company))
                            .route(web::delete().to(outreach::delete_company)),
                    )
                    .service(
                        web::resource("/{company_id}/star")
                            .route(web::patch().to(outreach::star_company)),
                    )
                    .service(
                        web::resource("/{company_id}/archive")
                            .route(web::patch().to(outreach::archive_company)),
                    ),
            )
            .service(
                web::scope("/contacts")
                    .service(
                        web::resource("")
                            .route(web::post().to(outreach::create_contact))
                            .route(web::get().to(outreach::list_contacts)),
                    )
                    .service(
                        web::resource("/import").route(web::post().to(outreach::import_contacts)),
                    )
                    .service(
                        web::resource("/{contact_id}")
                            .route(web::get().to(outreach::get_contact))
                            .route(web::patch().to(outreach::update_contact))
                            .route(web::delete().to(outreach::delete_contact)),
                    )
                    .service(
                        web::resource("/{contact_id}/star")
                            .route(web::patch().to(outreach::star_contact)),
                    ),
            )
            .service(
                web::scope("/templates")
                    .service(
                        web::resource("")
                            .route(web::post().to(outreach::create_template))
                            .route(web::get().to(outreach::list_templates)),
                    )
                    .service(
                        web::resource("/{template_id}")
                            .route(web::get().to(outreach::get_template))
                            .route(web::patch().to(outreach::update_template))
                            .route(web::delete().to(outreach::delete_template)),
                    )
                    .service(
                        web::resource("/{template_id}/render")
                            .route(web::post().to(outreach::render_template)),
                    ),
            )
            .service(
                web::scope("/emails")
                    .service(
                        web::resource("")
                            .route(web::post().to(outreach::log_email))
                            .route(web::get().to(outreach::list_emails)),
                    )
                    .service(
                        web::resource("/follow-ups/due")
                            .route(web::get().to(outreach::due_follow_ups)),
                    )
                    .service(
                        web::resource("/{email_id}")
                            .route(web::get().to(outreach::get_email))
                            .route(web::delete().to(outreach::delete_email)),
                    )
                    .service(
                        web::resource("/{email_id}/reply")
                            .route(web::post().to(outreach::mark_replied)),
                    )
                    .service(
                        web::resource("/{email_id}/close")
                            .route(web::post().to(outreach::close_email)),
                    )
                    .service(
                        web::resource("/{email_id}/follow-up")
                            .route(web::post().to(outreach::schedule_follow_up)),
                    ),
            )
            .service(web::resource("/ai/draft").route(web::post().to(outreach::draft_email)))
            .service(web::resource("/drafts").route(web::get().to(outreach::list_drafts)))
            .service(web::resource("/stats").route(web::get().to(outreach::outreach_stats))),
    );
}
