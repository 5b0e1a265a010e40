use actix_web::web;

pub mod backend_health;
pub mod matches;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    cfg.service(
        web::scope("/api")
            .service(matches::create_match)
            .service(matches::list_matches)
            .service(matches::get_match)
            .service(matches::record_point)
            .service(matches::undo_last_point)
            .service(matches::delete_match)
    );
}
