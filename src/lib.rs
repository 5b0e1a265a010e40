use actix_web::{http, web, App, HttpServer};
use actix_web::dev::Server;
use tracing_actix_web::TracingLogger;
use std::net::TcpListener;
use actix_cors::Cors;

pub mod config;
mod routes;
mod handlers;
pub mod models;
pub mod db;
pub mod scoring;
pub mod services;
pub mod telemetry;
use crate::routes::init_routes;
use crate::config::settings::CorsSettings;
use crate::models::error::MatchError;
use crate::services::MatchService;

fn build_cors(settings: &CorsSettings) -> Cors {
    let cors = if settings.allow_any_origin {
        Cors::default().allow_any_origin()
    } else {
        settings
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "DELETE"])
        .allowed_headers(vec![
            http::header::ACCEPT,
            http::header::CONTENT_TYPE,
        ])
        .max_age(3600)
}

pub fn run(
    listener: TcpListener,
    match_service: MatchService,
    cors_settings: CorsSettings,
) -> Result<Server, std::io::Error> {
    // Wrap using web::Data, which boils down to an Arc smart pointer
    let match_service = web::Data::new(match_service);

    let server = HttpServer::new( move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(build_cors(&cors_settings))
            .app_data(match_service.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                MatchError::Validation(format!("Invalid request body: {}", err)).into()
            }))
            // Ids that are not UUIDs cannot name a stored match
            .app_data(web::PathConfig::default().error_handler(|_err, _req| {
                MatchError::NotFound("Match not found".to_string()).into()
            }))
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
