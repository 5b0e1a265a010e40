// src/routes/matches.rs
use actix_web::{delete, get, post, web, HttpResponse, Result};
use uuid::Uuid;

use crate::handlers::match_handler;
use crate::models::padel_match::{CreateMatchRequest, PointRequest};
use crate::services::MatchService;

/// Create a new match
#[post("/matches")]
pub async fn create_match(
    request: web::Json<CreateMatchRequest>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match_handler::create_match(request, service).await
}

/// List all matches, newest first
#[get("/matches")]
pub async fn list_matches(
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match_handler::list_matches(service).await
}

/// Get match details with sets and point history
#[get("/matches/{match_id}")]
pub async fn get_match(
    path: web::Path<Uuid>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    match_handler::get_match(match_id, service).await
}

/// Score a point for team 1 or 2
#[post("/matches/{match_id}/point")]
pub async fn record_point(
    path: web::Path<Uuid>,
    request: web::Json<PointRequest>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    match_handler::record_point(match_id, request, service).await
}

/// Undo the last point
#[post("/matches/{match_id}/undo")]
pub async fn undo_last_point(
    path: web::Path<Uuid>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    match_handler::undo_last_point(match_id, service).await
}

/// Delete a match and everything recorded for it
#[delete("/matches/{match_id}")]
pub async fn delete_match(
    path: web::Path<Uuid>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    match_handler::delete_match(match_id, service).await
}
