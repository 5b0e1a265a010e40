use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use uuid::Uuid;

use crate::models::padel_match::{CreateMatchRequest, PointRequest, PointResponse};
use crate::services::MatchService;

#[tracing::instrument(name = "Creating a new match", skip(request, service))]
pub async fn create_match(
    request: web::Json<CreateMatchRequest>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let padel_match = service.create_match(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(padel_match))
}

#[tracing::instrument(name = "Listing matches", skip(service))]
pub async fn list_matches(service: web::Data<MatchService>) -> Result<HttpResponse> {
    let matches = service.list_matches().await?;
    Ok(HttpResponse::Ok().json(matches))
}

#[tracing::instrument(name = "Fetching match details", skip(service))]
pub async fn get_match(match_id: Uuid, service: web::Data<MatchService>) -> Result<HttpResponse> {
    let detail = service.get_match(match_id).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[tracing::instrument(
    name = "Recording a point",
    skip(request, service),
    fields(team = ?request.team)
)]
pub async fn record_point(
    match_id: Uuid,
    request: web::Json<PointRequest>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let outcome = service.record_point(match_id, request.team).await?;
    Ok(HttpResponse::Ok().json(PointResponse {
        success: true,
        outcome,
    }))
}

#[tracing::instrument(name = "Undoing last point", skip(service))]
pub async fn undo_last_point(match_id: Uuid, service: web::Data<MatchService>) -> Result<HttpResponse> {
    service.undo_last_point(match_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[tracing::instrument(name = "Deleting a match", skip(service))]
pub async fn delete_match(match_id: Uuid, service: web::Data<MatchService>) -> Result<HttpResponse> {
    service.delete_match(match_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
