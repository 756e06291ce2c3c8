use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::api::dtos::{CreateRepairRequest, RepairQueryParams, UpdateRepairRequest};
use crate::api::routes::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedActor;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/repairs")
            .route("", web::get().to(list_repairs))
            .route("", web::post().to(create_repair))
            .route("/{id}", web::get().to(get_repair))
            .route("/{id}", web::put().to(update_repair))
            .route("/{id}", web::delete().to(delete_repair))
            .route("/{id}/history", web::get().to(repair_history)),
    );
}

async fn list_repairs(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    query: web::Query<RepairQueryParams>,
) -> AppResult<HttpResponse> {
    let result = state
        .repair_service
        .list(actor.actor(), query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn get_repair(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state
        .repair_service
        .get_by_id(actor.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn repair_history(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state
        .repair_service
        .history(actor.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn create_repair(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    payload: web::Json<CreateRepairRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .repair_service
        .create(actor.actor(), payload.into_inner())
        .await?;
    state.metrics.record_repair_created();
    Ok(HttpResponse::Created().json(result))
}

async fn update_repair(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateRepairRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .repair_service
        .update(actor.actor(), path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_repair(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .repair_service
        .delete(actor.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
