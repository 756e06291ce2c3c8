use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::api::dtos::{SparePartQueryParams, SparePartRequest, SparePartTypeRequest};
use crate::api::routes::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedActor;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/spare-part-types")
            .route("", web::get().to(list_types))
            .route("", web::post().to(create_type))
            .route("/{id}", web::get().to(get_type))
            .route("/{id}", web::put().to(update_type))
            .route("/{id}", web::delete().to(delete_type)),
    )
    .service(
        web::scope("/spare-parts")
            .route("", web::get().to(list_parts))
            .route("", web::post().to(create_part))
            .route("/{id}", web::get().to(get_part))
            .route("/{id}", web::put().to(update_part))
            .route("/{id}", web::delete().to(delete_part)),
    );
}

async fn list_types(
    state: web::Data<AppState>,
    _actor: AuthenticatedActor,
) -> AppResult<HttpResponse> {
    let result = state.spare_part_service.list_types().await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn get_type(
    state: web::Data<AppState>,
    _actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state.spare_part_service.get_type(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn create_type(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    payload: web::Json<SparePartTypeRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .spare_part_service
        .create_type(actor.actor(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

async fn update_type(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<SparePartTypeRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .spare_part_service
        .update_type(actor.actor(), path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_type(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .spare_part_service
        .delete_type(actor.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn list_parts(
    state: web::Data<AppState>,
    _actor: AuthenticatedActor,
    query: web::Query<SparePartQueryParams>,
) -> AppResult<HttpResponse> {
    let result = state
        .spare_part_service
        .list_parts(query.part_type_id)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn get_part(
    state: web::Data<AppState>,
    _actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state.spare_part_service.get_part(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn create_part(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    payload: web::Json<SparePartRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .spare_part_service
        .create_part(actor.actor(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

async fn update_part(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<SparePartRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .spare_part_service
        .update_part(actor.actor(), path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_part(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .spare_part_service
        .delete_part(actor.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
