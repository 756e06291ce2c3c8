use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::api::dtos::{AssetQueryParams, CreateAssetRequest, SetActiveRequest, UpdateAssetRequest};
use crate::api::routes::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedActor;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/assets")
            .route("", web::get().to(list_assets))
            .route("", web::post().to(create_asset))
            .route("/active", web::post().to(set_active))
            .route("/{id}", web::get().to(get_asset))
            .route("/{id}", web::put().to(update_asset))
            .route("/{id}", web::delete().to(delete_asset))
            .route("/{id}/history", web::get().to(asset_history)),
    );
}

async fn list_assets(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    query: web::Query<AssetQueryParams>,
) -> AppResult<HttpResponse> {
    let result = state
        .asset_service
        .list(actor.actor(), query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn get_asset(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state
        .asset_service
        .get_by_id(actor.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn asset_history(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state
        .asset_service
        .history(actor.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn create_asset(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    payload: web::Json<CreateAssetRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .asset_service
        .create(actor.actor(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

async fn update_asset(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateAssetRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .asset_service
        .update(actor.actor(), path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_asset(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .asset_service
        .delete(actor.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn set_active(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    payload: web::Json<SetActiveRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .asset_service
        .set_active(actor.actor(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}
