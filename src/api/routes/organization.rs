use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::api::dtos::{
    BusinessLineRequest, DepartmentRequest, ManagerAssignmentRequest, PaginationParams,
    SupplierQueryParams, SupplierRequest,
};
use crate::api::routes::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedActor;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/business-lines")
            .route("", web::get().to(list_business_lines))
            .route("", web::post().to(create_business_line))
            .route("/{id}", web::get().to(get_business_line))
            .route("/{id}", web::put().to(update_business_line))
            .route("/{id}", web::delete().to(delete_business_line)),
    )
    .service(
        web::scope("/departments")
            .route("", web::get().to(list_departments))
            .route("", web::post().to(create_department))
            .route("/{id}", web::get().to(get_department))
            .route("/{id}", web::put().to(update_department))
            .route("/{id}", web::delete().to(delete_department)),
    )
    .service(
        web::scope("/suppliers")
            .route("", web::get().to(list_suppliers))
            .route("", web::post().to(create_supplier))
            .route("/{id}", web::get().to(get_supplier))
            .route("/{id}", web::put().to(update_supplier))
            .route("/{id}", web::delete().to(delete_supplier)),
    )
    .service(
        web::scope("/manager-assignments")
            .route("", web::get().to(list_assignments))
            .route("", web::post().to(create_assignment))
            .route("/{id}", web::get().to(get_assignment))
            .route("/{id}", web::put().to(update_assignment))
            .route("/{id}", web::delete().to(delete_assignment)),
    );
}

async fn list_business_lines(
    state: web::Data<AppState>,
    _actor: AuthenticatedActor,
) -> AppResult<HttpResponse> {
    let result = state.organization_service.list_business_lines().await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn get_business_line(
    state: web::Data<AppState>,
    _actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .get_business_line(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn create_business_line(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    payload: web::Json<BusinessLineRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .create_business_line(actor.actor(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

async fn update_business_line(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<BusinessLineRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .update_business_line(actor.actor(), path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_business_line(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .organization_service
        .delete_business_line(actor.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn list_departments(
    state: web::Data<AppState>,
    _actor: AuthenticatedActor,
) -> AppResult<HttpResponse> {
    let result = state.organization_service.list_departments().await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn get_department(
    state: web::Data<AppState>,
    _actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .get_department(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn create_department(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    payload: web::Json<DepartmentRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .create_department(actor.actor(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

async fn update_department(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<DepartmentRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .update_department(actor.actor(), path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_department(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .organization_service
        .delete_department(actor.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn list_suppliers(
    state: web::Data<AppState>,
    _actor: AuthenticatedActor,
    query: web::Query<SupplierQueryParams>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .list_suppliers(query.active_only)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn get_supplier(
    state: web::Data<AppState>,
    _actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .get_supplier(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn create_supplier(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    payload: web::Json<SupplierRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .create_supplier(actor.actor(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

async fn update_supplier(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<SupplierRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .update_supplier(actor.actor(), path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_supplier(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .organization_service
        .delete_supplier(actor.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn list_assignments(
    state: web::Data<AppState>,
    _actor: AuthenticatedActor,
    query: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .list_assignments(query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn get_assignment(
    state: web::Data<AppState>,
    _actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .get_assignment(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn create_assignment(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    payload: web::Json<ManagerAssignmentRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .create_assignment(actor.actor(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

async fn update_assignment(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<ManagerAssignmentRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .organization_service
        .update_assignment(actor.actor(), path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_assignment(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .organization_service
        .delete_assignment(actor.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
