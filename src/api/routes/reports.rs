use actix_web::{http::header, web, HttpResponse};

use crate::api::dtos::RepairChartParams;
use crate::api::routes::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedActor;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/charts")
            .route("/assets", web::get().to(asset_chart))
            .route("/repairs", web::get().to(repair_chart)),
    )
    .service(
        web::scope("/transfer")
            .route("/assets", web::get().to(export_assets))
            .route("/assets", web::post().to(import_assets))
            .route("/repairs", web::get().to(export_repairs)),
    );
}

async fn asset_chart(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
) -> AppResult<HttpResponse> {
    let result = state.chart_service.assets(actor.actor()).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn repair_chart(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    query: web::Query<RepairChartParams>,
) -> AppResult<HttpResponse> {
    let result = state
        .chart_service
        .repairs(actor.actor(), query.group_by)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

fn csv_attachment(filename: &str, body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(body)
}

async fn export_assets(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
) -> AppResult<HttpResponse> {
    let body = state.transfer_service.export_assets(actor.actor()).await?;
    Ok(csv_attachment("assets.csv", body))
}

async fn export_repairs(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
) -> AppResult<HttpResponse> {
    let body = state.transfer_service.export_repairs(actor.actor()).await?;
    Ok(csv_attachment("repairs.csv", body))
}

async fn import_assets(
    state: web::Data<AppState>,
    actor: AuthenticatedActor,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    if body.is_empty() {
        return Err(AppError::BadRequest("import file is empty".to_string()));
    }
    if body.len() > state.security.import_max_bytes {
        return Err(AppError::BadRequest(format!(
            "import file exceeds {} bytes",
            state.security.import_max_bytes
        )));
    }

    let report = state
        .transfer_service
        .import_assets(actor.actor(), &body)
        .await?;
    state.metrics.record_import(&report);
    Ok(HttpResponse::Ok().json(report))
}
