use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;

use crate::application::{
    AssetService, ChartService, OrganizationService, RepairService, SparePartService,
    TransferService,
};
use crate::config::SecurityConfig;
use crate::error::{AppError, AppResult};
use crate::observability::AppMetrics;

pub mod assets;
pub mod organization;
pub mod repairs;
pub mod reports;
pub mod spare_parts;

#[derive(Clone)]
pub struct AppState {
    pub asset_service: Arc<AssetService>,
    pub repair_service: Arc<RepairService>,
    pub organization_service: Arc<OrganizationService>,
    pub spare_part_service: Arc<SparePartService>,
    pub chart_service: Arc<ChartService>,
    pub transfer_service: Arc<TransferService>,
    pub security: SecurityConfig,
    pub metrics: Arc<AppMetrics>,
    pub db_pool: PgPool,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(assets::configure)
            .configure(repairs::configure)
            .configure(organization::configure)
            .configure(spare_parts::configure)
            .configure(reports::configure),
    )
    .route("/health", web::get().to(health))
    .route("/ready", web::get().to(ready))
    .route("/metrics", web::get().to(metrics));
}

async fn health() -> &'static str {
    "ok"
}

async fn ready(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db_pool)
        .await
        .map_err(|e| AppError::ServiceUnavailable {
            service: "database".to_string(),
            message: format!("Service not ready: {e}"),
        })?;
    Ok(HttpResponse::Ok().body("ready"))
}

async fn metrics(state: web::Data<AppState>, request: HttpRequest) -> AppResult<HttpResponse> {
    let admin_header = request
        .headers()
        .get("x-admin-token")
        .and_then(|value| value.to_str().ok());

    if !metrics_access_allowed(
        &state.security,
        admin_header,
        request.peer_addr().map(|addr| addr.ip()),
    ) {
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(
            state
                .metrics
                .render_prometheus(state.db_pool.size(), state.db_pool.num_idle()),
        ))
}

/// A matching admin token always wins; otherwise the peer must be on a
/// private network when that restriction is on.
fn metrics_access_allowed(
    security: &SecurityConfig,
    admin_header: Option<&str>,
    peer: Option<std::net::IpAddr>,
) -> bool {
    if let Some(token) = security
        .metrics_admin_token
        .as_deref()
        .filter(|token| !token.is_empty())
    {
        if admin_header == Some(token) {
            return true;
        }
    }

    if !security.metrics_allow_private_only {
        return true;
    }
    peer.is_some_and(is_private_or_loopback)
}

fn is_private_or_loopback(ip: std::net::IpAddr) -> bool {
    match ip {
        std::net::IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        std::net::IpAddr::V6(v6) => v6.is_loopback() || v6.is_unique_local(),
    }
}
