use std::sync::Arc;
use std::time::Instant;

use actix_web::dev::Service as _;
use actix_web::{web, App, HttpServer};
use it_assets::api::routes::{self, AppState};
use it_assets::application::{
    AssetService, AuditRecorder, ChartService, OrganizationService, RepairLifecycle,
    RepairService, SparePartService, TransferService,
};
use it_assets::config::AppConfig;
use it_assets::infrastructure::db::{migrations::run_migrations, pool::create_pool};
use it_assets::infrastructure::repositories::{
    ActorRepository, ActorRepositoryImpl, AssetRepositoryImpl, AuditRepositoryImpl,
    BusinessLineRepositoryImpl, DepartmentRepositoryImpl, ManagerAssignmentRepositoryImpl,
    RepairRepositoryImpl, SparePartRepositoryImpl, SparePartTypeRepositoryImpl,
    SupplierRepositoryImpl,
};
use it_assets::middleware::request_logging::{actor_id_of, client_ip, status_class, user_agent};
use it_assets::observability::error_tracking::report_server_error;
use it_assets::observability::AppMetrics;
use it_assets::security::{cors_middleware, security_headers};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().expect("failed to load application configuration");
    config
        .validate()
        .expect("application configuration is invalid");

    let filter = EnvFilter::new(config.logging.level.clone());
    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }

    let pool = create_pool(&config.database)
        .await
        .expect("failed to create database pool");

    run_migrations(&pool)
        .await
        .expect("database migrations failed");

    let lifecycle = RepairLifecycle::new(&config.repair).expect("invalid repair settings");
    let business_offset = config
        .repair
        .business_offset()
        .expect("invalid business utc offset");

    let actor_repo: Arc<dyn ActorRepository> = Arc::new(ActorRepositoryImpl::new(pool.clone()));
    let assignment_repo = Arc::new(ManagerAssignmentRepositoryImpl::new(pool.clone()));
    let business_line_repo = Arc::new(BusinessLineRepositoryImpl::new(pool.clone()));
    let department_repo = Arc::new(DepartmentRepositoryImpl::new(pool.clone()));
    let supplier_repo = Arc::new(SupplierRepositoryImpl::new(pool.clone()));
    let asset_repo = Arc::new(AssetRepositoryImpl::new(pool.clone()));
    let repair_repo = Arc::new(RepairRepositoryImpl::new(pool.clone()));
    let part_type_repo = Arc::new(SparePartTypeRepositoryImpl::new(pool.clone()));
    let spare_part_repo = Arc::new(SparePartRepositoryImpl::new(pool.clone()));
    let audit = AuditRecorder::new(Arc::new(AuditRepositoryImpl::new(pool.clone())));

    let state = AppState {
        asset_service: Arc::new(AssetService::new(
            asset_repo.clone(),
            supplier_repo.clone(),
            assignment_repo.clone(),
            audit.clone(),
            config.public_url.clone(),
            business_offset,
        )),
        repair_service: Arc::new(RepairService::new(
            repair_repo.clone(),
            asset_repo.clone(),
            supplier_repo.clone(),
            spare_part_repo.clone(),
            assignment_repo.clone(),
            audit.clone(),
            lifecycle,
        )),
        organization_service: Arc::new(OrganizationService::new(
            business_line_repo.clone(),
            department_repo.clone(),
            supplier_repo.clone(),
            assignment_repo.clone(),
            actor_repo.clone(),
            audit.clone(),
        )),
        spare_part_service: Arc::new(SparePartService::new(
            part_type_repo,
            spare_part_repo.clone(),
            assignment_repo.clone(),
            audit.clone(),
        )),
        chart_service: Arc::new(ChartService::new(
            asset_repo.clone(),
            repair_repo.clone(),
            assignment_repo.clone(),
        )),
        transfer_service: Arc::new(TransferService::new(
            asset_repo,
            repair_repo,
            business_line_repo,
            department_repo,
            supplier_repo,
            spare_part_repo,
            actor_repo.clone(),
            assignment_repo,
            audit,
            config.public_url.clone(),
            business_offset,
        )),
        security: config.security.clone(),
        metrics: Arc::new(AppMetrics::default()),
        db_pool: pool.clone(),
    };

    let bind_host = config.host.clone();
    let bind_port = config.port;
    let security_config = config.security.clone();
    let auth_config = config.auth.clone();
    let metrics = state.metrics.clone();

    info!(
        host = %bind_host,
        port = bind_port,
        environment = %config.environment,
        "starting server"
    );

    HttpServer::new(move || {
        let metrics = metrics.clone();
        App::new()
            .wrap_fn(move |req, srv| {
                let request_id = Uuid::new_v4().to_string();
                let path = req.path().to_string();
                let method = req.method().to_string();
                let ip = client_ip(&req);
                let agent = user_agent(&req);
                let metrics = metrics.clone();
                let start = Instant::now();

                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(mut response) => {
                            response.headers_mut().insert(
                                actix_web::http::header::HeaderName::from_static("x-request-id"),
                                actix_web::http::header::HeaderValue::from_str(&request_id)
                                    .unwrap_or_else(|_| {
                                        actix_web::http::header::HeaderValue::from_static(
                                            "invalid-request-id",
                                        )
                                    }),
                            );

                            let status = response.status().as_u16();
                            let latency_ms = start.elapsed().as_millis() as u64;
                            metrics.record_request(status, latency_ms);

                            info!(
                                request_id = %request_id,
                                actor = %actor_id_of(response.request()),
                                client_ip = %ip,
                                user_agent = %agent,
                                method = %method,
                                path = %path,
                                status = status,
                                status_class = status_class(status),
                                latency_ms = latency_ms,
                                "request completed"
                            );

                            report_server_error(&path, &method, status, &request_id);
                            Ok(response)
                        }
                        Err(error) => Err(error),
                    }
                }
            })
            .wrap(cors_middleware(&security_config))
            .wrap(security_headers())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(auth_config.clone()))
            .app_data(web::Data::new(actor_repo.clone()))
            .app_data(web::PayloadConfig::new(security_config.import_max_bytes))
            .configure(routes::configure)
    })
    .bind((bind_host, bind_port))?
    .run()
    .await
}
