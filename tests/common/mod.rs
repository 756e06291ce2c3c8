#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use chrono::FixedOffset;
use once_cell::sync::Lazy;
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use sqlx::Connection;
use tokio::sync::{Mutex, MutexGuard};
use it_assets::application::{
    AssetService, AuditRecorder, ChartService, OrganizationService, RepairLifecycle,
    RepairService, SparePartService, TransferService,
};
use it_assets::config::{AuthConfig, RepairConfig};
use it_assets::domain::{Actor, Asset, BusinessLine, Department, Supplier};
use it_assets::infrastructure::db::migrations::run_migrations;

pub mod fixtures;
pub mod mocks;

use fixtures::{test_asset, test_assignment, test_business_line, test_department, test_supplier};
use mocks::{
    MockActorRepo, MockAssetRepo, MockAssignmentRepo, MockAuditRepo, MockBusinessLineRepo,
    MockDepartmentRepo, MockRepairRepo, MockSparePartRepo, MockSparePartTypeRepo,
    MockSupplierRepo,
};

pub const PUBLIC_URL: &str = "http://localhost:8080";

static TEST_DB_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// A migrated, emptied Postgres database, held exclusively for one test.
pub struct TestDb {
    pool: PgPool,
    _db_lock_conn: PgConnection,
    _lock: MutexGuard<'static, ()>,
}

impl TestDb {
    /// Returns `None` when no database is configured, so the test can skip.
    /// In CI a missing database is a hard failure.
    pub async fn new() -> Option<Self> {
        dotenvy::dotenv().ok();
        let url = match env::var("TEST_DATABASE_URL").or_else(|_| env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                if env::var("CI").is_ok() {
                    panic!("DATABASE_URL or TEST_DATABASE_URL must be set in CI");
                }
                eprintln!("Skipping test: DATABASE_URL or TEST_DATABASE_URL not set");
                return None;
            }
        };

        let lock = Lazy::force(&TEST_DB_MUTEX).lock().await;

        // Serializes schema resets across test binaries.
        let mut db_lock_conn = PgConnection::connect(&url).await.ok()?;
        sqlx::query("SELECT pg_advisory_lock($1)")
            .bind(4242_i64)
            .execute(&mut db_lock_conn)
            .await
            .ok()?;

        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(&url)
            .await
            .ok()?;
        run_migrations(&pool).await.ok()?;
        reset_database(&pool).await.ok()?;

        Some(Self {
            pool,
            _db_lock_conn: db_lock_conn,
            _lock: lock,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn reset_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        TRUNCATE TABLE
            audit_log,
            repair_record_spare_parts,
            repair_records,
            spare_parts,
            spare_part_types,
            assets,
            asset_managers,
            suppliers,
            departments,
            business_lines,
            users
        RESTART IDENTITY CASCADE
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "integration-secret".to_string(),
        jwt_kid: "v1".to_string(),
        previous_jwt_secrets: Vec::new(),
        previous_jwt_kids: Vec::new(),
        jwt_expiration_seconds: 900,
        issuer: "it-assets-test".to_string(),
        audience: "it-assets-admin".to_string(),
    }
}

pub fn business_offset() -> FixedOffset {
    RepairConfig::default()
        .business_offset()
        .expect("default offset is valid")
}

/// Every service wired to in-memory repositories that the test can inspect.
pub struct TestContext {
    pub actors: Arc<MockActorRepo>,
    pub assignments: Arc<MockAssignmentRepo>,
    pub business_lines: Arc<MockBusinessLineRepo>,
    pub departments: Arc<MockDepartmentRepo>,
    pub suppliers: Arc<MockSupplierRepo>,
    pub assets: Arc<MockAssetRepo>,
    pub repairs: Arc<MockRepairRepo>,
    pub part_types: Arc<MockSparePartTypeRepo>,
    pub parts: Arc<MockSparePartRepo>,
    pub audit_log: Arc<MockAuditRepo>,
    pub lifecycle: RepairLifecycle,
    pub asset_service: Arc<AssetService>,
    pub repair_service: Arc<RepairService>,
    pub organization_service: Arc<OrganizationService>,
    pub spare_part_service: Arc<SparePartService>,
    pub chart_service: Arc<ChartService>,
    pub transfer_service: Arc<TransferService>,
}

impl TestContext {
    pub fn new() -> Self {
        let actors = Arc::new(MockActorRepo::default());
        let assignments = Arc::new(MockAssignmentRepo::default());
        let business_lines = Arc::new(MockBusinessLineRepo::default());
        let departments = Arc::new(MockDepartmentRepo::default());
        let suppliers = Arc::new(MockSupplierRepo::default());
        let assets = Arc::new(MockAssetRepo::default());
        let repairs = Arc::new(MockRepairRepo::new(assets.clone()));
        let part_types = Arc::new(MockSparePartTypeRepo::default());
        let parts = Arc::new(MockSparePartRepo::default());
        let audit_log = Arc::new(MockAuditRepo::default());

        let audit = AuditRecorder::new(audit_log.clone());
        let lifecycle =
            RepairLifecycle::new(&RepairConfig::default()).expect("default repair config");

        Self {
            asset_service: Arc::new(AssetService::new(
                assets.clone(),
                suppliers.clone(),
                assignments.clone(),
                audit.clone(),
                PUBLIC_URL.to_string(),
                business_offset(),
            )),
            repair_service: Arc::new(RepairService::new(
                repairs.clone(),
                assets.clone(),
                suppliers.clone(),
                parts.clone(),
                assignments.clone(),
                audit.clone(),
                lifecycle.clone(),
            )),
            organization_service: Arc::new(OrganizationService::new(
                business_lines.clone(),
                departments.clone(),
                suppliers.clone(),
                assignments.clone(),
                actors.clone(),
                audit.clone(),
            )),
            spare_part_service: Arc::new(SparePartService::new(
                part_types.clone(),
                parts.clone(),
                assignments.clone(),
                audit.clone(),
            )),
            chart_service: Arc::new(ChartService::new(
                assets.clone(),
                repairs.clone(),
                assignments.clone(),
            )),
            transfer_service: Arc::new(TransferService::new(
                assets.clone(),
                repairs.clone(),
                business_lines.clone(),
                departments.clone(),
                suppliers.clone(),
                parts.clone(),
                actors.clone(),
                assignments.clone(),
                audit,
                PUBLIC_URL.to_string(),
                business_offset(),
            )),
            actors,
            assignments,
            business_lines,
            departments,
            suppliers,
            assets,
            repairs,
            part_types,
            parts,
            audit_log,
            lifecycle,
        }
    }

    pub fn add_actor(&self, actor: &Actor) {
        self.actors.push(actor.clone());
    }

    /// Registers `actor` as manager of `department`.
    pub fn assign(&self, actor: &Actor, department: &Department) {
        self.assignments
            .push(test_assignment(actor.id, Some(department.id)));
    }

    pub fn add_business_line(&self, name: &str) -> BusinessLine {
        let line = test_business_line(name);
        self.business_lines.push(line.clone());
        line
    }

    pub fn add_department(&self, line: &BusinessLine, name: &str) -> Department {
        let department = test_department(line.id, name);
        self.departments.push(department.clone());
        department
    }

    pub fn add_supplier(&self, name: &str) -> Supplier {
        let supplier = test_supplier(name);
        self.suppliers.push(supplier.clone());
        supplier
    }

    pub fn add_asset(
        &self,
        department: &Department,
        supplier: &Supplier,
        creator: Option<&Actor>,
    ) -> Asset {
        let asset = test_asset(
            department.business_line_id,
            department.id,
            supplier.id,
            creator.map(|actor| actor.id),
        );
        self.assets.push(asset.clone());
        asset
    }
}

/// A small organisation: one business line, departments D and E, one supplier.
pub struct Org {
    pub line: BusinessLine,
    pub d: Department,
    pub e: Department,
    pub supplier: Supplier,
}

pub fn seed_org(ctx: &TestContext) -> Org {
    let line = ctx.add_business_line("Retail");
    let d = ctx.add_department(&line, "Finance");
    let e = ctx.add_department(&line, "Sales");
    let supplier = ctx.add_supplier("Acme");
    Org { line, d, e, supplier }
}
