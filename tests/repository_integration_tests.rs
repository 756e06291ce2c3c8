// Runs the Postgres repositories against a real database.
//
// Skipped unless DATABASE_URL or TEST_DATABASE_URL is set.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use common::fixtures::{test_asset, test_business_line, test_department, test_supplier};
use common::TestDb;
use it_assets::domain::{Asset, ListScope, RepairRecord, RepairStatus, RepairType};
use it_assets::error::AppError;
use it_assets::infrastructure::repositories::{
    AssetRepository, AssetRepositoryImpl, BusinessLineRepository, BusinessLineRepositoryImpl,
    DepartmentRepository, DepartmentRepositoryImpl, RepairRepository, RepairRepositoryImpl,
    SupplierRepository, SupplierRepositoryImpl,
};
use uuid::Uuid;

fn business_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2031, 1, 2).expect("valid date")
}

/// One business line, department and supplier, plus a single stored asset.
async fn seed_asset(db: &TestDb) -> Asset {
    let pool = db.pool().clone();
    let line = BusinessLineRepositoryImpl::new(pool.clone())
        .create(&test_business_line("Retail"))
        .await
        .expect("business line");
    let department = DepartmentRepositoryImpl::new(pool.clone())
        .create(&test_department(line.id, "Finance"))
        .await
        .expect("department");
    let supplier = SupplierRepositoryImpl::new(pool.clone())
        .create(&test_supplier("Acme"))
        .await
        .expect("supplier");
    AssetRepositoryImpl::new(pool)
        .create(&test_asset(line.id, department.id, supplier.id, None))
        .await
        .expect("asset")
}

fn repair_for(asset: &Asset, spare_part_ids: Vec<Uuid>) -> RepairRecord {
    let now = Utc::now();
    RepairRecord {
        id: Uuid::new_v4(),
        repair_number: String::new(),
        asset_id: asset.id,
        department_id: asset.department_id,
        applicant: "Zhang Wei".to_string(),
        fault_description: "does not boot".to_string(),
        supplier_id: asset.supplier_id,
        repair_type: RepairType::ItRepair,
        repair_status: RepairStatus::SentToIt,
        repair_start_time: Some(now),
        repair_duration_secs: None,
        spare_part_ids,
        creator_id: None,
        remark: None,
        created_at: now,
        updated_at: now,
    }
}

async fn repair_row_count(db: &TestDb) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM repair_records")
        .fetch_one(db.pool())
        .await
        .expect("count repairs")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_claims_get_distinct_numbers_and_one_count_each() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let asset = seed_asset(&db).await;
    let repo = Arc::new(RepairRepositoryImpl::new(db.pool().clone()));

    let tasks: Vec<_> = (0..24)
        .map(|_| {
            let repo = repo.clone();
            let record = repair_for(&asset, Vec::new());
            tokio::spawn(async move {
                repo.create_with_number(&record, business_date(), 5).await
            })
        })
        .collect();

    let mut numbers = HashSet::new();
    for task in tasks {
        let created = task.await.expect("task joins").expect("claim succeeds");
        assert!(numbers.insert(created.repair_number));
    }

    let expected: HashSet<String> = (1..=24).map(|n| format!("WX20310102{n:04}")).collect();
    assert_eq!(numbers, expected);

    let stored = AssetRepositoryImpl::new(db.pool().clone())
        .find_by_id(asset.id)
        .await
        .expect("load asset")
        .expect("asset exists");
    assert_eq!(stored.repair_count, 24);
    assert_eq!(repair_row_count(&db).await, 24);
}

#[tokio::test]
async fn failed_spare_part_link_rolls_back_number_and_count() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let asset = seed_asset(&db).await;
    let repo = RepairRepositoryImpl::new(db.pool().clone());

    let first = repo
        .create_with_number(&repair_for(&asset, Vec::new()), business_date(), 5)
        .await
        .expect("first claim");
    assert_eq!(first.repair_number, "WX203101020001");

    let result = repo
        .create_with_number(&repair_for(&asset, vec![Uuid::new_v4()]), business_date(), 5)
        .await;
    assert!(
        matches!(result, Err(AppError::BadRequest(_) | AppError::ValidationError { .. })),
        "got {result:?}"
    );

    let stored = AssetRepositoryImpl::new(db.pool().clone())
        .find_by_id(asset.id)
        .await
        .expect("load asset")
        .expect("asset exists");
    assert_eq!(stored.repair_count, 1);
    assert_eq!(repair_row_count(&db).await, 1);

    let next = repo
        .create_with_number(&repair_for(&asset, Vec::new()), business_date(), 5)
        .await
        .expect("next claim");
    assert_eq!(next.repair_number, "WX203101020002");
}

#[tokio::test]
async fn export_pages_survive_ties_and_concurrent_inserts() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let first = seed_asset(&db).await;
    let repo = AssetRepositoryImpl::new(db.pool().clone());

    // Same timestamp for every row, so only the id breaks ties.
    let stamp = first.created_at;
    for _ in 0..4 {
        let mut asset = test_asset(
            first.business_line_id,
            first.department_id,
            first.supplier_id,
            None,
        );
        asset.created_at = stamp;
        repo.create(&asset).await.expect("asset");
    }

    let scope = ListScope::Unrestricted;
    let mut seen: Vec<Asset> = repo.list_after(&scope, None, 2).await.expect("first page");
    assert_eq!(seen.len(), 2);

    // Lands between pages; must show up once and shift nothing.
    let late = repo
        .create(&test_asset(
            first.business_line_id,
            first.department_id,
            first.supplier_id,
            None,
        ))
        .await
        .expect("late asset");

    loop {
        let after = seen.last().map(|asset| (asset.created_at, asset.id));
        let page = repo.list_after(&scope, after, 2).await.expect("page");
        let done = page.len() < 2;
        seen.extend(page);
        if done {
            break;
        }
    }

    let ids: Vec<Uuid> = seen.iter().map(|asset| asset.id).collect();
    let distinct: HashSet<Uuid> = ids.iter().copied().collect();
    assert_eq!(ids.len(), 6);
    assert_eq!(distinct.len(), 6);
    assert!(distinct.contains(&late.id));
}

#[tokio::test]
async fn repair_export_pages_follow_repair_numbers() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let asset = seed_asset(&db).await;
    let repo = RepairRepositoryImpl::new(db.pool().clone());
    for _ in 0..3 {
        repo.create_with_number(&repair_for(&asset, Vec::new()), business_date(), 5)
            .await
            .expect("claim");
    }

    let scope = ListScope::Departments(vec![asset.department_id]);
    let page = repo
        .list_after(&scope, Some("WX203101020001"), 10)
        .await
        .expect("page");
    let numbers: Vec<_> = page.iter().map(|record| record.repair_number.as_str()).collect();
    assert_eq!(numbers, vec!["WX203101020002", "WX203101020003"]);

    let hidden = repo
        .list_after(&ListScope::Departments(Vec::new()), None, 10)
        .await
        .expect("empty scope");
    assert!(hidden.is_empty());
}
