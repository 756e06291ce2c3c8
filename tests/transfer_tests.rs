mod common;

use common::fixtures::{create_repair_request, test_actor};
use common::{seed_org, TestContext};
use it_assets::error::AppError;

const HEADER: &str = "Serial number,Name,Business line,Department,Supplier,Purchase date,Asset type,Status,Active,Price";

fn sheet(rows: &[&str]) -> Vec<u8> {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text.into_bytes()
}

#[actix_rt::test]
async fn bad_row_is_reported_and_the_rest_still_import() {
    let ctx = TestContext::new();
    seed_org(&ctx);
    let admin = test_actor(true);

    let data = sheet(&[
        "IMP-1,Desk PC,Retail,Finance,Acme,2024/01/15,Computer,In use,Yes,1200.50",
        "IMP-2,Old PC,Retail,Finance,Acme,2024/01/15,Computer,Broken,Yes,100",
        "IMP-3,Router,Retail,Sales,Acme,2023-11-02,Network device,Unused,No,",
    ]);
    let report = ctx
        .transfer_service
        .import_assets(&admin, &data)
        .await
        .expect("import runs");

    assert_eq!(report.created, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 3);
    assert!(
        report.errors[0].message.contains("invalid status: Broken"),
        "got {}",
        report.errors[0].message
    );

    let assets = ctx.assets.assets.lock().expect("assets mutex poisoned").clone();
    let serials: Vec<_> = assets.iter().map(|asset| asset.serial_number.as_str()).collect();
    assert_eq!(serials, vec!["IMP-1", "IMP-3"]);
    let router = &assets[1];
    assert!(router.price.is_zero());
    assert!(!router.is_active);
    assert_eq!(router.repair_count, 0);
    assert_eq!(router.creator_id, Some(admin.id));
}

#[actix_rt::test]
async fn export_then_import_leaves_rows_unchanged() {
    let ctx = TestContext::new();
    let org = seed_org(&ctx);
    let admin = test_actor(true);
    ctx.add_actor(&admin);
    ctx.add_asset(&org.d, &org.supplier, Some(&admin));
    ctx.add_asset(&org.e, &org.supplier, Some(&admin));

    let exported = ctx
        .transfer_service
        .export_assets(&admin)
        .await
        .expect("export");
    let report = ctx
        .transfer_service
        .import_assets(&admin, &exported)
        .await
        .expect("import");

    assert_eq!(report.skipped, 2);
    assert_eq!(report.created + report.updated, 0);
    assert!(!report.has_errors());
}

#[actix_rt::test]
async fn import_updates_existing_serial_but_keeps_repair_count() {
    let ctx = TestContext::new();
    let org = seed_org(&ctx);
    let admin = test_actor(true);
    let asset = ctx.add_asset(&org.d, &org.supplier, None);
    ctx.repair_service
        .create(&admin, create_repair_request(asset.id, org.supplier.id))
        .await
        .expect("create repair");

    let row = format!(
        "{},Renamed,Retail,Finance,Acme,2024/03/01,Computer,In use,Yes,10",
        asset.serial_number
    );
    let report = ctx
        .transfer_service
        .import_assets(&admin, &sheet(&[row.as_str()]))
        .await
        .expect("import");

    assert_eq!(report.updated, 1);
    let stored = ctx.assets.get(asset.id).expect("asset");
    assert_eq!(stored.name, "Renamed");
    assert_eq!(stored.repair_count, 1);
}

#[actix_rt::test]
async fn managers_cannot_invent_reference_rows() {
    let ctx = TestContext::new();
    let org = seed_org(&ctx);
    let manager = test_actor(false);
    ctx.assign(&manager, &org.d);

    let data = sheet(&[
        "M-1,Phone,Retail,Legal,Acme,2024/01/15,Office equipment,In use,Yes,50",
        "M-2,Phone,Retail,Sales,Acme,2024/01/15,Office equipment,In use,Yes,50",
        "M-3,Phone,Retail,Finance,Acme,2024/01/15,Office equipment,In use,Yes,50",
    ]);
    let report = ctx
        .transfer_service
        .import_assets(&manager, &data)
        .await
        .expect("import");

    assert_eq!(report.created, 1);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors[0].message.contains("department not found: Legal"));
    assert_eq!(report.errors[1].row, 3);
    assert_eq!(ctx.departments.departments.lock().expect("departments mutex poisoned").len(), 2);
}

#[actix_rt::test]
async fn unchanged_row_outside_managed_departments_is_refused() {
    let ctx = TestContext::new();
    let org = seed_org(&ctx);
    let admin = test_actor(true);
    let manager = test_actor(false);
    ctx.add_actor(&admin);
    ctx.assign(&manager, &org.d);
    let hidden = ctx.add_asset(&org.e, &org.supplier, Some(&admin));

    let exported = ctx
        .transfer_service
        .export_assets(&admin)
        .await
        .expect("export");
    let report = ctx
        .transfer_service
        .import_assets(&manager, &exported)
        .await
        .expect("import");

    assert_eq!(report.skipped, 0);
    assert_eq!(report.created + report.updated, 0);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 2);
    assert!(
        report.errors[0].message.contains("permission"),
        "got {}",
        report.errors[0].message
    );
    let stored = ctx.assets.get(hidden.id).expect("asset");
    assert_eq!(stored.creator_id, Some(admin.id));
}

#[actix_rt::test]
async fn missing_required_column_rejects_the_file() {
    let ctx = TestContext::new();
    let admin = test_actor(true);

    let result = ctx
        .transfer_service
        .import_assets(&admin, b"Serial number,Name\nX-1,Thing\n")
        .await;
    assert!(matches!(
        result,
        Err(AppError::BadRequest(message)) if message.contains("Business line")
    ));
}

#[actix_rt::test]
async fn repair_export_only_lists_visible_records() {
    let ctx = TestContext::new();
    let org = seed_org(&ctx);
    let admin = test_actor(true);
    let manager = test_actor(false);
    ctx.assign(&manager, &org.d);
    let in_d = ctx.add_asset(&org.d, &org.supplier, None);
    let in_e = ctx.add_asset(&org.e, &org.supplier, None);

    for asset in [&in_d, &in_e] {
        ctx.repair_service
            .create(&admin, create_repair_request(asset.id, org.supplier.id))
            .await
            .expect("create repair");
    }

    let exported = ctx
        .transfer_service
        .export_repairs(&manager)
        .await
        .expect("export");
    let text = String::from_utf8(exported).expect("utf8");
    let lines: Vec<_> = text.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("ID,Repair number,Asset serial"));
    assert!(lines[1].contains(&in_d.serial_number));
    assert!(lines[1].contains("Finance"));
}
