#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveDate, Utc};
use it_assets::api::dtos::{CreateAssetRequest, CreateRepairRequest};
use it_assets::domain::{
    Actor, Asset, AssetStatus, AssetType, BusinessLine, Department, ManagerAssignment,
    RepairStatus, RepairType, Supplier,
};
use rust_decimal::Decimal;
use uuid::Uuid;

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn next_id() -> u64 {
    TEST_COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub fn test_actor(is_superuser: bool) -> Actor {
    let id = next_id();
    Actor {
        id: Uuid::new_v4(),
        username: format!("user{id}"),
        full_name: Some(format!("Test User {id}")),
        is_superuser,
        created_at: Utc::now(),
    }
}

pub fn test_superuser() -> Actor {
    test_actor(true)
}

pub fn test_staff() -> Actor {
    test_actor(false)
}

pub fn test_assignment(user_id: Uuid, department_id: Option<Uuid>) -> ManagerAssignment {
    let now = Utc::now();
    ManagerAssignment {
        id: Uuid::new_v4(),
        user_id,
        department_id,
        employee_id: None,
        phone: None,
        email: None,
        is_active: true,
        creator_id: None,
        remark: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_business_line(name: &str) -> BusinessLine {
    let now = Utc::now();
    BusinessLine {
        id: Uuid::new_v4(),
        name: name.to_string(),
        creator_id: None,
        remark: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_department(business_line_id: Uuid, name: &str) -> Department {
    let now = Utc::now();
    Department {
        id: Uuid::new_v4(),
        business_line_id,
        name: name.to_string(),
        creator_id: None,
        remark: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_supplier(name: &str) -> Supplier {
    let now = Utc::now();
    Supplier {
        id: Uuid::new_v4(),
        name: name.to_string(),
        contact: None,
        phone: None,
        email: None,
        address: None,
        is_active: true,
        creator_id: None,
        remark: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn purchase_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
}

pub fn test_asset(
    business_line_id: Uuid,
    department_id: Uuid,
    supplier_id: Uuid,
    creator_id: Option<Uuid>,
) -> Asset {
    let now = Utc::now();
    let id = Uuid::new_v4();
    Asset {
        id,
        name: format!("Laptop {}", next_id()),
        serial_number: format!("SN-{}", next_id()),
        asset_type: AssetType::Computer,
        location: Some("Floor 3".to_string()),
        business_line_id,
        department_id,
        supplier_id,
        purchase_date: purchase_date(),
        warranty_months: 36,
        price: Decimal::new(599_900, 2),
        status: AssetStatus::InUse,
        qr_payload: Some(format!("http://localhost:8080/assets/{id}")),
        repair_count: 0,
        is_active: true,
        creator_id,
        remark: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn create_asset_request(
    business_line_id: Uuid,
    department_id: Uuid,
    supplier_id: Uuid,
) -> CreateAssetRequest {
    CreateAssetRequest {
        name: "Workstation".to_string(),
        serial_number: format!("WS-{}", next_id()),
        asset_type: AssetType::Computer,
        location: None,
        business_line_id,
        department_id,
        supplier_id,
        purchase_date: purchase_date(),
        warranty_months: 24,
        price: Decimal::new(120_000, 2),
        status: AssetStatus::InUse,
        is_active: None,
        remark: None,
    }
}

pub fn create_repair_request(asset_id: Uuid, supplier_id: Uuid) -> CreateRepairRequest {
    CreateRepairRequest {
        asset_id,
        department_id: None,
        applicant: "Zhang Wei".to_string(),
        fault_description: "does not boot".to_string(),
        supplier_id,
        repair_type: RepairType::ItRepair,
        repair_status: RepairStatus::SentToIt,
        repair_start_time: None,
        spare_part_ids: Vec::new(),
        remark: None,
    }
}
