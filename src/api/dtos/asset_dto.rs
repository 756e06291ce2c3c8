use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Asset, AssetStatus, AssetType};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssetRequest {
    #[validate(length(min = 1, max = 32, message = "name must be 1-32 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 32, message = "serial number must be 1-32 characters"))]
    pub serial_number: String,

    #[serde(default)]
    pub asset_type: AssetType,

    #[validate(length(max = 64))]
    pub location: Option<String>,

    pub business_line_id: Uuid,
    pub department_id: Uuid,
    pub supplier_id: Uuid,
    pub purchase_date: NaiveDate,

    #[validate(range(min = 0, max = 600))]
    #[serde(default)]
    pub warranty_months: i32,

    #[serde(default)]
    pub price: Decimal,

    #[serde(default)]
    pub status: AssetStatus,

    pub is_active: Option<bool>,

    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAssetRequest {
    #[validate(length(min = 1, max = 32, message = "name must be 1-32 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 32, message = "serial number must be 1-32 characters"))]
    pub serial_number: Option<String>,
    pub asset_type: Option<AssetType>,
    #[validate(length(max = 64))]
    pub location: Option<String>,
    pub business_line_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub purchase_date: Option<NaiveDate>,
    #[validate(range(min = 0, max = 600))]
    pub warranty_months: Option<i32>,
    pub price: Option<Decimal>,
    pub status: Option<AssetStatus>,
    pub is_active: Option<bool>,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssetQueryParams {
    pub search: Option<String>,
    pub asset_type: Option<AssetType>,
    pub status: Option<AssetStatus>,
    pub business_line_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Bulk activate or deactivate; rows the actor may not touch are skipped.
#[derive(Debug, Deserialize, Validate)]
pub struct SetActiveRequest {
    #[validate(length(min = 1, max = 500))]
    pub ids: Vec<Uuid>,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct AssetResponse {
    pub id: Uuid,
    pub name: String,
    pub serial_number: String,
    pub asset_type: AssetType,
    pub asset_type_label: &'static str,
    pub location: Option<String>,
    pub business_line_id: Uuid,
    pub department_id: Uuid,
    pub supplier_id: Uuid,
    pub purchase_date: NaiveDate,
    pub warranty_months: i32,
    pub price: Decimal,
    pub status: AssetStatus,
    pub status_label: &'static str,
    pub qr_payload: Option<String>,
    pub repair_count: i32,
    pub is_active: bool,
    pub creator_id: Option<Uuid>,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Asset> for AssetResponse {
    fn from(asset: Asset) -> Self {
        Self {
            id: asset.id,
            name: asset.name,
            serial_number: asset.serial_number,
            asset_type: asset.asset_type,
            asset_type_label: asset.asset_type.label(),
            location: asset.location,
            business_line_id: asset.business_line_id,
            department_id: asset.department_id,
            supplier_id: asset.supplier_id,
            purchase_date: asset.purchase_date,
            warranty_months: asset.warranty_months,
            price: asset.price,
            status: asset.status,
            status_label: asset.status.label(),
            qr_payload: asset.qr_payload,
            repair_count: asset.repair_count,
            is_active: asset.is_active,
            creator_id: asset.creator_id,
            remark: asset.remark,
            created_at: asset.created_at,
            updated_at: asset.updated_at,
        }
    }
}
