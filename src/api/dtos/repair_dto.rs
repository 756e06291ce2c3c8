use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{RepairRecord, RepairStatus, RepairType};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRepairRequest {
    pub asset_id: Uuid,
    /// Defaults to the asset's department.
    pub department_id: Option<Uuid>,

    #[validate(length(min = 1, max = 32, message = "applicant must be 1-32 characters"))]
    pub applicant: String,

    #[validate(length(min = 1, max = 1000, message = "fault description must be 1-1000 characters"))]
    pub fault_description: String,

    pub supplier_id: Uuid,

    #[serde(default)]
    pub repair_type: RepairType,

    #[serde(default)]
    pub repair_status: RepairStatus,

    pub repair_start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub spare_part_ids: Vec<Uuid>,

    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRepairRequest {
    pub asset_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    #[validate(length(min = 1, max = 32, message = "applicant must be 1-32 characters"))]
    pub applicant: Option<String>,
    #[validate(length(min = 1, max = 1000, message = "fault description must be 1-1000 characters"))]
    pub fault_description: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub repair_type: Option<RepairType>,
    pub repair_status: Option<RepairStatus>,
    pub repair_start_time: Option<DateTime<Utc>>,
    pub spare_part_ids: Option<Vec<Uuid>>,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RepairQueryParams {
    pub search: Option<String>,
    pub asset_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub repair_type: Option<RepairType>,
    pub repair_status: Option<RepairStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RepairRecordResponse {
    pub id: Uuid,
    pub repair_number: String,
    pub asset_id: Uuid,
    pub department_id: Uuid,
    pub applicant: String,
    pub fault_description: String,
    pub supplier_id: Uuid,
    pub repair_type: RepairType,
    pub repair_type_label: &'static str,
    pub repair_status: RepairStatus,
    pub repair_status_label: &'static str,
    pub repair_start_time: Option<DateTime<Utc>>,
    pub repair_duration_secs: Option<i64>,
    pub duration_display: String,
    pub spare_part_ids: Vec<Uuid>,
    pub creator_id: Option<Uuid>,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RepairRecord> for RepairRecordResponse {
    fn from(record: RepairRecord) -> Self {
        let duration_display = record.duration_display();
        Self {
            id: record.id,
            repair_number: record.repair_number,
            asset_id: record.asset_id,
            department_id: record.department_id,
            applicant: record.applicant,
            fault_description: record.fault_description,
            supplier_id: record.supplier_id,
            repair_type: record.repair_type,
            repair_type_label: record.repair_type.label(),
            repair_status: record.repair_status,
            repair_status_label: record.repair_status.label(),
            repair_start_time: record.repair_start_time,
            repair_duration_secs: record.repair_duration_secs,
            duration_display,
            spare_part_ids: record.spare_part_ids,
            creator_id: record.creator_id,
            remark: record.remark,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
