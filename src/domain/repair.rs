use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::scope::{DepartmentScoped, Lockable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
#[serde(rename_all = "snake_case")]
pub enum RepairType {
    #[default]
    SupplierRepair = 0,
    ItRepair = 1,
    SupplierWarranty = 2,
    Other = 3,
}

impl RepairType {
    pub const ALL: [RepairType; 4] = [
        Self::SupplierRepair,
        Self::ItRepair,
        Self::SupplierWarranty,
        Self::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::SupplierRepair => "Supplier repair",
            Self::ItRepair => "IT department repair",
            Self::SupplierWarranty => "Supplier warranty",
            Self::Other => "Other repair",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

/// Any status may follow any other; only the terminal ones carry side effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    #[default]
    SentToIt = 0,
    SentToSupplier = 1,
    Repaired = 2,
    Unrepairable = 3,
    Discarded = 4,
}

impl RepairStatus {
    pub const ALL: [RepairStatus; 5] = [
        Self::SentToIt,
        Self::SentToSupplier,
        Self::Repaired,
        Self::Unrepairable,
        Self::Discarded,
    ];

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Repaired | Self::Unrepairable | Self::Discarded)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SentToIt => "Sent to IT",
            Self::SentToSupplier => "Sent to supplier",
            Self::Repaired => "Repaired",
            Self::Unrepairable => "Unrepairable",
            Self::Discarded => "Discarded",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|status| status.label() == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SparePartType {
    pub id: Uuid,
    pub name: String,
    pub creator_id: Option<Uuid>,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SparePart {
    pub id: Uuid,
    pub part_type_id: Uuid,
    pub name: String,
    pub serial_number: String,
    pub supplier_id: Uuid,
    pub warranty_months: i32,
    pub creator_id: Option<Uuid>,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RepairRecord {
    pub id: Uuid,
    pub repair_number: String,
    pub asset_id: Uuid,
    pub department_id: Uuid,
    pub applicant: String,
    pub fault_description: String,
    pub supplier_id: Uuid,
    pub repair_type: RepairType,
    pub repair_status: RepairStatus,
    pub repair_start_time: Option<DateTime<Utc>>,
    pub repair_duration_secs: Option<i64>,
    #[sqlx(skip)]
    #[serde(default)]
    pub spare_part_ids: Vec<Uuid>,
    pub creator_id: Option<Uuid>,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RepairRecord {
    pub fn repair_duration(&self) -> Option<Duration> {
        self.repair_duration_secs.map(Duration::seconds)
    }

    pub fn set_repair_duration(&mut self, duration: Duration) {
        self.repair_duration_secs = Some(duration.num_seconds());
    }

    pub fn duration_display(&self) -> String {
        match self.repair_duration_secs {
            Some(total) => {
                let total = total.max(0);
                let days = total / 86_400;
                let hours = (total % 86_400) / 3_600;
                let minutes = (total % 3_600) / 60;
                let seconds = total % 60;
                format!("{days}d {hours}h {minutes}m {seconds}s")
            }
            None => "in repair".to_string(),
        }
    }
}

impl DepartmentScoped for RepairRecord {
    fn creator_id(&self) -> Option<Uuid> {
        self.creator_id
    }

    fn department_id(&self) -> Option<Uuid> {
        Some(self.department_id)
    }

    fn set_creator(&mut self, actor_id: Uuid) {
        self.creator_id = Some(actor_id);
    }
}

impl Lockable for RepairRecord {
    fn is_locked(&self) -> bool {
        self.repair_status.is_terminal()
    }

    fn lock_reason(&self) -> &'static str {
        "repair record is closed and read-only"
    }
}
