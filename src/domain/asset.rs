use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::errors::DomainError;
use super::scope::{DepartmentScoped, Lockable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Unused = 0,
    #[default]
    InUse = 1,
    Scrapped = 2,
}

impl AssetStatus {
    pub const ALL: [AssetStatus; 3] = [Self::Unused, Self::InUse, Self::Scrapped];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unused => "Unused",
            Self::InUse => "In use",
            Self::Scrapped => "Scrapped",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|status| status.label() == label)
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unused => "unused",
            Self::InUse => "in_use",
            Self::Scrapped => "scrapped",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Server = 0,
    Network = 1,
    Storage = 2,
    Security = 3,
    #[default]
    Computer = 4,
    Office = 5,
    Other = 6,
}

impl AssetType {
    pub const ALL: [AssetType; 7] = [
        Self::Server,
        Self::Network,
        Self::Storage,
        Self::Security,
        Self::Computer,
        Self::Office,
        Self::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Server => "Server",
            Self::Network => "Network device",
            Self::Storage => "Storage device",
            Self::Security => "Security device",
            Self::Computer => "Computer",
            Self::Office => "Office equipment",
            Self::Other => "Other",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    pub serial_number: String,
    pub asset_type: AssetType,
    pub location: Option<String>,
    pub business_line_id: Uuid,
    pub department_id: Uuid,
    pub supplier_id: Uuid,
    pub purchase_date: NaiveDate,
    pub warranty_months: i32,
    pub price: Decimal,
    pub status: AssetStatus,
    pub qr_payload: Option<String>,
    pub repair_count: i32,
    pub is_active: bool,
    pub creator_id: Option<Uuid>,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    pub fn is_scrapped(&self) -> bool {
        self.status == AssetStatus::Scrapped
    }

    pub fn qr_payload_for(public_url: &str, id: Uuid) -> String {
        format!("{}/assets/{}", public_url.trim_end_matches('/'), id)
    }

    /// Computes every derived column in one pass so the row is written once.
    pub fn apply_derived_fields(&mut self, public_url: &str) {
        if self.qr_payload.is_none() {
            self.qr_payload = Some(Self::qr_payload_for(public_url, self.id));
        }
        if self.is_scrapped() {
            self.is_active = false;
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<(), DomainError> {
        if self.purchase_date > today {
            return Err(DomainError::ValidationError(
                "purchase date cannot be in the future".to_string(),
            ));
        }
        if self.price < Decimal::ZERO {
            return Err(DomainError::ValidationError(
                "price cannot be negative".to_string(),
            ));
        }
        if self.warranty_months < 0 {
            return Err(DomainError::ValidationError(
                "warranty months cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl DepartmentScoped for Asset {
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

impl Lockable for Asset {
    fn is_locked(&self) -> bool {
        self.is_scrapped()
    }

    fn lock_reason(&self) -> &'static str {
        "asset is scrapped and read-only"
    }
}
