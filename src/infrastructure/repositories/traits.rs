use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{
    Actor, Asset, AssetStatus, AssetType, AuditEntry, BusinessLine, Department, EntityType,
    ListScope, ManagerAssignment, RepairRecord, RepairStatus, RepairType, SparePart,
    SparePartType, Supplier,
};
use crate::error::AppResult;

#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    /// Matches name, serial number, or location.
    pub search: Option<String>,
    pub asset_type: Option<AssetType>,
    pub status: Option<AssetStatus>,
    pub business_line_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct RepairFilter {
    /// Matches repair number, applicant, or fault description.
    pub search: Option<String>,
    pub asset_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub repair_type: Option<RepairType>,
    pub repair_status: Option<RepairStatus>,
}

/// One leaf of a two-level aggregation.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct NestedCount {
    pub outer: String,
    pub inner: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairGrouping {
    Department,
    Supplier,
}

#[async_trait]
pub trait ActorRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Actor>>;
    async fn usernames(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, String>>;
}

#[async_trait]
pub trait ManagerAssignmentRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<ManagerAssignment>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ManagerAssignment>>;
    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<ManagerAssignment>>;
    async fn create(&self, assignment: &ManagerAssignment) -> AppResult<ManagerAssignment>;
    async fn update(&self, assignment: &ManagerAssignment) -> AppResult<ManagerAssignment>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait BusinessLineRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<BusinessLine>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BusinessLine>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<BusinessLine>>;
    async fn create(&self, line: &BusinessLine) -> AppResult<BusinessLine>;
    async fn update(&self, line: &BusinessLine) -> AppResult<BusinessLine>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Department>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Department>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Department>>;
    async fn create(&self, department: &Department) -> AppResult<Department>;
    async fn update(&self, department: &Department) -> AppResult<Department>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn list(&self, active_only: bool) -> AppResult<Vec<Supplier>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Supplier>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Supplier>>;
    async fn create(&self, supplier: &Supplier) -> AppResult<Supplier>;
    async fn update(&self, supplier: &Supplier) -> AppResult<Supplier>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Asset>>;
    async fn find_by_serial(&self, serial_number: &str) -> AppResult<Option<Asset>>;
    async fn list(
        &self,
        scope: &ListScope,
        filter: &AssetFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Asset>>;
    async fn count(&self, scope: &ListScope, filter: &AssetFilter) -> AppResult<i64>;
    /// Oldest first, strictly after the `(created_at, id)` key of the previous page.
    async fn list_after(
        &self,
        scope: &ListScope,
        after: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> AppResult<Vec<Asset>>;
    async fn create(&self, asset: &Asset) -> AppResult<Asset>;
    /// Writes every column except `repair_count`, which only repair creation moves.
    async fn update(&self, asset: &Asset) -> AppResult<Asset>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
    /// Department name -> asset type label -> count.
    async fn count_by_department_and_type(&self, scope: &ListScope)
        -> AppResult<Vec<NestedCount>>;
}

#[async_trait]
pub trait SparePartTypeRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<SparePartType>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SparePartType>>;
    async fn create(&self, part_type: &SparePartType) -> AppResult<SparePartType>;
    async fn update(&self, part_type: &SparePartType) -> AppResult<SparePartType>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait SparePartRepository: Send + Sync {
    async fn list(&self, part_type_id: Option<Uuid>) -> AppResult<Vec<SparePart>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SparePart>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<SparePart>>;
    async fn create(&self, part: &SparePart) -> AppResult<SparePart>;
    async fn update(&self, part: &SparePart) -> AppResult<SparePart>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait RepairRepository: Send + Sync {
    /// Loads the record together with its spare-part links.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RepairRecord>>;
    async fn list(
        &self,
        scope: &ListScope,
        filter: &RepairFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<RepairRecord>>;
    async fn count(&self, scope: &ListScope, filter: &RepairFilter) -> AppResult<i64>;
    /// Ascending by repair number, strictly after `after`.
    async fn list_after(
        &self,
        scope: &ListScope,
        after: Option<&str>,
        limit: i64,
    ) -> AppResult<Vec<RepairRecord>>;
    /// Claims the next repair number for `business_date`, inserts the record and
    /// its spare-part links, and bumps the asset's repair count, all in one
    /// transaction. Retries a lost claim up to `max_attempts` times.
    async fn create_with_number(
        &self,
        record: &RepairRecord,
        business_date: NaiveDate,
        max_attempts: u32,
    ) -> AppResult<RepairRecord>;
    /// Never touches `repair_number`.
    async fn update(&self, record: &RepairRecord) -> AppResult<RepairRecord>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
    /// Outer key per `grouping` -> spare-part type name (None without parts) -> count.
    async fn count_by_part_type(
        &self,
        scope: &ListScope,
        grouping: RepairGrouping,
    ) -> AppResult<Vec<NestedCount>>;
}

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn append(&self, entry: &AuditEntry) -> AppResult<()>;
    async fn list_for(&self, entity_type: EntityType, entity_id: Uuid)
        -> AppResult<Vec<AuditEntry>>;
}
