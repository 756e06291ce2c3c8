use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::dtos::{
    CreateRepairRequest, Page, PaginatedResponse, RepairQueryParams, RepairRecordResponse,
    UpdateRepairRequest,
};
use crate::application::access_guard::AccessGuard;
use crate::application::audit::AuditRecorder;
use crate::application::repair_lifecycle::RepairLifecycle;
use crate::domain::{Actor, Asset, AuditEntry, EntityType, RepairRecord};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::{
    AssetRepository, ManagerAssignmentRepository, RepairFilter, RepairRepository,
    SparePartRepository, SupplierRepository,
};

#[derive(Clone)]
pub struct RepairService {
    repair_repo: Arc<dyn RepairRepository>,
    asset_repo: Arc<dyn AssetRepository>,
    supplier_repo: Arc<dyn SupplierRepository>,
    spare_part_repo: Arc<dyn SparePartRepository>,
    assignment_repo: Arc<dyn ManagerAssignmentRepository>,
    audit: AuditRecorder,
    lifecycle: RepairLifecycle,
}

impl RepairService {
    pub fn new(
        repair_repo: Arc<dyn RepairRepository>,
        asset_repo: Arc<dyn AssetRepository>,
        supplier_repo: Arc<dyn SupplierRepository>,
        spare_part_repo: Arc<dyn SparePartRepository>,
        assignment_repo: Arc<dyn ManagerAssignmentRepository>,
        audit: AuditRecorder,
        lifecycle: RepairLifecycle,
    ) -> Self {
        Self {
            repair_repo,
            asset_repo,
            supplier_repo,
            spare_part_repo,
            assignment_repo,
            audit,
            lifecycle,
        }
    }

    async fn guard(&self, actor: &Actor) -> AppResult<AccessGuard> {
        AccessGuard::load(self.assignment_repo.as_ref(), actor).await
    }

    pub async fn list(
        &self,
        actor: &Actor,
        params: RepairQueryParams,
    ) -> AppResult<PaginatedResponse<RepairRecordResponse>> {
        let guard = self.guard(actor).await?;
        let scope = guard.list_scope();
        let page = Page::new(params.page, params.limit);
        let filter = RepairFilter {
            search: params.search,
            asset_id: params.asset_id,
            department_id: params.department_id,
            supplier_id: params.supplier_id,
            repair_type: params.repair_type,
            repair_status: params.repair_status,
        };

        let total = self.repair_repo.count(&scope, &filter).await?;
        let items = self
            .repair_repo
            .list(&scope, &filter, page.limit, page.offset())
            .await?
            .into_iter()
            .map(RepairRecordResponse::from)
            .collect();

        Ok(PaginatedResponse::new(items, total, page))
    }

    async fn find_visible(&self, guard: &AccessGuard, id: Uuid) -> AppResult<RepairRecord> {
        self.repair_repo
            .find_by_id(id)
            .await?
            .filter(|record| guard.can_view(record))
            .ok_or_else(|| AppError::NotFound("repair record not found".to_string()))
    }

    pub async fn get_by_id(&self, actor: &Actor, id: Uuid) -> AppResult<RepairRecordResponse> {
        let guard = self.guard(actor).await?;
        Ok(self.find_visible(&guard, id).await?.into())
    }

    pub async fn history(&self, actor: &Actor, id: Uuid) -> AppResult<Vec<AuditEntry>> {
        let guard = self.guard(actor).await?;
        self.find_visible(&guard, id).await?;
        self.audit.history(EntityType::RepairRecord, id).await
    }

    /// Scrapped assets are not offered for repair.
    async fn repairable_asset(&self, asset_id: Uuid) -> AppResult<Asset> {
        let asset = self
            .asset_repo
            .find_by_id(asset_id)
            .await?
            .ok_or_else(|| AppError::field_error("asset_id", "not_found", "asset does not exist"))?;
        if asset.is_scrapped() {
            return Err(AppError::field_error(
                "asset_id",
                "scrapped",
                format!("asset {} is scrapped and cannot be repaired", asset.serial_number),
            ));
        }
        Ok(asset)
    }

    async fn ensure_supplier_active(&self, supplier_id: Uuid) -> AppResult<()> {
        let supplier = self
            .supplier_repo
            .find_by_id(supplier_id)
            .await?
            .ok_or_else(|| {
                AppError::field_error("supplier_id", "not_found", "supplier does not exist")
            })?;
        if !supplier.is_active {
            return Err(AppError::field_error(
                "supplier_id",
                "inactive",
                format!("supplier {} is inactive", supplier.name),
            ));
        }
        Ok(())
    }

    async fn normalize_spare_parts(&self, ids: Vec<Uuid>) -> AppResult<Vec<Uuid>> {
        let mut ids = ids;
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(ids);
        }
        let found = self.spare_part_repo.find_by_ids(&ids).await?;
        if found.len() != ids.len() {
            return Err(AppError::field_error(
                "spare_part_ids",
                "not_found",
                "one or more spare parts do not exist",
            ));
        }
        Ok(ids)
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateRepairRequest,
    ) -> AppResult<RepairRecordResponse> {
        request.validate()?;
        let guard = self.guard(actor).await?;

        let asset = self.repairable_asset(request.asset_id).await?;
        self.ensure_supplier_active(request.supplier_id).await?;
        let spare_part_ids = self.normalize_spare_parts(request.spare_part_ids).await?;

        let now = Utc::now();
        let mut record = RepairRecord {
            id: Uuid::new_v4(),
            repair_number: String::new(),
            asset_id: asset.id,
            department_id: request.department_id.unwrap_or(asset.department_id),
            applicant: request.applicant.trim().to_string(),
            fault_description: request.fault_description,
            supplier_id: request.supplier_id,
            repair_type: request.repair_type,
            repair_status: request.repair_status,
            repair_start_time: request.repair_start_time,
            repair_duration_secs: None,
            spare_part_ids,
            creator_id: None,
            remark: request.remark,
            created_at: now,
            updated_at: now,
        };

        guard.authorize_create(&record)?;
        self.lifecycle.prepare_new(&mut record, now)?;
        guard.stamp_creator(&mut record);

        let created = self
            .repair_repo
            .create_with_number(
                &record,
                self.lifecycle.business_date(now),
                self.lifecycle.max_allocation_attempts(),
            )
            .await?;

        self.audit
            .created(EntityType::RepairRecord, created.id, guard.actor_id(), &created)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "repair.create",
            target = %created.id,
            repair_number = %created.repair_number,
            asset = %created.asset_id,
            "repair record created"
        );

        Ok(created.into())
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        request: UpdateRepairRequest,
    ) -> AppResult<RepairRecordResponse> {
        request.validate()?;
        let guard = self.guard(actor).await?;

        let existing = self
            .repair_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("repair record not found".to_string()))?;
        guard.authorize_mutate(&existing)?;
        guard.ensure_writable(&existing)?;

        let mut record = existing.clone();
        if let Some(asset_id) = request.asset_id.filter(|asset_id| *asset_id != existing.asset_id) {
            record.asset_id = self.repairable_asset(asset_id).await?.id;
        }
        if let Some(supplier_id) = request
            .supplier_id
            .filter(|supplier_id| *supplier_id != existing.supplier_id)
        {
            self.ensure_supplier_active(supplier_id).await?;
            record.supplier_id = supplier_id;
        }
        if let Some(spare_part_ids) = request.spare_part_ids {
            record.spare_part_ids = self.normalize_spare_parts(spare_part_ids).await?;
        }
        if let Some(department_id) = request.department_id {
            record.department_id = department_id;
        }
        if let Some(applicant) = request.applicant {
            record.applicant = applicant.trim().to_string();
        }
        if let Some(fault_description) = request.fault_description {
            record.fault_description = fault_description;
        }
        if let Some(repair_type) = request.repair_type {
            record.repair_type = repair_type;
        }
        if let Some(repair_status) = request.repair_status {
            record.repair_status = repair_status;
        }
        if let Some(repair_start_time) = request.repair_start_time {
            record.repair_start_time = Some(repair_start_time);
        }
        if let Some(remark) = request.remark {
            record.remark = Some(remark);
        }

        if record.department_id != existing.department_id {
            guard.authorize_create(&record)?;
        }

        let now = Utc::now();
        self.lifecycle.prepare_for_save(&mut record, now)?;
        guard.stamp_creator(&mut record);
        record.updated_at = now;

        let updated = self.repair_repo.update(&record).await?;
        self.audit
            .updated(EntityType::RepairRecord, id, guard.actor_id(), &existing, &updated)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "repair.update",
            target = %id,
            status = updated.repair_status.label(),
            "repair record updated"
        );

        Ok(updated.into())
    }

    /// The asset's repair count is left as is.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let guard = self.guard(actor).await?;
        let mut existing = self
            .repair_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("repair record not found".to_string()))?;
        guard.authorize_mutate(&existing)?;

        self.repair_repo.delete(id).await?;

        guard.stamp_creator(&mut existing);
        self.audit
            .deleted(EntityType::RepairRecord, id, guard.actor_id(), &existing)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "repair.delete",
            target = %id,
            "repair record deleted"
        );
        Ok(())
    }
}
