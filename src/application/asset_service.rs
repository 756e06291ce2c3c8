use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::dtos::{
    AssetQueryParams, AssetResponse, BulkUpdateResponse, CreateAssetRequest, Page,
    PaginatedResponse, SetActiveRequest, UpdateAssetRequest,
};
use crate::application::access_guard::AccessGuard;
use crate::application::audit::AuditRecorder;
use crate::domain::{Actor, Asset, AuditEntry, EntityType};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::{
    AssetFilter, AssetRepository, ManagerAssignmentRepository, SupplierRepository,
};

#[derive(Clone)]
pub struct AssetService {
    asset_repo: Arc<dyn AssetRepository>,
    supplier_repo: Arc<dyn SupplierRepository>,
    assignment_repo: Arc<dyn ManagerAssignmentRepository>,
    audit: AuditRecorder,
    public_url: String,
    business_offset: FixedOffset,
}

impl AssetService {
    pub fn new(
        asset_repo: Arc<dyn AssetRepository>,
        supplier_repo: Arc<dyn SupplierRepository>,
        assignment_repo: Arc<dyn ManagerAssignmentRepository>,
        audit: AuditRecorder,
        public_url: String,
        business_offset: FixedOffset,
    ) -> Self {
        Self {
            asset_repo,
            supplier_repo,
            assignment_repo,
            audit,
            public_url,
            business_offset,
        }
    }

    async fn guard(&self, actor: &Actor) -> AppResult<AccessGuard> {
        AccessGuard::load(self.assignment_repo.as_ref(), actor).await
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.business_offset).date_naive()
    }

    pub async fn list(
        &self,
        actor: &Actor,
        params: AssetQueryParams,
    ) -> AppResult<PaginatedResponse<AssetResponse>> {
        let guard = self.guard(actor).await?;
        let scope = guard.list_scope();
        let page = Page::new(params.page, params.limit);
        let filter = AssetFilter {
            search: params.search,
            asset_type: params.asset_type,
            status: params.status,
            business_line_id: params.business_line_id,
            department_id: params.department_id,
            supplier_id: params.supplier_id,
            is_active: params.is_active,
        };

        let total = self.asset_repo.count(&scope, &filter).await?;
        let items = self
            .asset_repo
            .list(&scope, &filter, page.limit, page.offset())
            .await?
            .into_iter()
            .map(AssetResponse::from)
            .collect();

        Ok(PaginatedResponse::new(items, total, page))
    }

    /// Rows outside the actor's scope read as missing.
    async fn find_visible(&self, guard: &AccessGuard, id: Uuid) -> AppResult<Asset> {
        self.asset_repo
            .find_by_id(id)
            .await?
            .filter(|asset| guard.can_view(asset))
            .ok_or_else(|| AppError::NotFound("asset not found".to_string()))
    }

    pub async fn get_by_id(&self, actor: &Actor, id: Uuid) -> AppResult<AssetResponse> {
        let guard = self.guard(actor).await?;
        Ok(self.find_visible(&guard, id).await?.into())
    }

    pub async fn history(&self, actor: &Actor, id: Uuid) -> AppResult<Vec<AuditEntry>> {
        let guard = self.guard(actor).await?;
        self.find_visible(&guard, id).await?;
        self.audit.history(EntityType::Asset, id).await
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

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateAssetRequest,
    ) -> AppResult<AssetResponse> {
        request.validate()?;
        let guard = self.guard(actor).await?;

        let now = Utc::now();
        let mut asset = Asset {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            serial_number: request.serial_number.trim().to_string(),
            asset_type: request.asset_type,
            location: request.location,
            business_line_id: request.business_line_id,
            department_id: request.department_id,
            supplier_id: request.supplier_id,
            purchase_date: request.purchase_date,
            warranty_months: request.warranty_months,
            price: request.price,
            status: request.status,
            qr_payload: None,
            repair_count: 0,
            is_active: request.is_active.unwrap_or(true),
            creator_id: None,
            remark: request.remark,
            created_at: now,
            updated_at: now,
        };

        guard.authorize_create(&asset)?;
        asset.validate(self.today())?;
        self.ensure_supplier_active(asset.supplier_id).await?;

        asset.apply_derived_fields(&self.public_url);
        guard.stamp_creator(&mut asset);

        let created = self.asset_repo.create(&asset).await?;
        self.audit
            .created(EntityType::Asset, created.id, guard.actor_id(), &created)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "asset.create",
            target = %created.id,
            "asset created"
        );

        Ok(created.into())
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        request: UpdateAssetRequest,
    ) -> AppResult<AssetResponse> {
        request.validate()?;
        let guard = self.guard(actor).await?;

        let existing = self
            .asset_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("asset not found".to_string()))?;
        guard.authorize_mutate(&existing)?;
        guard.ensure_writable(&existing)?;

        let mut asset = existing.clone();
        apply_update(&mut asset, request);

        if asset.department_id != existing.department_id {
            guard.authorize_create(&asset)?;
        }
        asset.validate(self.today())?;
        if asset.supplier_id != existing.supplier_id {
            self.ensure_supplier_active(asset.supplier_id).await?;
        }

        asset.apply_derived_fields(&self.public_url);
        guard.stamp_creator(&mut asset);
        asset.updated_at = Utc::now();

        let updated = self.asset_repo.update(&asset).await?;
        self.audit
            .updated(EntityType::Asset, id, guard.actor_id(), &existing, &updated)
            .await;
        info!(actor = %guard.actor_id(), action = "asset.update", target = %id, "asset updated");

        Ok(updated.into())
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let guard = self.guard(actor).await?;
        let mut existing = self
            .asset_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("asset not found".to_string()))?;
        guard.authorize_mutate(&existing)?;

        self.asset_repo.delete(id).await?;

        guard.stamp_creator(&mut existing);
        self.audit
            .deleted(EntityType::Asset, id, guard.actor_id(), &existing)
            .await;
        info!(actor = %guard.actor_id(), action = "asset.delete", target = %id, "asset deleted");
        Ok(())
    }

    /// Flips `is_active` on every listed asset the actor may write.
    pub async fn set_active(
        &self,
        actor: &Actor,
        request: SetActiveRequest,
    ) -> AppResult<BulkUpdateResponse> {
        request.validate()?;
        let guard = self.guard(actor).await?;
        let mut response = BulkUpdateResponse {
            updated: 0,
            skipped: 0,
        };

        for id in request.ids {
            let Some(existing) = self.asset_repo.find_by_id(id).await? else {
                response.skipped += 1;
                continue;
            };
            if !guard.can_mutate(Some(&existing)) || guard.ensure_writable(&existing).is_err() {
                response.skipped += 1;
                continue;
            }

            let mut asset = existing.clone();
            asset.is_active = request.is_active;
            asset.apply_derived_fields(&self.public_url);
            if asset.is_active == existing.is_active {
                response.skipped += 1;
                continue;
            }
            guard.stamp_creator(&mut asset);
            asset.updated_at = Utc::now();

            let updated = self.asset_repo.update(&asset).await?;
            self.audit
                .updated(EntityType::Asset, id, guard.actor_id(), &existing, &updated)
                .await;
            response.updated += 1;
        }

        info!(
            actor = %guard.actor_id(),
            action = "asset.set_active",
            is_active = request.is_active,
            updated = response.updated,
            skipped = response.skipped,
            "bulk active flag applied"
        );
        Ok(response)
    }
}

fn apply_update(asset: &mut Asset, request: UpdateAssetRequest) {
    if let Some(name) = request.name {
        asset.name = name.trim().to_string();
    }
    if let Some(serial_number) = request.serial_number {
        asset.serial_number = serial_number.trim().to_string();
    }
    if let Some(asset_type) = request.asset_type {
        asset.asset_type = asset_type;
    }
    if let Some(location) = request.location {
        asset.location = Some(location);
    }
    if let Some(business_line_id) = request.business_line_id {
        asset.business_line_id = business_line_id;
    }
    if let Some(department_id) = request.department_id {
        asset.department_id = department_id;
    }
    if let Some(supplier_id) = request.supplier_id {
        asset.supplier_id = supplier_id;
    }
    if let Some(purchase_date) = request.purchase_date {
        asset.purchase_date = purchase_date;
    }
    if let Some(warranty_months) = request.warranty_months {
        asset.warranty_months = warranty_months;
    }
    if let Some(price) = request.price {
        asset.price = price;
    }
    if let Some(status) = request.status {
        asset.status = status;
    }
    if let Some(is_active) = request.is_active {
        asset.is_active = is_active;
    }
    if let Some(remark) = request.remark {
        asset.remark = Some(remark);
    }
}
