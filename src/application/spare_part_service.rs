use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::dtos::{SparePartRequest, SparePartTypeRequest};
use crate::application::access_guard::AccessGuard;
use crate::application::audit::AuditRecorder;
use crate::domain::{Actor, EntityType, SparePart, SparePartType};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::{
    ManagerAssignmentRepository, SparePartRepository, SparePartTypeRepository,
};

#[derive(Clone)]
pub struct SparePartService {
    part_type_repo: Arc<dyn SparePartTypeRepository>,
    part_repo: Arc<dyn SparePartRepository>,
    assignment_repo: Arc<dyn ManagerAssignmentRepository>,
    audit: AuditRecorder,
}

impl SparePartService {
    pub fn new(
        part_type_repo: Arc<dyn SparePartTypeRepository>,
        part_repo: Arc<dyn SparePartRepository>,
        assignment_repo: Arc<dyn ManagerAssignmentRepository>,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            part_type_repo,
            part_repo,
            assignment_repo,
            audit,
        }
    }

    async fn admin(&self, actor: &Actor) -> AppResult<AccessGuard> {
        let guard = AccessGuard::load(self.assignment_repo.as_ref(), actor).await?;
        guard.require_superuser()?;
        Ok(guard)
    }

    pub async fn list_types(&self) -> AppResult<Vec<SparePartType>> {
        self.part_type_repo.list().await
    }

    pub async fn get_type(&self, id: Uuid) -> AppResult<SparePartType> {
        self.part_type_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("spare part type not found".to_string()))
    }

    pub async fn create_type(
        &self,
        actor: &Actor,
        request: SparePartTypeRequest,
    ) -> AppResult<SparePartType> {
        request.validate()?;
        let guard = self.admin(actor).await?;

        let now = Utc::now();
        let part_type = SparePartType {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            creator_id: Some(guard.actor_id()),
            remark: request.remark,
            created_at: now,
            updated_at: now,
        };

        let created = self.part_type_repo.create(&part_type).await?;
        self.audit
            .created(EntityType::SparePartType, created.id, guard.actor_id(), &created)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "spare_part_type.create",
            target = %created.id,
            "spare part type created"
        );
        Ok(created)
    }

    pub async fn update_type(
        &self,
        actor: &Actor,
        id: Uuid,
        request: SparePartTypeRequest,
    ) -> AppResult<SparePartType> {
        request.validate()?;
        let guard = self.admin(actor).await?;
        let existing = self.get_type(id).await?;

        let part_type = SparePartType {
            name: request.name.trim().to_string(),
            remark: request.remark,
            creator_id: Some(guard.actor_id()),
            updated_at: Utc::now(),
            ..existing.clone()
        };

        let updated = self.part_type_repo.update(&part_type).await?;
        self.audit
            .updated(EntityType::SparePartType, id, guard.actor_id(), &existing, &updated)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "spare_part_type.update",
            target = %id,
            "spare part type updated"
        );
        Ok(updated)
    }

    pub async fn delete_type(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let guard = self.admin(actor).await?;
        let existing = self.get_type(id).await?;

        self.part_type_repo.delete(id).await?;
        self.audit
            .deleted(EntityType::SparePartType, id, guard.actor_id(), &existing)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "spare_part_type.delete",
            target = %id,
            "spare part type deleted"
        );
        Ok(())
    }

    pub async fn list_parts(&self, part_type_id: Option<Uuid>) -> AppResult<Vec<SparePart>> {
        self.part_repo.list(part_type_id).await
    }

    pub async fn get_part(&self, id: Uuid) -> AppResult<SparePart> {
        self.part_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("spare part not found".to_string()))
    }

    pub async fn create_part(
        &self,
        actor: &Actor,
        request: SparePartRequest,
    ) -> AppResult<SparePart> {
        request.validate()?;
        let guard = self.admin(actor).await?;
        self.get_type(request.part_type_id).await.map_err(|_| {
            AppError::field_error("part_type_id", "not_found", "spare part type does not exist")
        })?;

        let now = Utc::now();
        let part = SparePart {
            id: Uuid::new_v4(),
            part_type_id: request.part_type_id,
            name: request.name.trim().to_string(),
            serial_number: request.serial_number.trim().to_string(),
            supplier_id: request.supplier_id,
            warranty_months: request.warranty_months,
            creator_id: Some(guard.actor_id()),
            remark: request.remark,
            created_at: now,
            updated_at: now,
        };

        let created = self.part_repo.create(&part).await?;
        self.audit
            .created(EntityType::SparePart, created.id, guard.actor_id(), &created)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "spare_part.create",
            target = %created.id,
            "spare part created"
        );
        Ok(created)
    }

    pub async fn update_part(
        &self,
        actor: &Actor,
        id: Uuid,
        request: SparePartRequest,
    ) -> AppResult<SparePart> {
        request.validate()?;
        let guard = self.admin(actor).await?;
        let existing = self.get_part(id).await?;

        let part = SparePart {
            part_type_id: request.part_type_id,
            name: request.name.trim().to_string(),
            serial_number: request.serial_number.trim().to_string(),
            supplier_id: request.supplier_id,
            warranty_months: request.warranty_months,
            remark: request.remark,
            creator_id: Some(guard.actor_id()),
            updated_at: Utc::now(),
            ..existing.clone()
        };

        let updated = self.part_repo.update(&part).await?;
        self.audit
            .updated(EntityType::SparePart, id, guard.actor_id(), &existing, &updated)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "spare_part.update",
            target = %id,
            "spare part updated"
        );
        Ok(updated)
    }

    pub async fn delete_part(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let guard = self.admin(actor).await?;
        let existing = self.get_part(id).await?;

        self.part_repo.delete(id).await?;
        self.audit
            .deleted(EntityType::SparePart, id, guard.actor_id(), &existing)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "spare_part.delete",
            target = %id,
            "spare part deleted"
        );
        Ok(())
    }
}
