use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::dtos::{
    BusinessLineRequest, DepartmentRequest, ManagerAssignmentRequest, PaginationParams,
    SupplierRequest,
};
use crate::application::access_guard::AccessGuard;
use crate::application::audit::AuditRecorder;
use crate::domain::{Actor, BusinessLine, Department, EntityType, ManagerAssignment, Supplier};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::{
    ActorRepository, BusinessLineRepository, DepartmentRepository, ManagerAssignmentRepository,
    SupplierRepository,
};

/// Business lines, departments, suppliers and manager assignments.
///
/// Everyone signed in may read these; only superusers may write them.
#[derive(Clone)]
pub struct OrganizationService {
    business_line_repo: Arc<dyn BusinessLineRepository>,
    department_repo: Arc<dyn DepartmentRepository>,
    supplier_repo: Arc<dyn SupplierRepository>,
    assignment_repo: Arc<dyn ManagerAssignmentRepository>,
    actor_repo: Arc<dyn ActorRepository>,
    audit: AuditRecorder,
}

impl OrganizationService {
    pub fn new(
        business_line_repo: Arc<dyn BusinessLineRepository>,
        department_repo: Arc<dyn DepartmentRepository>,
        supplier_repo: Arc<dyn SupplierRepository>,
        assignment_repo: Arc<dyn ManagerAssignmentRepository>,
        actor_repo: Arc<dyn ActorRepository>,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            business_line_repo,
            department_repo,
            supplier_repo,
            assignment_repo,
            actor_repo,
            audit,
        }
    }

    async fn admin(&self, actor: &Actor) -> AppResult<AccessGuard> {
        let guard = AccessGuard::load(self.assignment_repo.as_ref(), actor).await?;
        guard.require_superuser()?;
        Ok(guard)
    }

    pub async fn list_business_lines(&self) -> AppResult<Vec<BusinessLine>> {
        self.business_line_repo.list().await
    }

    pub async fn get_business_line(&self, id: Uuid) -> AppResult<BusinessLine> {
        self.business_line_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("business line not found".to_string()))
    }

    pub async fn create_business_line(
        &self,
        actor: &Actor,
        request: BusinessLineRequest,
    ) -> AppResult<BusinessLine> {
        request.validate()?;
        let guard = self.admin(actor).await?;

        let now = Utc::now();
        let line = BusinessLine {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            creator_id: Some(guard.actor_id()),
            remark: request.remark,
            created_at: now,
            updated_at: now,
        };

        let created = self.business_line_repo.create(&line).await?;
        self.audit
            .created(EntityType::BusinessLine, created.id, guard.actor_id(), &created)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "business_line.create",
            target = %created.id,
            "business line created"
        );
        Ok(created)
    }

    pub async fn update_business_line(
        &self,
        actor: &Actor,
        id: Uuid,
        request: BusinessLineRequest,
    ) -> AppResult<BusinessLine> {
        request.validate()?;
        let guard = self.admin(actor).await?;
        let existing = self.get_business_line(id).await?;

        let line = BusinessLine {
            name: request.name.trim().to_string(),
            remark: request.remark,
            creator_id: Some(guard.actor_id()),
            updated_at: Utc::now(),
            ..existing.clone()
        };

        let updated = self.business_line_repo.update(&line).await?;
        self.audit
            .updated(EntityType::BusinessLine, id, guard.actor_id(), &existing, &updated)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "business_line.update",
            target = %id,
            "business line updated"
        );
        Ok(updated)
    }

    pub async fn delete_business_line(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let guard = self.admin(actor).await?;
        let existing = self.get_business_line(id).await?;

        self.business_line_repo.delete(id).await?;
        self.audit
            .deleted(EntityType::BusinessLine, id, guard.actor_id(), &existing)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "business_line.delete",
            target = %id,
            "business line deleted"
        );
        Ok(())
    }

    pub async fn list_departments(&self) -> AppResult<Vec<Department>> {
        self.department_repo.list().await
    }

    pub async fn get_department(&self, id: Uuid) -> AppResult<Department> {
        self.department_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("department not found".to_string()))
    }

    pub async fn create_department(
        &self,
        actor: &Actor,
        request: DepartmentRequest,
    ) -> AppResult<Department> {
        request.validate()?;
        let guard = self.admin(actor).await?;

        let now = Utc::now();
        let department = Department {
            id: Uuid::new_v4(),
            business_line_id: request.business_line_id,
            name: request.name.trim().to_string(),
            creator_id: Some(guard.actor_id()),
            remark: request.remark,
            created_at: now,
            updated_at: now,
        };

        let created = self.department_repo.create(&department).await?;
        self.audit
            .created(EntityType::Department, created.id, guard.actor_id(), &created)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "department.create",
            target = %created.id,
            "department created"
        );
        Ok(created)
    }

    pub async fn update_department(
        &self,
        actor: &Actor,
        id: Uuid,
        request: DepartmentRequest,
    ) -> AppResult<Department> {
        request.validate()?;
        let guard = self.admin(actor).await?;
        let existing = self.get_department(id).await?;

        let department = Department {
            business_line_id: request.business_line_id,
            name: request.name.trim().to_string(),
            remark: request.remark,
            creator_id: Some(guard.actor_id()),
            updated_at: Utc::now(),
            ..existing.clone()
        };

        let updated = self.department_repo.update(&department).await?;
        self.audit
            .updated(EntityType::Department, id, guard.actor_id(), &existing, &updated)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "department.update",
            target = %id,
            "department updated"
        );
        Ok(updated)
    }

    pub async fn delete_department(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let guard = self.admin(actor).await?;
        let existing = self.get_department(id).await?;

        self.department_repo.delete(id).await?;
        self.audit
            .deleted(EntityType::Department, id, guard.actor_id(), &existing)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "department.delete",
            target = %id,
            "department deleted"
        );
        Ok(())
    }

    pub async fn list_suppliers(&self, active_only: bool) -> AppResult<Vec<Supplier>> {
        self.supplier_repo.list(active_only).await
    }

    pub async fn get_supplier(&self, id: Uuid) -> AppResult<Supplier> {
        self.supplier_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("supplier not found".to_string()))
    }

    pub async fn create_supplier(
        &self,
        actor: &Actor,
        request: SupplierRequest,
    ) -> AppResult<Supplier> {
        request.validate()?;
        let guard = self.admin(actor).await?;

        let now = Utc::now();
        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            contact: request.contact,
            phone: request.phone,
            email: request.email,
            address: request.address,
            is_active: request.is_active.unwrap_or(true),
            creator_id: Some(guard.actor_id()),
            remark: request.remark,
            created_at: now,
            updated_at: now,
        };

        let created = self.supplier_repo.create(&supplier).await?;
        self.audit
            .created(EntityType::Supplier, created.id, guard.actor_id(), &created)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "supplier.create",
            target = %created.id,
            "supplier created"
        );
        Ok(created)
    }

    pub async fn update_supplier(
        &self,
        actor: &Actor,
        id: Uuid,
        request: SupplierRequest,
    ) -> AppResult<Supplier> {
        request.validate()?;
        let guard = self.admin(actor).await?;
        let existing = self.get_supplier(id).await?;

        let supplier = Supplier {
            name: request.name.trim().to_string(),
            contact: request.contact,
            phone: request.phone,
            email: request.email,
            address: request.address,
            is_active: request.is_active.unwrap_or(existing.is_active),
            remark: request.remark,
            creator_id: Some(guard.actor_id()),
            updated_at: Utc::now(),
            ..existing.clone()
        };

        let updated = self.supplier_repo.update(&supplier).await?;
        self.audit
            .updated(EntityType::Supplier, id, guard.actor_id(), &existing, &updated)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "supplier.update",
            target = %id,
            "supplier updated"
        );
        Ok(updated)
    }

    pub async fn delete_supplier(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let guard = self.admin(actor).await?;
        let existing = self.get_supplier(id).await?;

        self.supplier_repo.delete(id).await?;
        self.audit
            .deleted(EntityType::Supplier, id, guard.actor_id(), &existing)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "supplier.delete",
            target = %id,
            "supplier deleted"
        );
        Ok(())
    }

    pub async fn list_assignments(
        &self,
        params: PaginationParams,
    ) -> AppResult<Vec<ManagerAssignment>> {
        let page = params.page();
        self.assignment_repo.list(page.limit, page.offset()).await
    }

    pub async fn get_assignment(&self, id: Uuid) -> AppResult<ManagerAssignment> {
        self.assignment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("manager assignment not found".to_string()))
    }

    async fn ensure_assignment_targets(&self, request: &ManagerAssignmentRequest) -> AppResult<()> {
        if self.actor_repo.find_by_id(request.user_id).await?.is_none() {
            return Err(AppError::field_error(
                "user_id",
                "not_found",
                "user does not exist",
            ));
        }
        if let Some(department_id) = request.department_id {
            if self.department_repo.find_by_id(department_id).await?.is_none() {
                return Err(AppError::field_error(
                    "department_id",
                    "not_found",
                    "department does not exist",
                ));
            }
        }
        Ok(())
    }

    pub async fn create_assignment(
        &self,
        actor: &Actor,
        request: ManagerAssignmentRequest,
    ) -> AppResult<ManagerAssignment> {
        request.validate()?;
        let guard = self.admin(actor).await?;
        self.ensure_assignment_targets(&request).await?;

        let now = Utc::now();
        let assignment = ManagerAssignment {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            department_id: request.department_id,
            employee_id: request.employee_id,
            phone: request.phone,
            email: request.email,
            is_active: request.is_active.unwrap_or(true),
            creator_id: Some(guard.actor_id()),
            remark: request.remark,
            created_at: now,
            updated_at: now,
        };

        let created = self.assignment_repo.create(&assignment).await?;
        self.audit
            .created(EntityType::ManagerAssignment, created.id, guard.actor_id(), &created)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "manager_assignment.create",
            target = %created.id,
            user = %created.user_id,
            "manager assignment created"
        );
        Ok(created)
    }

    pub async fn update_assignment(
        &self,
        actor: &Actor,
        id: Uuid,
        request: ManagerAssignmentRequest,
    ) -> AppResult<ManagerAssignment> {
        request.validate()?;
        let guard = self.admin(actor).await?;
        let existing = self.get_assignment(id).await?;
        self.ensure_assignment_targets(&request).await?;

        let assignment = ManagerAssignment {
            user_id: request.user_id,
            department_id: request.department_id,
            employee_id: request.employee_id,
            phone: request.phone,
            email: request.email,
            is_active: request.is_active.unwrap_or(existing.is_active),
            remark: request.remark,
            creator_id: Some(guard.actor_id()),
            updated_at: Utc::now(),
            ..existing.clone()
        };

        let updated = self.assignment_repo.update(&assignment).await?;
        self.audit
            .updated(EntityType::ManagerAssignment, id, guard.actor_id(), &existing, &updated)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "manager_assignment.update",
            target = %id,
            "manager assignment updated"
        );
        Ok(updated)
    }

    pub async fn delete_assignment(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let guard = self.admin(actor).await?;
        let existing = self.get_assignment(id).await?;

        self.assignment_repo.delete(id).await?;
        self.audit
            .deleted(EntityType::ManagerAssignment, id, guard.actor_id(), &existing)
            .await;
        info!(
            actor = %guard.actor_id(),
            action = "manager_assignment.delete",
            target = %id,
            "manager assignment deleted"
        );
        Ok(())
    }
}
