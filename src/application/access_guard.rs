//! Department-scoped row authorization.
//!
//! A superuser may do anything. Anyone else may touch a record they last wrote,
//! or any record in a department they hold a manager assignment for.

use uuid::Uuid;

use crate::domain::{Actor, DepartmentScoped, ListScope, Lockable, ManagerAssignment};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::ManagerAssignmentRepository;

/// An actor together with the departments they manage, loaded once per request.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    actor: Actor,
    assignments: Vec<ManagerAssignment>,
}

impl AccessGuard {
    pub fn new(actor: Actor, assignments: Vec<ManagerAssignment>) -> Self {
        Self { actor, assignments }
    }

    pub async fn load(repo: &dyn ManagerAssignmentRepository, actor: &Actor) -> AppResult<Self> {
        let assignments = if actor.is_superuser {
            Vec::new()
        } else {
            repo.find_by_user(actor.id).await?
        };
        Ok(Self::new(actor.clone(), assignments))
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn actor_id(&self) -> Uuid {
        self.actor.id
    }

    pub fn is_superuser(&self) -> bool {
        self.actor.is_superuser
    }

    pub fn manages(&self, department_id: Option<Uuid>) -> bool {
        self.assignments
            .iter()
            .any(|assignment| assignment.manages(department_id))
    }

    pub fn list_scope(&self) -> ListScope {
        if self.actor.is_superuser {
            return ListScope::Unrestricted;
        }
        let mut departments: Vec<Uuid> = self
            .assignments
            .iter()
            .filter_map(|assignment| assignment.department_id)
            .collect();
        departments.sort_unstable();
        departments.dedup();
        ListScope::Departments(departments)
    }

    /// Any assignment counts, even one without a department.
    pub fn can_create(&self) -> bool {
        self.actor.is_superuser || !self.assignments.is_empty()
    }

    pub fn can_mutate<R: DepartmentScoped>(&self, record: Option<&R>) -> bool {
        let Some(record) = record else {
            return self.can_create();
        };
        self.actor.is_superuser
            || record.creator_id() == Some(self.actor.id)
            || self.manages(record.department_id())
    }

    pub fn can_view<R: DepartmentScoped>(&self, record: &R) -> bool {
        match record.department_id() {
            Some(department_id) => self.list_scope().permits(department_id),
            None => self.actor.is_superuser,
        }
    }

    /// New rows must land in a department the actor manages.
    pub fn authorize_create<R: DepartmentScoped>(&self, record: &R) -> AppResult<()> {
        if !self.can_create() {
            return Err(AppError::forbidden(
                "you are not an asset manager and cannot create records",
            ));
        }
        if !self.actor.is_superuser && !self.manages(record.department_id()) {
            return Err(AppError::forbidden(
                "you can only create records in departments you manage",
            ));
        }
        Ok(())
    }

    pub fn authorize_mutate<R: DepartmentScoped>(&self, record: &R) -> AppResult<()> {
        if self.can_mutate(Some(record)) {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "you do not have permission to modify this record",
            ))
        }
    }

    /// Reads stay open; only field writes are frozen.
    pub fn ensure_writable<R: Lockable>(&self, record: &R) -> AppResult<()> {
        if record.is_locked() && !self.actor.is_superuser {
            return Err(AppError::forbidden(record.lock_reason()));
        }
        Ok(())
    }

    pub fn stamp_creator<R: DepartmentScoped>(&self, record: &mut R) {
        record.set_creator(self.actor.id);
    }

    pub fn require_superuser(&self) -> AppResult<()> {
        if self.actor.is_superuser {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "only administrators can change reference data",
            ))
        }
    }
}
