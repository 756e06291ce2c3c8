use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The authenticated identity performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Actor {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

impl Actor {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Grants an actor management rights over one department.
///
/// A row without a department grants nothing: it never satisfies the
/// department-match predicate, but it still counts for `can_create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ManagerAssignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub department_id: Option<Uuid>,
    pub employee_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub creator_id: Option<Uuid>,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ManagerAssignment {
    pub fn manages(&self, department_id: Option<Uuid>) -> bool {
        match (self.department_id, department_id) {
            (Some(managed), Some(target)) => managed == target,
            _ => false,
        }
    }
}
