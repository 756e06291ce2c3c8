use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Actor, ManagerAssignment};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::traits::{ActorRepository, ManagerAssignmentRepository};
use crate::infrastructure::repositories::utils::ensure_deleted;

const ASSIGNMENT_COLUMNS: &str = "id, user_id, department_id, employee_id, phone, email, \
     is_active, creator_id, remark, created_at, updated_at";

pub struct ActorRepositoryImpl {
    pool: PgPool,
}

impl ActorRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActorRepository for ActorRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Actor>> {
        let actor = sqlx::query_as::<_, Actor>(
            "SELECT id, username, full_name, is_superuser, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(actor)
    }

    async fn usernames(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT id, username FROM users WHERE id = ANY($1)",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }
}

pub struct ManagerAssignmentRepositoryImpl {
    pool: PgPool,
}

impl ManagerAssignmentRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ManagerAssignmentRepository for ManagerAssignmentRepositoryImpl {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<ManagerAssignment>> {
        let sql = format!("SELECT {ASSIGNMENT_COLUMNS} FROM asset_managers WHERE user_id = $1");
        let assignments = sqlx::query_as::<_, ManagerAssignment>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(assignments)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ManagerAssignment>> {
        let sql = format!("SELECT {ASSIGNMENT_COLUMNS} FROM asset_managers WHERE id = $1");
        let assignment = sqlx::query_as::<_, ManagerAssignment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(assignment)
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<ManagerAssignment>> {
        let sql = format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM asset_managers \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let assignments = sqlx::query_as::<_, ManagerAssignment>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(assignments)
    }

    async fn create(&self, assignment: &ManagerAssignment) -> AppResult<ManagerAssignment> {
        let sql = format!(
            "INSERT INTO asset_managers ({ASSIGNMENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {ASSIGNMENT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, ManagerAssignment>(&sql)
            .bind(assignment.id)
            .bind(assignment.user_id)
            .bind(assignment.department_id)
            .bind(&assignment.employee_id)
            .bind(&assignment.phone)
            .bind(&assignment.email)
            .bind(assignment.is_active)
            .bind(assignment.creator_id)
            .bind(&assignment.remark)
            .bind(assignment.created_at)
            .bind(assignment.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update(&self, assignment: &ManagerAssignment) -> AppResult<ManagerAssignment> {
        let sql = format!(
            "UPDATE asset_managers SET user_id = $2, department_id = $3, employee_id = $4, \
             phone = $5, email = $6, is_active = $7, creator_id = $8, remark = $9, \
             updated_at = NOW() \
             WHERE id = $1 RETURNING {ASSIGNMENT_COLUMNS}"
        );
        sqlx::query_as::<_, ManagerAssignment>(&sql)
            .bind(assignment.id)
            .bind(assignment.user_id)
            .bind(assignment.department_id)
            .bind(&assignment.employee_id)
            .bind(&assignment.phone)
            .bind(&assignment.email)
            .bind(assignment.is_active)
            .bind(assignment.creator_id)
            .bind(&assignment.remark)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("manager assignment not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM asset_managers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        ensure_deleted(result.rows_affected(), "manager assignment")
    }
}
