use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{BusinessLine, Department, Supplier};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::traits::{
    BusinessLineRepository, DepartmentRepository, SupplierRepository,
};
use crate::infrastructure::repositories::utils::ensure_deleted;

const BUSINESS_LINE_COLUMNS: &str = "id, name, creator_id, remark, created_at, updated_at";
const DEPARTMENT_COLUMNS: &str =
    "id, business_line_id, name, creator_id, remark, created_at, updated_at";
const SUPPLIER_COLUMNS: &str = "id, name, contact, phone, email, address, is_active, \
     creator_id, remark, created_at, updated_at";

pub struct BusinessLineRepositoryImpl {
    pool: PgPool,
}

impl BusinessLineRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessLineRepository for BusinessLineRepositoryImpl {
    async fn list(&self) -> AppResult<Vec<BusinessLine>> {
        let sql = format!("SELECT {BUSINESS_LINE_COLUMNS} FROM business_lines ORDER BY name");
        Ok(sqlx::query_as::<_, BusinessLine>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BusinessLine>> {
        let sql = format!("SELECT {BUSINESS_LINE_COLUMNS} FROM business_lines WHERE id = $1");
        Ok(sqlx::query_as::<_, BusinessLine>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<BusinessLine>> {
        let sql = format!("SELECT {BUSINESS_LINE_COLUMNS} FROM business_lines WHERE name = $1");
        Ok(sqlx::query_as::<_, BusinessLine>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, line: &BusinessLine) -> AppResult<BusinessLine> {
        let sql = format!(
            "INSERT INTO business_lines ({BUSINESS_LINE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {BUSINESS_LINE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, BusinessLine>(&sql)
            .bind(line.id)
            .bind(&line.name)
            .bind(line.creator_id)
            .bind(&line.remark)
            .bind(line.created_at)
            .bind(line.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(&self, line: &BusinessLine) -> AppResult<BusinessLine> {
        let sql = format!(
            "UPDATE business_lines SET name = $2, creator_id = $3, remark = $4, \
             updated_at = NOW() WHERE id = $1 RETURNING {BUSINESS_LINE_COLUMNS}"
        );
        sqlx::query_as::<_, BusinessLine>(&sql)
            .bind(line.id)
            .bind(&line.name)
            .bind(line.creator_id)
            .bind(&line.remark)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("business line not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM business_lines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        ensure_deleted(result.rows_affected(), "business line")
    }
}

pub struct DepartmentRepositoryImpl {
    pool: PgPool,
}

impl DepartmentRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentRepository for DepartmentRepositoryImpl {
    async fn list(&self) -> AppResult<Vec<Department>> {
        let sql = format!("SELECT {DEPARTMENT_COLUMNS} FROM departments ORDER BY name");
        Ok(sqlx::query_as::<_, Department>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Department>> {
        let sql = format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = $1");
        Ok(sqlx::query_as::<_, Department>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Department>> {
        let sql = format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE name = $1");
        Ok(sqlx::query_as::<_, Department>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, department: &Department) -> AppResult<Department> {
        let sql = format!(
            "INSERT INTO departments ({DEPARTMENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {DEPARTMENT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Department>(&sql)
            .bind(department.id)
            .bind(department.business_line_id)
            .bind(&department.name)
            .bind(department.creator_id)
            .bind(&department.remark)
            .bind(department.created_at)
            .bind(department.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(&self, department: &Department) -> AppResult<Department> {
        let sql = format!(
            "UPDATE departments SET business_line_id = $2, name = $3, creator_id = $4, \
             remark = $5, updated_at = NOW() WHERE id = $1 RETURNING {DEPARTMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&sql)
            .bind(department.id)
            .bind(department.business_line_id)
            .bind(&department.name)
            .bind(department.creator_id)
            .bind(&department.remark)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("department not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        ensure_deleted(result.rows_affected(), "department")
    }
}

pub struct SupplierRepositoryImpl {
    pool: PgPool,
}

impl SupplierRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SupplierRepository for SupplierRepositoryImpl {
    async fn list(&self, active_only: bool) -> AppResult<Vec<Supplier>> {
        let sql = format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers \
             WHERE ($1 = FALSE OR is_active) ORDER BY name"
        );
        Ok(sqlx::query_as::<_, Supplier>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Supplier>> {
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = $1");
        Ok(sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Supplier>> {
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE name = $1");
        Ok(sqlx::query_as::<_, Supplier>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, supplier: &Supplier) -> AppResult<Supplier> {
        let sql = format!(
            "INSERT INTO suppliers ({SUPPLIER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {SUPPLIER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Supplier>(&sql)
            .bind(supplier.id)
            .bind(&supplier.name)
            .bind(&supplier.contact)
            .bind(&supplier.phone)
            .bind(&supplier.email)
            .bind(&supplier.address)
            .bind(supplier.is_active)
            .bind(supplier.creator_id)
            .bind(&supplier.remark)
            .bind(supplier.created_at)
            .bind(supplier.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(&self, supplier: &Supplier) -> AppResult<Supplier> {
        let sql = format!(
            "UPDATE suppliers SET name = $2, contact = $3, phone = $4, email = $5, \
             address = $6, is_active = $7, creator_id = $8, remark = $9, updated_at = NOW() \
             WHERE id = $1 RETURNING {SUPPLIER_COLUMNS}"
        );
        sqlx::query_as::<_, Supplier>(&sql)
            .bind(supplier.id)
            .bind(&supplier.name)
            .bind(&supplier.contact)
            .bind(&supplier.phone)
            .bind(&supplier.email)
            .bind(&supplier.address)
            .bind(supplier.is_active)
            .bind(supplier.creator_id)
            .bind(&supplier.remark)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("supplier not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        ensure_deleted(result.rows_affected(), "supplier")
    }
}
