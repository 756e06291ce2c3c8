use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{SparePart, SparePartType};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::traits::{SparePartRepository, SparePartTypeRepository};
use crate::infrastructure::repositories::utils::ensure_deleted;

const PART_TYPE_COLUMNS: &str = "id, name, creator_id, remark, created_at, updated_at";
const PART_COLUMNS: &str = "id, part_type_id, name, serial_number, supplier_id, \
     warranty_months, creator_id, remark, created_at, updated_at";

pub struct SparePartTypeRepositoryImpl {
    pool: PgPool,
}

impl SparePartTypeRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SparePartTypeRepository for SparePartTypeRepositoryImpl {
    async fn list(&self) -> AppResult<Vec<SparePartType>> {
        let sql = format!("SELECT {PART_TYPE_COLUMNS} FROM spare_part_types ORDER BY name");
        Ok(sqlx::query_as::<_, SparePartType>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SparePartType>> {
        let sql = format!("SELECT {PART_TYPE_COLUMNS} FROM spare_part_types WHERE id = $1");
        Ok(sqlx::query_as::<_, SparePartType>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, part_type: &SparePartType) -> AppResult<SparePartType> {
        let sql = format!(
            "INSERT INTO spare_part_types ({PART_TYPE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PART_TYPE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, SparePartType>(&sql)
            .bind(part_type.id)
            .bind(&part_type.name)
            .bind(part_type.creator_id)
            .bind(&part_type.remark)
            .bind(part_type.created_at)
            .bind(part_type.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(&self, part_type: &SparePartType) -> AppResult<SparePartType> {
        let sql = format!(
            "UPDATE spare_part_types SET name = $2, creator_id = $3, remark = $4, \
             updated_at = NOW() WHERE id = $1 RETURNING {PART_TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, SparePartType>(&sql)
            .bind(part_type.id)
            .bind(&part_type.name)
            .bind(part_type.creator_id)
            .bind(&part_type.remark)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("spare part type not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM spare_part_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        ensure_deleted(result.rows_affected(), "spare part type")
    }
}

pub struct SparePartRepositoryImpl {
    pool: PgPool,
}

impl SparePartRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SparePartRepository for SparePartRepositoryImpl {
    async fn list(&self, part_type_id: Option<Uuid>) -> AppResult<Vec<SparePart>> {
        let sql = format!(
            "SELECT {PART_COLUMNS} FROM spare_parts \
             WHERE ($1::uuid IS NULL OR part_type_id = $1) ORDER BY name"
        );
        Ok(sqlx::query_as::<_, SparePart>(&sql)
            .bind(part_type_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SparePart>> {
        let sql = format!("SELECT {PART_COLUMNS} FROM spare_parts WHERE id = $1");
        Ok(sqlx::query_as::<_, SparePart>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<SparePart>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {PART_COLUMNS} FROM spare_parts WHERE id = ANY($1)");
        Ok(sqlx::query_as::<_, SparePart>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create(&self, part: &SparePart) -> AppResult<SparePart> {
        let sql = format!(
            "INSERT INTO spare_parts ({PART_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {PART_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, SparePart>(&sql)
            .bind(part.id)
            .bind(part.part_type_id)
            .bind(&part.name)
            .bind(&part.serial_number)
            .bind(part.supplier_id)
            .bind(part.warranty_months)
            .bind(part.creator_id)
            .bind(&part.remark)
            .bind(part.created_at)
            .bind(part.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(&self, part: &SparePart) -> AppResult<SparePart> {
        let sql = format!(
            "UPDATE spare_parts SET part_type_id = $2, name = $3, serial_number = $4, \
             supplier_id = $5, warranty_months = $6, creator_id = $7, remark = $8, \
             updated_at = NOW() WHERE id = $1 RETURNING {PART_COLUMNS}"
        );
        sqlx::query_as::<_, SparePart>(&sql)
            .bind(part.id)
            .bind(part.part_type_id)
            .bind(&part.name)
            .bind(&part.serial_number)
            .bind(part.supplier_id)
            .bind(part.warranty_months)
            .bind(part.creator_id)
            .bind(&part.remark)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("spare part not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM spare_parts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        ensure_deleted(result.rows_affected(), "spare part")
    }
}
