use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::{Asset, AssetType, ListScope};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::traits::{AssetFilter, AssetRepository, NestedCount};
use crate::infrastructure::repositories::utils::{contains_pattern, ensure_deleted, push_scope};

const ASSET_COLUMNS: &str = "id, name, serial_number, asset_type, location, business_line_id, \
     department_id, supplier_id, purchase_date, warranty_months, price, status, qr_payload, \
     repair_count, is_active, creator_id, remark, created_at, updated_at";

pub struct AssetRepositoryImpl {
    pool: PgPool,
}

impl AssetRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, scope: &ListScope, filter: &AssetFilter) {
    push_scope(builder, "department_id", scope);

    if let Some(pattern) = contains_pattern(filter.search.as_deref()) {
        builder.push(" AND (name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR serial_number ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR location ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
    if let Some(asset_type) = filter.asset_type {
        builder.push(" AND asset_type = ");
        builder.push_bind(asset_type);
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }
    if let Some(business_line_id) = filter.business_line_id {
        builder.push(" AND business_line_id = ");
        builder.push_bind(business_line_id);
    }
    if let Some(department_id) = filter.department_id {
        builder.push(" AND department_id = ");
        builder.push_bind(department_id);
    }
    if let Some(supplier_id) = filter.supplier_id {
        builder.push(" AND supplier_id = ");
        builder.push_bind(supplier_id);
    }
    if let Some(is_active) = filter.is_active {
        builder.push(" AND is_active = ");
        builder.push_bind(is_active);
    }
}

#[derive(sqlx::FromRow)]
struct DepartmentTypeCount {
    department: String,
    asset_type: AssetType,
    count: i64,
}

#[async_trait]
impl AssetRepository for AssetRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Asset>> {
        let sql = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1");
        Ok(sqlx::query_as::<_, Asset>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_serial(&self, serial_number: &str) -> AppResult<Option<Asset>> {
        let sql = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE serial_number = $1");
        Ok(sqlx::query_as::<_, Asset>(&sql)
            .bind(serial_number)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(
        &self,
        scope: &ListScope,
        filter: &AssetFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Asset>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE 1=1"
        ));
        push_filters(&mut builder, scope, filter);
        builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        Ok(builder
            .build_query_as::<Asset>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count(&self, scope: &ListScope, filter: &AssetFilter) -> AppResult<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM assets WHERE 1=1");
        push_filters(&mut builder, scope, filter);

        Ok(builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_after(
        &self,
        scope: &ListScope,
        after: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> AppResult<Vec<Asset>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE 1=1"
        ));
        push_scope(&mut builder, "department_id", scope);
        if let Some((created_at, id)) = after {
            builder.push(" AND (created_at, id) > (");
            builder.push_bind(created_at);
            builder.push(", ");
            builder.push_bind(id);
            builder.push(")");
        }
        builder.push(" ORDER BY created_at, id LIMIT ");
        builder.push_bind(limit);

        Ok(builder
            .build_query_as::<Asset>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create(&self, asset: &Asset) -> AppResult<Asset> {
        let sql = format!(
            "INSERT INTO assets ({ASSET_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) \
             RETURNING {ASSET_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Asset>(&sql)
            .bind(asset.id)
            .bind(&asset.name)
            .bind(&asset.serial_number)
            .bind(asset.asset_type)
            .bind(&asset.location)
            .bind(asset.business_line_id)
            .bind(asset.department_id)
            .bind(asset.supplier_id)
            .bind(asset.purchase_date)
            .bind(asset.warranty_months)
            .bind(asset.price)
            .bind(asset.status)
            .bind(&asset.qr_payload)
            .bind(asset.repair_count)
            .bind(asset.is_active)
            .bind(asset.creator_id)
            .bind(&asset.remark)
            .bind(asset.created_at)
            .bind(asset.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(&self, asset: &Asset) -> AppResult<Asset> {
        let sql = format!(
            "UPDATE assets SET name = $2, serial_number = $3, asset_type = $4, location = $5, \
             business_line_id = $6, department_id = $7, supplier_id = $8, purchase_date = $9, \
             warranty_months = $10, price = $11, status = $12, qr_payload = $13, \
             is_active = $14, creator_id = $15, remark = $16, updated_at = NOW() \
             WHERE id = $1 RETURNING {ASSET_COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&sql)
            .bind(asset.id)
            .bind(&asset.name)
            .bind(&asset.serial_number)
            .bind(asset.asset_type)
            .bind(&asset.location)
            .bind(asset.business_line_id)
            .bind(asset.department_id)
            .bind(asset.supplier_id)
            .bind(asset.purchase_date)
            .bind(asset.warranty_months)
            .bind(asset.price)
            .bind(asset.status)
            .bind(&asset.qr_payload)
            .bind(asset.is_active)
            .bind(asset.creator_id)
            .bind(&asset.remark)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("asset not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        ensure_deleted(result.rows_affected(), "asset")
    }

    async fn count_by_department_and_type(
        &self,
        scope: &ListScope,
    ) -> AppResult<Vec<NestedCount>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT d.name AS department, a.asset_type, COUNT(*) AS count \
             FROM assets a JOIN departments d ON d.id = a.department_id WHERE 1=1",
        );
        push_scope(&mut builder, "a.department_id", scope);
        builder.push(" GROUP BY d.name, a.asset_type");

        let rows = builder
            .build_query_as::<DepartmentTypeCount>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| NestedCount {
                outer: row.department,
                inner: Some(row.asset_type.label().to_string()),
                count: row.count,
            })
            .collect())
    }
}
