use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::warn;
use uuid::Uuid;

use crate::application::repair_lifecycle::{allocate_number, repair_number_prefix};
use crate::domain::{ListScope, RepairRecord};
use crate::error::{AppError, AppResult, UNIQUE_VIOLATION};
use crate::infrastructure::repositories::traits::{
    NestedCount, RepairFilter, RepairGrouping, RepairRepository,
};
use crate::infrastructure::repositories::utils::{contains_pattern, ensure_deleted, push_scope};

const REPAIR_COLUMNS: &str = "id, repair_number, asset_id, department_id, applicant, \
     fault_description, supplier_id, repair_type, repair_status, repair_start_time, \
     repair_duration_secs, creator_id, remark, created_at, updated_at";

const REPAIR_NUMBER_CONSTRAINT: &str = "repair_records_repair_number_key";

pub struct RepairRepositoryImpl {
    pool: PgPool,
}

impl RepairRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn attach_spare_parts(&self, records: &mut [RepairRecord]) -> AppResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = records.iter().map(|record| record.id).collect();
        let links = sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT repair_record_id, spare_part_id FROM repair_record_spare_parts \
             WHERE repair_record_id = ANY($1) ORDER BY spare_part_id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_record: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (record_id, part_id) in links {
            by_record.entry(record_id).or_default().push(part_id);
        }
        for record in records.iter_mut() {
            record.spare_part_ids = by_record.remove(&record.id).unwrap_or_default();
        }
        Ok(())
    }

    /// One claim attempt. `Ok(None)` means another writer took the number first.
    async fn try_create(
        &self,
        record: &RepairRecord,
        business_date: NaiveDate,
    ) -> AppResult<Option<RepairRecord>> {
        let prefix = repair_number_prefix(business_date);
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&prefix)
            .execute(&mut *tx)
            .await?;

        let last: Option<String> = sqlx::query_scalar(
            "SELECT MAX(repair_number) FROM repair_records WHERE repair_number LIKE $1",
        )
        .bind(format!("{prefix}%"))
        .fetch_one(&mut *tx)
        .await?;

        let repair_number = allocate_number(business_date, last.as_deref())?;

        let sql = format!(
            "INSERT INTO repair_records ({REPAIR_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {REPAIR_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, RepairRecord>(&sql)
            .bind(record.id)
            .bind(&repair_number)
            .bind(record.asset_id)
            .bind(record.department_id)
            .bind(&record.applicant)
            .bind(&record.fault_description)
            .bind(record.supplier_id)
            .bind(record.repair_type)
            .bind(record.repair_status)
            .bind(record.repair_start_time)
            .bind(record.repair_duration_secs)
            .bind(record.creator_id)
            .bind(&record.remark)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&mut *tx)
            .await;

        let mut created = match inserted {
            Ok(created) => created,
            Err(err) if is_repair_number_collision(&err) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        replace_spare_parts(&mut tx, created.id, &record.spare_part_ids).await?;

        let bumped = sqlx::query(
            "UPDATE assets SET repair_count = repair_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(record.asset_id)
        .execute(&mut *tx)
        .await?;
        if bumped.rows_affected() == 0 {
            return Err(AppError::NotFound("asset not found".to_string()));
        }

        tx.commit().await?;
        created.spare_part_ids = record.spare_part_ids.clone();
        Ok(Some(created))
    }
}

fn is_repair_number_collision(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db.constraint() == Some(REPAIR_NUMBER_CONSTRAINT)
        }
        _ => false,
    }
}

async fn replace_spare_parts(
    tx: &mut Transaction<'_, Postgres>,
    record_id: Uuid,
    spare_part_ids: &[Uuid],
) -> AppResult<()> {
    sqlx::query("DELETE FROM repair_record_spare_parts WHERE repair_record_id = $1")
        .bind(record_id)
        .execute(&mut **tx)
        .await?;
    if spare_part_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO repair_record_spare_parts (repair_record_id, spare_part_id) \
         SELECT $1, part_id FROM UNNEST($2::uuid[]) AS part_id",
    )
    .bind(record_id)
    .bind(spare_part_ids.to_vec())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn push_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    scope: &ListScope,
    filter: &RepairFilter,
) {
    push_scope(builder, "department_id", scope);

    if let Some(pattern) = contains_pattern(filter.search.as_deref()) {
        builder.push(" AND (repair_number ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR applicant ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR fault_description ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
    if let Some(asset_id) = filter.asset_id {
        builder.push(" AND asset_id = ");
        builder.push_bind(asset_id);
    }
    if let Some(department_id) = filter.department_id {
        builder.push(" AND department_id = ");
        builder.push_bind(department_id);
    }
    if let Some(supplier_id) = filter.supplier_id {
        builder.push(" AND supplier_id = ");
        builder.push_bind(supplier_id);
    }
    if let Some(repair_type) = filter.repair_type {
        builder.push(" AND repair_type = ");
        builder.push_bind(repair_type);
    }
    if let Some(repair_status) = filter.repair_status {
        builder.push(" AND repair_status = ");
        builder.push_bind(repair_status);
    }
}

#[async_trait]
impl RepairRepository for RepairRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RepairRecord>> {
        let sql = format!("SELECT {REPAIR_COLUMNS} FROM repair_records WHERE id = $1");
        let record = sqlx::query_as::<_, RepairRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match record {
            Some(record) => {
                let mut records = [record];
                self.attach_spare_parts(&mut records).await?;
                let [record] = records;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        scope: &ListScope,
        filter: &RepairFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<RepairRecord>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {REPAIR_COLUMNS} FROM repair_records WHERE 1=1"
        ));
        push_filters(&mut builder, scope, filter);
        builder.push(" ORDER BY repair_number DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let mut records = builder
            .build_query_as::<RepairRecord>()
            .fetch_all(&self.pool)
            .await?;
        self.attach_spare_parts(&mut records).await?;
        Ok(records)
    }

    async fn list_after(
        &self,
        scope: &ListScope,
        after: Option<&str>,
        limit: i64,
    ) -> AppResult<Vec<RepairRecord>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {REPAIR_COLUMNS} FROM repair_records WHERE 1=1"
        ));
        push_scope(&mut builder, "department_id", scope);
        if let Some(repair_number) = after {
            builder.push(" AND repair_number COLLATE \"C\" > ");
            builder.push_bind(repair_number.to_string());
        }
        builder.push(" ORDER BY repair_number COLLATE \"C\" LIMIT ");
        builder.push_bind(limit);

        let mut records = builder
            .build_query_as::<RepairRecord>()
            .fetch_all(&self.pool)
            .await?;
        self.attach_spare_parts(&mut records).await?;
        Ok(records)
    }

    async fn count(&self, scope: &ListScope, filter: &RepairFilter) -> AppResult<i64> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM repair_records WHERE 1=1");
        push_filters(&mut builder, scope, filter);

        Ok(builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?)
    }

    async fn create_with_number(
        &self,
        record: &RepairRecord,
        business_date: NaiveDate,
        max_attempts: u32,
    ) -> AppResult<RepairRecord> {
        for attempt in 1..=max_attempts {
            if let Some(created) = self.try_create(record, business_date).await? {
                return Ok(created);
            }
            warn!(
                attempt,
                max_attempts,
                date = %business_date,
                "repair number claim lost, retrying"
            );
        }

        Err(AppError::Conflict(
            "could not allocate a repair number, please retry".to_string(),
        ))
    }

    async fn update(&self, record: &RepairRecord) -> AppResult<RepairRecord> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE repair_records SET asset_id = $2, department_id = $3, applicant = $4, \
             fault_description = $5, supplier_id = $6, repair_type = $7, repair_status = $8, \
             repair_start_time = $9, repair_duration_secs = $10, creator_id = $11, \
             remark = $12, updated_at = NOW() \
             WHERE id = $1 RETURNING {REPAIR_COLUMNS}"
        );
        let mut updated = sqlx::query_as::<_, RepairRecord>(&sql)
            .bind(record.id)
            .bind(record.asset_id)
            .bind(record.department_id)
            .bind(&record.applicant)
            .bind(&record.fault_description)
            .bind(record.supplier_id)
            .bind(record.repair_type)
            .bind(record.repair_status)
            .bind(record.repair_start_time)
            .bind(record.repair_duration_secs)
            .bind(record.creator_id)
            .bind(&record.remark)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("repair record not found".to_string()))?;

        replace_spare_parts(&mut tx, record.id, &record.spare_part_ids).await?;
        tx.commit().await?;

        updated.spare_part_ids = record.spare_part_ids.clone();
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM repair_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        ensure_deleted(result.rows_affected(), "repair record")
    }

    async fn count_by_part_type(
        &self,
        scope: &ListScope,
        grouping: RepairGrouping,
    ) -> AppResult<Vec<NestedCount>> {
        let (outer_name, outer_join) = match grouping {
            RepairGrouping::Department => {
                ("g.name", "JOIN departments g ON g.id = r.department_id")
            }
            RepairGrouping::Supplier => ("g.name", "JOIN suppliers g ON g.id = r.supplier_id"),
        };

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {outer_name} AS \"outer\", t.name AS \"inner\", COUNT(*) AS count \
             FROM repair_records r {outer_join} \
             LEFT JOIN repair_record_spare_parts l ON l.repair_record_id = r.id \
             LEFT JOIN spare_parts p ON p.id = l.spare_part_id \
             LEFT JOIN spare_part_types t ON t.id = p.part_type_id \
             WHERE 1=1"
        ));
        push_scope(&mut builder, "r.department_id", scope);
        builder.push(format!(" GROUP BY {outer_name}, t.name"));

        Ok(builder
            .build_query_as::<NestedCount>()
            .fetch_all(&self.pool)
            .await?)
    }
}
