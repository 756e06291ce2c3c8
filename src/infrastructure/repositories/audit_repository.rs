use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{AuditAction, AuditEntry, EntityType};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::traits::AuditRepository;

pub struct AuditRepositoryImpl {
    pool: PgPool,
}

impl AuditRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    entity_id: Uuid,
    action: String,
    actor_id: Uuid,
    before: Option<serde_json::Value>,
    after: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl AuditRepository for AuditRepositoryImpl {
    async fn append(&self, entry: &AuditEntry) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO audit_log (id, entity_type, entity_id, action, actor_id, before, after, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(entry.id)
        .bind(entry.entity_type.to_string())
        .bind(entry.entity_id)
        .bind(entry.action.to_string())
        .bind(entry.actor_id)
        .bind(&entry.before)
        .bind(&entry.after)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_for(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> AppResult<Vec<AuditEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(
            "SELECT id, entity_id, action, actor_id, before, after, created_at FROM audit_log \
             WHERE entity_type = $1 AND entity_id = $2 ORDER BY created_at",
        )
        .bind(entity_type.to_string())
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let action = row
                    .action
                    .parse::<AuditAction>()
                    .map_err(|message| AppError::InternalError(anyhow::anyhow!(message)))?;
                Ok(AuditEntry {
                    id: row.id,
                    entity_type,
                    entity_id: row.entity_id,
                    action,
                    actor_id: row.actor_id,
                    before: row.before,
                    after: row.after,
                    created_at: row.created_at,
                })
            })
            .collect()
    }
}
