use std::sync::Arc;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{AuditAction, AuditEntry, EntityType};
use crate::error::AppResult;
use crate::infrastructure::repositories::AuditRepository;

/// Appends audit entries after a write has committed.
///
/// A failed append is logged and swallowed: the caller's write already stands.
#[derive(Clone)]
pub struct AuditRecorder {
    audit_repo: Arc<dyn AuditRepository>,
}

impl AuditRecorder {
    pub fn new(audit_repo: Arc<dyn AuditRepository>) -> Self {
        Self { audit_repo }
    }

    pub async fn record<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        action: AuditAction,
        actor_id: Uuid,
        before: Option<&T>,
        after: Option<&T>,
    ) {
        let entry = AuditEntry::new(entity_type, entity_id, action, actor_id, before, after);
        if let Err(err) = self.audit_repo.append(&entry).await {
            warn!(
                error = %err,
                entity_type = %entity_type,
                entity_id = %entity_id,
                action = %action,
                "failed to append audit entry"
            );
        }
    }

    pub async fn created<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        actor_id: Uuid,
        after: &T,
    ) {
        self.record(entity_type, entity_id, AuditAction::Create, actor_id, None, Some(after))
            .await;
    }

    pub async fn updated<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        actor_id: Uuid,
        before: &T,
        after: &T,
    ) {
        self.record(
            entity_type,
            entity_id,
            AuditAction::Update,
            actor_id,
            Some(before),
            Some(after),
        )
        .await;
    }

    pub async fn deleted<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        actor_id: Uuid,
        before: &T,
    ) {
        self.record(entity_type, entity_id, AuditAction::Delete, actor_id, Some(before), None)
            .await;
    }

    pub async fn history(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> AppResult<Vec<AuditEntry>> {
        self.audit_repo.list_for(entity_type, entity_id).await
    }
}
