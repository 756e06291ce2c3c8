use std::sync::Mutex;

use async_trait::async_trait;
use it_assets::domain::{AuditEntry, EntityType};
use it_assets::error::AppResult;
use it_assets::infrastructure::repositories::AuditRepository;
use uuid::Uuid;

#[derive(Default)]
pub struct MockAuditRepo {
    pub entries: Mutex<Vec<AuditEntry>>,
}

impl MockAuditRepo {
    pub fn len(&self) -> usize {
        self.entries.lock().expect("audit mutex poisoned").len()
    }
}

#[async_trait]
impl AuditRepository for MockAuditRepo {
    async fn append(&self, entry: &AuditEntry) -> AppResult<()> {
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(entry.clone());
        Ok(())
    }

    async fn list_for(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> AppResult<Vec<AuditEntry>> {
        Ok(self
            .entries
            .lock()
            .expect("audit mutex poisoned")
            .iter()
            .filter(|entry| entry.entity_type == entity_type && entry.entity_id == entity_id)
            .cloned()
            .collect())
    }
}
