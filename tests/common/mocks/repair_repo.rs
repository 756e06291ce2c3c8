use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use it_assets::application::repair_lifecycle::{allocate_number, repair_number_prefix};
use it_assets::domain::{ListScope, RepairRecord};
use it_assets::error::{AppError, AppResult};
use it_assets::infrastructure::repositories::{
    NestedCount, RepairFilter, RepairGrouping, RepairRepository,
};
use uuid::Uuid;

use super::asset_repo::MockAssetRepo;

/// The records mutex plays the part of the per-day advisory lock.
pub struct MockRepairRepo {
    pub records: Mutex<Vec<RepairRecord>>,
    assets: Arc<MockAssetRepo>,
}

impl MockRepairRepo {
    pub fn new(assets: Arc<MockAssetRepo>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            assets,
        }
    }

    pub fn push(&self, record: RepairRecord) {
        self.records
            .lock()
            .expect("records mutex poisoned")
            .push(record);
    }

    pub fn numbers(&self) -> Vec<String> {
        self.records
            .lock()
            .expect("records mutex poisoned")
            .iter()
            .map(|record| record.repair_number.clone())
            .collect()
    }

    fn matching(&self, scope: &ListScope, filter: &RepairFilter) -> Vec<RepairRecord> {
        self.records
            .lock()
            .expect("records mutex poisoned")
            .iter()
            .filter(|record| scope.permits(record.department_id))
            .filter(|record| filter.asset_id.map_or(true, |id| record.asset_id == id))
            .filter(|record| {
                filter
                    .repair_status
                    .map_or(true, |status| record.repair_status == status)
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RepairRepository for MockRepairRepo {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RepairRecord>> {
        Ok(self
            .records
            .lock()
            .expect("records mutex poisoned")
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn list(
        &self,
        scope: &ListScope,
        filter: &RepairFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<RepairRecord>> {
        Ok(self
            .matching(scope, filter)
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, scope: &ListScope, filter: &RepairFilter) -> AppResult<i64> {
        Ok(self.matching(scope, filter).len() as i64)
    }

    async fn list_after(
        &self,
        scope: &ListScope,
        after: Option<&str>,
        limit: i64,
    ) -> AppResult<Vec<RepairRecord>> {
        let mut records = self.matching(scope, &RepairFilter::default());
        records.sort_by(|a, b| a.repair_number.cmp(&b.repair_number));
        Ok(records
            .into_iter()
            .filter(|record| after.map_or(true, |number| record.repair_number.as_str() > number))
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn create_with_number(
        &self,
        record: &RepairRecord,
        business_date: NaiveDate,
        _max_attempts: u32,
    ) -> AppResult<RepairRecord> {
        let mut records = self.records.lock().expect("records mutex poisoned");
        let prefix = repair_number_prefix(business_date);
        let last = records
            .iter()
            .filter(|existing| existing.repair_number.starts_with(&prefix))
            .map(|existing| existing.repair_number.clone())
            .max();

        let mut created = record.clone();
        created.repair_number = allocate_number(business_date, last.as_deref())?;
        self.assets.increment_repair_count(created.asset_id)?;
        records.push(created.clone());
        Ok(created)
    }

    async fn update(&self, record: &RepairRecord) -> AppResult<RepairRecord> {
        let mut rows = self.records.lock().expect("records mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == record.id)
            .ok_or_else(|| AppError::NotFound("repair record not found".to_string()))?;
        let repair_number = row.repair_number.clone();
        *row = record.clone();
        row.repair_number = repair_number;
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.records
            .lock()
            .expect("records mutex poisoned")
            .retain(|row| row.id != id);
        Ok(())
    }

    async fn count_by_part_type(
        &self,
        _scope: &ListScope,
        _grouping: RepairGrouping,
    ) -> AppResult<Vec<NestedCount>> {
        Ok(Vec::new())
    }
}
