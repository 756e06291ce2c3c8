use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use it_assets::domain::{Asset, ListScope};
use it_assets::error::{AppError, AppResult};
use it_assets::infrastructure::repositories::{AssetFilter, AssetRepository, NestedCount};
use uuid::Uuid;

#[derive(Default)]
pub struct MockAssetRepo {
    pub assets: Mutex<Vec<Asset>>,
}

impl MockAssetRepo {
    pub fn push(&self, asset: Asset) {
        self.assets.lock().expect("assets mutex poisoned").push(asset);
    }

    pub fn get(&self, id: Uuid) -> Option<Asset> {
        self.assets
            .lock()
            .expect("assets mutex poisoned")
            .iter()
            .find(|asset| asset.id == id)
            .cloned()
    }

    pub fn increment_repair_count(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.assets.lock().expect("assets mutex poisoned");
        let asset = rows
            .iter_mut()
            .find(|asset| asset.id == id)
            .ok_or_else(|| AppError::NotFound("asset not found".to_string()))?;
        asset.repair_count += 1;
        Ok(())
    }

    fn matching(&self, scope: &ListScope, filter: &AssetFilter) -> Vec<Asset> {
        let search = filter.search.as_deref().map(str::to_lowercase);
        self.assets
            .lock()
            .expect("assets mutex poisoned")
            .iter()
            .filter(|asset| scope.permits(asset.department_id))
            .filter(|asset| filter.department_id.map_or(true, |id| asset.department_id == id))
            .filter(|asset| filter.supplier_id.map_or(true, |id| asset.supplier_id == id))
            .filter(|asset| filter.status.map_or(true, |status| asset.status == status))
            .filter(|asset| filter.is_active.map_or(true, |active| asset.is_active == active))
            .filter(|asset| {
                search.as_deref().map_or(true, |needle| {
                    asset.name.to_lowercase().contains(needle)
                        || asset.serial_number.to_lowercase().contains(needle)
                })
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AssetRepository for MockAssetRepo {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Asset>> {
        Ok(self.get(id))
    }

    async fn find_by_serial(&self, serial_number: &str) -> AppResult<Option<Asset>> {
        Ok(self
            .assets
            .lock()
            .expect("assets mutex poisoned")
            .iter()
            .find(|asset| asset.serial_number == serial_number)
            .cloned())
    }

    async fn list(
        &self,
        scope: &ListScope,
        filter: &AssetFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Asset>> {
        Ok(self
            .matching(scope, filter)
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, scope: &ListScope, filter: &AssetFilter) -> AppResult<i64> {
        Ok(self.matching(scope, filter).len() as i64)
    }

    async fn list_after(
        &self,
        scope: &ListScope,
        after: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> AppResult<Vec<Asset>> {
        let mut assets = self.matching(scope, &AssetFilter::default());
        assets.sort_by_key(|asset| (asset.created_at, asset.id));
        Ok(assets
            .into_iter()
            .filter(|asset| after.map_or(true, |key| (asset.created_at, asset.id) > key))
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn create(&self, asset: &Asset) -> AppResult<Asset> {
        if self.find_by_serial(&asset.serial_number).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "serial number {} already exists",
                asset.serial_number
            )));
        }
        self.push(asset.clone());
        Ok(asset.clone())
    }

    async fn update(&self, asset: &Asset) -> AppResult<Asset> {
        let mut rows = self.assets.lock().expect("assets mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == asset.id)
            .ok_or_else(|| AppError::NotFound("asset not found".to_string()))?;
        let repair_count = row.repair_count;
        *row = asset.clone();
        row.repair_count = repair_count;
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.assets
            .lock()
            .expect("assets mutex poisoned")
            .retain(|row| row.id != id);
        Ok(())
    }

    /// Keys departments by id; names live in another mock.
    async fn count_by_department_and_type(
        &self,
        scope: &ListScope,
    ) -> AppResult<Vec<NestedCount>> {
        let mut counts: BTreeMap<(String, String), i64> = BTreeMap::new();
        for asset in self.matching(scope, &AssetFilter::default()) {
            *counts
                .entry((
                    asset.department_id.to_string(),
                    asset.asset_type.label().to_string(),
                ))
                .or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|((outer, inner), count)| NestedCount {
                outer,
                inner: Some(inner),
                count,
            })
            .collect())
    }
}
