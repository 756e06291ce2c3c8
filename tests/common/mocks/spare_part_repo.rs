use std::sync::Mutex;

use async_trait::async_trait;
use it_assets::domain::{SparePart, SparePartType};
use it_assets::error::{AppError, AppResult};
use it_assets::infrastructure::repositories::{SparePartRepository, SparePartTypeRepository};
use uuid::Uuid;

#[derive(Default)]
pub struct MockSparePartTypeRepo {
    pub types: Mutex<Vec<SparePartType>>,
}

#[async_trait]
impl SparePartTypeRepository for MockSparePartTypeRepo {
    async fn list(&self) -> AppResult<Vec<SparePartType>> {
        Ok(self.types.lock().expect("types mutex poisoned").clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SparePartType>> {
        Ok(self
            .types
            .lock()
            .expect("types mutex poisoned")
            .iter()
            .find(|part_type| part_type.id == id)
            .cloned())
    }

    async fn create(&self, part_type: &SparePartType) -> AppResult<SparePartType> {
        self.types
            .lock()
            .expect("types mutex poisoned")
            .push(part_type.clone());
        Ok(part_type.clone())
    }

    async fn update(&self, part_type: &SparePartType) -> AppResult<SparePartType> {
        let mut rows = self.types.lock().expect("types mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == part_type.id)
            .ok_or_else(|| AppError::NotFound("spare part type not found".to_string()))?;
        *row = part_type.clone();
        Ok(part_type.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.types
            .lock()
            .expect("types mutex poisoned")
            .retain(|row| row.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockSparePartRepo {
    pub parts: Mutex<Vec<SparePart>>,
}

impl MockSparePartRepo {
    pub fn push(&self, part: SparePart) {
        self.parts.lock().expect("parts mutex poisoned").push(part);
    }
}

#[async_trait]
impl SparePartRepository for MockSparePartRepo {
    async fn list(&self, part_type_id: Option<Uuid>) -> AppResult<Vec<SparePart>> {
        Ok(self
            .parts
            .lock()
            .expect("parts mutex poisoned")
            .iter()
            .filter(|part| part_type_id.map_or(true, |type_id| part.part_type_id == type_id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SparePart>> {
        Ok(self
            .parts
            .lock()
            .expect("parts mutex poisoned")
            .iter()
            .find(|part| part.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<SparePart>> {
        Ok(self
            .parts
            .lock()
            .expect("parts mutex poisoned")
            .iter()
            .filter(|part| ids.contains(&part.id))
            .cloned()
            .collect())
    }

    async fn create(&self, part: &SparePart) -> AppResult<SparePart> {
        self.push(part.clone());
        Ok(part.clone())
    }

    async fn update(&self, part: &SparePart) -> AppResult<SparePart> {
        let mut rows = self.parts.lock().expect("parts mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == part.id)
            .ok_or_else(|| AppError::NotFound("spare part not found".to_string()))?;
        *row = part.clone();
        Ok(part.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.parts
            .lock()
            .expect("parts mutex poisoned")
            .retain(|row| row.id != id);
        Ok(())
    }
}
