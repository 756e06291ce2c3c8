use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use it_assets::domain::{Actor, ManagerAssignment};
use it_assets::error::{AppError, AppResult};
use it_assets::infrastructure::repositories::{ActorRepository, ManagerAssignmentRepository};
use uuid::Uuid;

#[derive(Default)]
pub struct MockActorRepo {
    pub actors: Mutex<Vec<Actor>>,
}

impl MockActorRepo {
    pub fn push(&self, actor: Actor) {
        self.actors.lock().expect("actors mutex poisoned").push(actor);
    }
}

#[async_trait]
impl ActorRepository for MockActorRepo {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Actor>> {
        Ok(self
            .actors
            .lock()
            .expect("actors mutex poisoned")
            .iter()
            .find(|actor| actor.id == id)
            .cloned())
    }

    async fn usernames(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, String>> {
        Ok(self
            .actors
            .lock()
            .expect("actors mutex poisoned")
            .iter()
            .filter(|actor| ids.contains(&actor.id))
            .map(|actor| (actor.id, actor.username.clone()))
            .collect())
    }
}

#[derive(Default)]
pub struct MockAssignmentRepo {
    pub assignments: Mutex<Vec<ManagerAssignment>>,
}

impl MockAssignmentRepo {
    pub fn push(&self, assignment: ManagerAssignment) {
        self.assignments
            .lock()
            .expect("assignments mutex poisoned")
            .push(assignment);
    }
}

#[async_trait]
impl ManagerAssignmentRepository for MockAssignmentRepo {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<ManagerAssignment>> {
        Ok(self
            .assignments
            .lock()
            .expect("assignments mutex poisoned")
            .iter()
            .filter(|assignment| assignment.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ManagerAssignment>> {
        Ok(self
            .assignments
            .lock()
            .expect("assignments mutex poisoned")
            .iter()
            .find(|assignment| assignment.id == id)
            .cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<ManagerAssignment>> {
        let rows = self
            .assignments
            .lock()
            .expect("assignments mutex poisoned")
            .clone();
        Ok(rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn create(&self, assignment: &ManagerAssignment) -> AppResult<ManagerAssignment> {
        self.push(assignment.clone());
        Ok(assignment.clone())
    }

    async fn update(&self, assignment: &ManagerAssignment) -> AppResult<ManagerAssignment> {
        let mut rows = self.assignments.lock().expect("assignments mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == assignment.id)
            .ok_or_else(|| AppError::NotFound("manager assignment not found".to_string()))?;
        *row = assignment.clone();
        Ok(assignment.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.assignments
            .lock()
            .expect("assignments mutex poisoned")
            .retain(|row| row.id != id);
        Ok(())
    }
}
