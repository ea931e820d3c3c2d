use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{EntityStore, StoreError};
use crate::entities::Entity;

/// In-process entity store preserving insertion order.
///
/// Backs tests and local development when no database is configured.
pub struct MemoryStore<E> {
    records: RwLock<Vec<E>>,
}

impl<E: Entity> MemoryStore<E> {
    pub fn new() -> Self {
        Self { records: RwLock::new(Vec::new()) }
    }

    pub fn with_records(records: Vec<E>) -> Self {
        Self { records: RwLock::new(records) }
    }
}

impl<E: Entity> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryStore<E> {
    async fn list(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        Ok(self.records.read().await.iter().find(|r| r.id() == id).cloned())
    }

    async fn insert(&self, record: E) -> Result<E, StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::Conflict(format!("{} {}", E::LABEL, record.id())));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: E) -> Result<E, StoreError> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| StoreError::not_found::<E>(record.id()))?;
        *slot = record.clone();
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(StoreError::not_found::<E>(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_task;

    #[tokio::test]
    async fn crud_cycle() {
        let store = MemoryStore::new();
        let mut task = sample_task("2025-03-01");

        store.insert(task.clone()).await.unwrap();
        assert!(matches!(store.insert(task.clone()).await, Err(StoreError::Conflict(_))));

        task.title = "Updated".into();
        store.update(task.clone()).await.unwrap();
        assert_eq!(store.get(task.id).await.unwrap().unwrap().title, "Updated");

        store.delete(task.id).await.unwrap();
        assert!(matches!(store.delete(task.id).await, Err(StoreError::NotFound(_))));
        assert!(store.list().await.unwrap().is_empty());
    }
}
