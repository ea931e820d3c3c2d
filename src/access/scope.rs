use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::store::{EntityStore, StoreError};
use crate::entities::Owned;

/// Rows a signed-in caller may see: their own, plus their organization's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordScope {
    pub user_id: Uuid,
    pub organization_id: Option<Uuid>,
}

impl RecordScope {
    pub fn new(user_id: Uuid, organization_id: Option<Uuid>) -> Self {
        Self { user_id, organization_id }
    }

    pub fn permits<E: Owned>(&self, record: &E) -> bool {
        if record.owner_id() == self.user_id {
            return true;
        }
        matches!(
            (self.organization_id, record.organization_id()),
            (Some(mine), Some(theirs)) if mine == theirs
        )
    }

    pub fn restrict<E: Owned>(&self, records: Vec<E>) -> Vec<E> {
        records.into_iter().filter(|r| self.permits(r)).collect()
    }

    /// Store view limited to this scope
    pub fn store<E: Owned>(&self, inner: Arc<dyn EntityStore<E>>) -> ScopedStore<E> {
        ScopedStore { scope: *self, inner }
    }
}

/// Row-level secured view of an entity store.
///
/// Records outside the scope read as missing, so callers answer 404 rather
/// than revealing that the id exists. Inserts are stamped with the caller as
/// owner; updates keep the stored owner whatever the new record says.
pub struct ScopedStore<E> {
    scope: RecordScope,
    inner: Arc<dyn EntityStore<E>>,
}

impl<E: Owned> ScopedStore<E> {
    async fn visible(&self, id: Uuid) -> Result<E, StoreError> {
        self.get(id).await?.ok_or_else(|| StoreError::not_found::<E>(id))
    }
}

#[async_trait]
impl<E: Owned> EntityStore<E> for ScopedStore<E> {
    async fn list(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.scope.restrict(self.inner.list().await?))
    }

    async fn get(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        Ok(self.inner.get(id).await?.filter(|r| self.scope.permits(r)))
    }

    async fn insert(&self, mut record: E) -> Result<E, StoreError> {
        record.assign(self.scope.user_id, self.scope.organization_id);
        self.inner.insert(record).await
    }

    async fn update(&self, mut record: E) -> Result<E, StoreError> {
        let existing = self.visible(record.id()).await?;
        record.assign(existing.owner_id(), existing.organization_id());
        self.inner.update(record).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.visible(id).await?;
        self.inner.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::entities::Task;
    use crate::testing::sample_task;

    fn owned_by(owner: Uuid, org: Option<Uuid>) -> Task {
        let mut task = sample_task("2025-01-05");
        task.assign(owner, org);
        task
    }

    #[tokio::test]
    async fn other_owners_records_read_as_missing() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let task = owned_by(alice, None);
        let inner: Arc<dyn EntityStore<Task>> = Arc::new(MemoryStore::with_records(vec![task.clone()]));

        let as_bob = RecordScope::new(bob, None).store(inner.clone());
        assert!(as_bob.list().await.unwrap().is_empty());
        assert!(as_bob.get(task.id).await.unwrap().is_none());
        assert!(matches!(as_bob.update(task.clone()).await, Err(StoreError::NotFound(_))));
        assert!(matches!(as_bob.delete(task.id).await, Err(StoreError::NotFound(_))));

        let as_alice = RecordScope::new(alice, None).store(inner.clone());
        assert_eq!(as_alice.list().await.unwrap().len(), 1);
        assert_eq!(inner.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn organization_members_share_records() {
        let org = Some(Uuid::new_v4());
        let inner: Arc<dyn EntityStore<Task>> =
            Arc::new(MemoryStore::with_records(vec![owned_by(Uuid::new_v4(), org)]));

        assert_eq!(RecordScope::new(Uuid::new_v4(), org).store(inner.clone()).list().await.unwrap().len(), 1);
        assert!(RecordScope::new(Uuid::new_v4(), Some(Uuid::new_v4()))
            .store(inner.clone())
            .list()
            .await
            .unwrap()
            .is_empty());
        // No organization on either side never matches
        assert!(RecordScope::new(Uuid::new_v4(), None).store(inner).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inserts_are_stamped_and_updates_keep_the_owner() {
        let (alice, org) = (Uuid::new_v4(), Some(Uuid::new_v4()));
        let store = RecordScope::new(alice, org).store(Arc::new(MemoryStore::<Task>::new()));

        let saved = store.insert(owned_by(Uuid::new_v4(), None)).await.unwrap();
        assert_eq!((saved.owner_id, saved.organization_id), (alice, org));

        let mut edit = saved.clone();
        edit.assign(Uuid::new_v4(), None);
        edit.title = "Renamed".into();
        let updated = store.update(edit).await.unwrap();
        assert_eq!((updated.owner_id, updated.organization_id), (alice, org));
        assert_eq!(updated.title, "Renamed");
    }
}
