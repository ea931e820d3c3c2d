//! Fakes and fixtures shared by unit tests

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::access::{PermissionStore, ProfileStore, Role};
use crate::database::store::{EntityStore, StoreError};
use crate::entities::{Entity, Priority, Task, TaskCategory, TaskStatus};

/// Profile store answering from a fixed map and counting lookups
#[derive(Default)]
pub struct StaticProfiles {
    roles: Mutex<HashMap<Uuid, String>>,
    lookups: AtomicUsize,
}

impl StaticProfiles {
    pub fn with(user_id: Uuid, role: &str) -> Self {
        let profiles = Self::default();
        profiles.set(user_id, role);
        profiles
    }

    pub fn set(&self, user_id: Uuid, role: &str) {
        self.roles.lock().unwrap().insert(user_id, role.to_string());
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStore for StaticProfiles {
    async fn fetch_role(&self, user_id: Uuid) -> Result<Option<String>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.roles.lock().unwrap().get(&user_id).cloned())
    }
}

#[derive(Default)]
pub struct FailingProfiles;

#[async_trait]
impl ProfileStore for FailingProfiles {
    async fn fetch_role(&self, _user_id: Uuid) -> Result<Option<String>, StoreError> {
        Err(StoreError::Remote("profiles unavailable".into()))
    }
}

pub struct FailingPermissions;

#[async_trait]
impl PermissionStore for FailingPermissions {
    async fn role_has_permission(&self, _role: Role, _permission: &str) -> Result<bool, StoreError> {
        Err(StoreError::Remote("role_permissions unavailable".into()))
    }
}

/// Entity store whose every call fails, counting attempted writes
pub struct FailingStore<E> {
    pub writes: AtomicUsize,
    _phantom: PhantomData<E>,
}

impl<E> Default for FailingStore<E> {
    fn default() -> Self {
        Self { writes: AtomicUsize::new(0), _phantom: PhantomData }
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for FailingStore<E> {
    async fn list(&self) -> Result<Vec<E>, StoreError> {
        Err(StoreError::Remote("store unavailable".into()))
    }

    async fn get(&self, _id: Uuid) -> Result<Option<E>, StoreError> {
        Err(StoreError::Remote("store unavailable".into()))
    }

    async fn insert(&self, _record: E) -> Result<E, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Remote("store unavailable".into()))
    }

    async fn update(&self, _record: E) -> Result<E, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Remote("store unavailable".into()))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Remote("store unavailable".into()))
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn sample_task(due: &str) -> Task {
    Task {
        id: Uuid::new_v4(),
        title: format!("Task due {}", due),
        description: String::new(),
        category: TaskCategory::FoodSafety,
        priority: Priority::Medium,
        status: TaskStatus::Pending,
        due_date: date(due),
        owner_id: Uuid::nil(),
        organization_id: None,
        assigned_to: None,
        created_at: Utc::now(),
        completed_at: None,
    }
}

pub fn owned_task(due: &str, owner: Uuid) -> Task {
    let mut task = sample_task(due);
    task.owner_id = owner;
    task
}
