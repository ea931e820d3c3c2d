use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{Entity, ValidationError};

/// Failure reported by a remote or local store.
///
/// Store calls never panic or throw past this type; every caller checks it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("Invalid record: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Remote request failed: {0}")]
    Remote(String),

    #[error("Local storage error: {0}")]
    Local(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found<E: Entity>(id: Uuid) -> Self {
        StoreError::NotFound(format!("{} {}", E::LABEL, id))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Remote(err.to_string())
    }
}

impl From<super::manager::DatabaseError> for StoreError {
    fn from(err: super::manager::DatabaseError) -> Self {
        StoreError::Remote(err.to_string())
    }
}

/// Whole-record CRUD over one collection of entities
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// All records, oldest first
    async fn list(&self) -> Result<Vec<E>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<E>, StoreError>;

    async fn insert(&self, record: E) -> Result<E, StoreError>;

    async fn update(&self, record: E) -> Result<E, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    async fn get_404(&self, id: Uuid) -> Result<E, StoreError> {
        self.get(id).await?.ok_or_else(|| StoreError::not_found::<E>(id))
    }
}

/// Persistence boundary: rejects records that fail the shared schema before
/// they reach the wrapped store, whichever path produced them.
pub struct ValidatedStore<E: Entity> {
    inner: Arc<dyn EntityStore<E>>,
    _phantom: PhantomData<E>,
}

impl<E: Entity> ValidatedStore<E> {
    pub fn new(inner: Arc<dyn EntityStore<E>>) -> Self {
        Self { inner, _phantom: PhantomData }
    }

    pub fn shared(inner: Arc<dyn EntityStore<E>>) -> Arc<dyn EntityStore<E>> {
        Arc::new(Self::new(inner))
    }

    fn check(record: &E) -> Result<(), StoreError> {
        record.validate().map_err(|e| {
            tracing::warn!("Rejected {} {} at persistence boundary: {}", E::LABEL, record.id(), e);
            StoreError::Invalid(e)
        })
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for ValidatedStore<E> {
    async fn list(&self) -> Result<Vec<E>, StoreError> {
        self.inner.list().await
    }

    async fn get(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        self.inner.get(id).await
    }

    async fn insert(&self, record: E) -> Result<E, StoreError> {
        Self::check(&record)?;
        self.inner.insert(record).await
    }

    async fn update(&self, record: E) -> Result<E, StoreError> {
        Self::check(&record)?;
        self.inner.update(record).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }
}
