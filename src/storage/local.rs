use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::database::store::{EntityStore, StoreError};
use crate::entities::Entity;

#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored collection '{key}' is unreadable: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode collection '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<LocalStoreError> for StoreError {
    fn from(err: LocalStoreError) -> Self {
        StoreError::Local(err.to_string())
    }
}

/// Device-local key/value persistence.
///
/// Each key holds one whole collection serialized as a JSON array. There are no
/// partial updates: every mutation reads the collection, changes it in memory
/// and writes it back while holding the store lock.
pub struct LocalStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), lock: Mutex::new(()) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Whole collection for `key`; a key never written reads as empty
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, LocalStoreError> {
        let _guard = self.lock.lock().await;
        self.read_unlocked(key).await
    }

    /// Replace the whole collection for `key`
    pub async fn save<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), LocalStoreError> {
        let _guard = self.lock.lock().await;
        self.write_unlocked(key, records).await
    }

    /// Read-modify-write of one collection under the store lock.
    /// Nothing is written when `f` fails.
    pub async fn mutate<T, R, F>(&self, key: &str, f: F) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce(&mut Vec<T>) -> Result<R, StoreError> + Send,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.read_unlocked(key).await?;
        let out = f(&mut records)?;
        self.write_unlocked(key, &records).await?;
        Ok(out)
    }

    async fn read_unlocked<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, LocalStoreError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(LocalStoreError::Io { path, source }),
        };
        serde_json::from_slice(&bytes).map_err(|source| LocalStoreError::Corrupt { key: key.to_string(), source })
    }

    async fn write_unlocked<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), LocalStoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| LocalStoreError::Io { path: self.dir.clone(), source })?;

        let body = serde_json::to_vec_pretty(records)
            .map_err(|source| LocalStoreError::Encode { key: key.to_string(), source })?;

        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, body)
            .await
            .map_err(|source| LocalStoreError::Io { path: staging.clone(), source })?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|source| LocalStoreError::Io { path: path.clone(), source })?;

        tracing::debug!("Wrote {} record(s) to local collection '{}'", records.len(), key);
        Ok(())
    }
}

/// Entity store backed by one local collection keyed by `E::COLLECTION`
pub struct LocalEntityStore<E> {
    store: Arc<LocalStore>,
    _phantom: PhantomData<E>,
}

impl<E: Entity> LocalEntityStore<E> {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store, _phantom: PhantomData }
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for LocalEntityStore<E> {
    async fn list(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.store.load(E::COLLECTION).await?)
    }

    async fn get(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        let records: Vec<E> = self.store.load(E::COLLECTION).await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    async fn insert(&self, record: E) -> Result<E, StoreError> {
        self.store
            .mutate(E::COLLECTION, move |records: &mut Vec<E>| {
                if records.iter().any(|r| r.id() == record.id()) {
                    return Err(StoreError::Conflict(format!("{} {}", E::LABEL, record.id())));
                }
                records.push(record.clone());
                Ok(record)
            })
            .await
    }

    async fn update(&self, record: E) -> Result<E, StoreError> {
        self.store
            .mutate(E::COLLECTION, move |records: &mut Vec<E>| {
                let slot = records
                    .iter_mut()
                    .find(|r| r.id() == record.id())
                    .ok_or_else(|| StoreError::not_found::<E>(record.id()))?;
                *slot = record.clone();
                Ok(record)
            })
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.store
            .mutate(E::COLLECTION, move |records: &mut Vec<E>| {
                let before = records.len();
                records.retain(|r| r.id() != id);
                if records.len() == before {
                    return Err(StoreError::not_found::<E>(id));
                }
                Ok(())
            })
            .await
    }
}
