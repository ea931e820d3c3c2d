use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use std::marker::PhantomData;
use uuid::Uuid;

use super::manager::DatabaseManager;
use super::store::{EntityStore, StoreError};
use crate::entities::Entity;

/// Entity store over a Postgres table of JSONB documents:
/// `(id uuid primary key, data jsonb not null, created_at timestamptz not null)`.
///
/// Row-level security is enforced by the backend, not here.
pub struct PgEntityStore<E> {
    pool: PgPool,
    table: String,
    _phantom: PhantomData<E>,
}

impl<E: Entity> PgEntityStore<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table: DatabaseManager::quote_identifier(E::COLLECTION),
            _phantom: PhantomData,
        }
    }

    /// Create the backing table if it does not exist yet
    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id uuid PRIMARY KEY,
                data jsonb NOT NULL,
                created_at timestamptz NOT NULL
            )",
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for PgEntityStore<E> {
    async fn list(&self) -> Result<Vec<E>, StoreError> {
        let sql = format!("SELECT data FROM {} ORDER BY created_at, id", self.table);
        let rows: Vec<(Json<E>,)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(Json(record),)| record).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        let sql = format!("SELECT data FROM {} WHERE id = $1", self.table);
        let row: Option<(Json<E>,)> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(|(Json(record),)| record))
    }

    async fn insert(&self, record: E) -> Result<E, StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, data, created_at) VALUES ($1, $2, $3) ON CONFLICT (id) DO NOTHING",
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(record.id())
            .bind(Json(&record))
            .bind(record.created_at())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!("{} {}", E::LABEL, record.id())));
        }
        Ok(record)
    }

    async fn update(&self, record: E) -> Result<E, StoreError> {
        let sql = format!("UPDATE {} SET data = $2 WHERE id = $1", self.table);
        let result = sqlx::query(&sql)
            .bind(record.id())
            .bind(Json(&record))
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found::<E>(record.id()));
        }
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found::<E>(id));
        }
        Ok(())
    }
}
