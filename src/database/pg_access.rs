use async_trait::async_trait;
use sqlx::PgPool;

use super::store::StoreError;
use crate::access::{PermissionStore, Role};

/// Role-to-permission mapping read from the `role_permissions` table
pub struct PgPermissionStore {
    pool: PgPool,
}

impl PgPermissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PgPermissionStore {
    async fn role_has_permission(&self, role: Role, permission: &str) -> Result<bool, StoreError> {
        let (granted,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1
                FROM role_permissions rp
                JOIN permissions p ON p.id = rp.permission_id
                WHERE rp.role = $1 AND p.name = $2
            )",
        )
        .bind(role.as_str())
        .bind(permission)
        .fetch_one(&self.pool)
        .await?;

        Ok(granted)
    }
}
