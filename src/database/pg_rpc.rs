use async_trait::async_trait;
use sqlx::PgPool;

use super::store::StoreError;
use crate::services::analytics::{
    AnalyticsRpc, OrganizationAnalytics, PermissionSummary, RevenuePoint, RoleSummary, UserActivity,
};

/// Dashboard procedures implemented as SQL functions on the remote backend
pub struct PgAnalytics {
    pool: PgPool,
}

impl PgAnalytics {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRpc for PgAnalytics {
    async fn get_user_activity(&self) -> Result<Vec<UserActivity>, StoreError> {
        let rows = sqlx::query_as::<_, UserActivity>("SELECT * FROM get_user_activity()")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_organization_analytics(&self) -> Result<Vec<OrganizationAnalytics>, StoreError> {
        let rows = sqlx::query_as::<_, OrganizationAnalytics>("SELECT * FROM get_organization_analytics()")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_platform_revenue(&self) -> Result<Vec<RevenuePoint>, StoreError> {
        let rows = sqlx::query_as::<_, RevenuePoint>("SELECT * FROM get_platform_revenue() ORDER BY month")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, StoreError> {
        let rows = sqlx::query_as::<_, RoleSummary>(
            "SELECT r.name AS role, r.description, COUNT(p.id) AS user_count
             FROM roles r
             LEFT JOIN profiles p ON p.data->>'role' = r.name
             GROUP BY r.name, r.description
             ORDER BY r.name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_permissions(&self) -> Result<Vec<PermissionSummary>, StoreError> {
        let rows = sqlx::query_as::<_, PermissionSummary>(
            "SELECT p.name, p.description,
                    COALESCE(array_agg(rp.role ORDER BY rp.role) FILTER (WHERE rp.role IS NOT NULL), '{}') AS roles
             FROM permissions p
             LEFT JOIN role_permissions rp ON rp.permission_id = p.id
             GROUP BY p.name, p.description
             ORDER BY p.name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
