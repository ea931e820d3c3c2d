use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::access::{permissions, PermissionStore, Role};
use crate::database::store::{EntityStore, StoreError};
use crate::entities::{Evidence, Organization, Task, UserProfile};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserActivity {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    pub tasks_completed: i64,
    pub evidence_uploaded: i64,
    pub last_active: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrganizationAnalytics {
    pub organization_id: Uuid,
    pub name: String,
    pub status: String,
    pub user_count: i64,
    pub task_count: i64,
    pub completed_tasks: i64,
    pub overdue_tasks: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RevenuePoint {
    pub month: NaiveDate,
    pub amount: Decimal,
    pub active_subscriptions: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoleSummary {
    pub role: String,
    pub description: Option<String>,
    pub user_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PermissionSummary {
    pub name: String,
    pub description: Option<String>,
    pub roles: Vec<String>,
}

/// Named remote procedures backing the dashboards
#[async_trait]
pub trait AnalyticsRpc: Send + Sync {
    async fn get_user_activity(&self) -> Result<Vec<UserActivity>, StoreError>;

    async fn get_organization_analytics(&self) -> Result<Vec<OrganizationAnalytics>, StoreError>;

    async fn get_platform_revenue(&self) -> Result<Vec<RevenuePoint>, StoreError>;

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, StoreError>;

    async fn list_permissions(&self) -> Result<Vec<PermissionSummary>, StoreError>;
}

/// Procedures computed from the entity stores, used when no database is configured.
pub struct StoreAnalytics {
    profiles: Arc<dyn EntityStore<UserProfile>>,
    organizations: Arc<dyn EntityStore<Organization>>,
    tasks: Arc<dyn EntityStore<Task>>,
    evidence: Arc<dyn EntityStore<Evidence>>,
    permissions: Arc<dyn PermissionStore>,
}

impl StoreAnalytics {
    pub fn new(
        profiles: Arc<dyn EntityStore<UserProfile>>,
        organizations: Arc<dyn EntityStore<Organization>>,
        tasks: Arc<dyn EntityStore<Task>>,
        evidence: Arc<dyn EntityStore<Evidence>>,
        permissions: Arc<dyn PermissionStore>,
    ) -> Self {
        Self { profiles, organizations, tasks, evidence, permissions }
    }
}

fn role_description(role: Role) -> &'static str {
    match role {
        Role::PlatformAdmin => "Operates the platform across all organizations",
        Role::Admin => "Administers an organization and its users",
        Role::Manager => "Oversees compliance work for a site",
        Role::User => "Completes assigned compliance tasks",
        Role::Customer => "Subscribing business account",
    }
}

#[async_trait]
impl AnalyticsRpc for StoreAnalytics {
    async fn get_user_activity(&self) -> Result<Vec<UserActivity>, StoreError> {
        let (profiles, tasks, evidence) =
            futures::try_join!(self.profiles.list(), self.tasks.list(), self.evidence.list())?;

        let activity = profiles
            .into_iter()
            .map(|profile| {
                let assigned: Vec<&Task> = tasks.iter().filter(|t| t.assigned_to == Some(profile.id)).collect();
                let completed: Vec<&&Task> = assigned.iter().filter(|t| t.is_completed()).collect();
                let evidence_uploaded = evidence
                    .iter()
                    .filter(|e| e.task_id.map_or(false, |id| assigned.iter().any(|t| t.id == id)))
                    .count();

                UserActivity {
                    user_id: profile.id,
                    email: profile.email,
                    role: profile.role.as_str().to_string(),
                    tasks_completed: completed.len() as i64,
                    evidence_uploaded: evidence_uploaded as i64,
                    last_active: completed.iter().filter_map(|t| t.completed_at).max(),
                }
            })
            .collect();

        Ok(activity)
    }

    async fn get_organization_analytics(&self) -> Result<Vec<OrganizationAnalytics>, StoreError> {
        let (organizations, profiles, tasks) =
            futures::try_join!(self.organizations.list(), self.profiles.list(), self.tasks.list())?;
        let today = Utc::now().date_naive();

        let analytics = organizations
            .into_iter()
            .map(|org| {
                let org_tasks: Vec<&Task> = tasks.iter().filter(|t| t.organization_id == Some(org.id)).collect();
                OrganizationAnalytics {
                    organization_id: org.id,
                    status: org.status.as_str().to_string(),
                    name: org.name,
                    user_count: profiles.iter().filter(|p| p.organization_id == Some(org.id)).count() as i64,
                    task_count: org_tasks.len() as i64,
                    completed_tasks: org_tasks.iter().filter(|t| t.is_completed()).count() as i64,
                    overdue_tasks: org_tasks.iter().filter(|t| t.is_overdue(today)).count() as i64,
                }
            })
            .collect();

        Ok(analytics)
    }

    async fn get_platform_revenue(&self) -> Result<Vec<RevenuePoint>, StoreError> {
        // billing lives only in the remote backend
        Ok(Vec::new())
    }

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, StoreError> {
        let profiles = self.profiles.list().await?;
        Ok(Role::ALL
            .iter()
            .map(|role| RoleSummary {
                role: role.as_str().to_string(),
                description: Some(role_description(*role).to_string()),
                user_count: profiles.iter().filter(|p| p.role == *role).count() as i64,
            })
            .collect())
    }

    async fn list_permissions(&self) -> Result<Vec<PermissionSummary>, StoreError> {
        let mut catalog = Vec::with_capacity(permissions::ALL.len());
        for name in permissions::ALL {
            let mut roles = Vec::new();
            for role in Role::ALL {
                if self.permissions.role_has_permission(role, name).await? {
                    roles.push(role.as_str().to_string());
                }
            }
            catalog.push(PermissionSummary { name: name.to_string(), description: None, roles });
        }
        Ok(catalog)
    }
}
