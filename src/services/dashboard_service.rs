use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use super::analytics::{AnalyticsRpc, OrganizationAnalytics, PermissionSummary, RevenuePoint, RoleSummary, UserActivity};
use crate::access::RecordScope;
use crate::config::ViewConfig;
use crate::database::store::{EntityStore, StoreError};
use crate::entities::{Evidence, Organization, OrganizationStatus, Reminder, Task, TaskStatus};
use crate::filter::{agenda, AgendaItem};

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub overdue: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerDashboard {
    pub total_tasks: usize,
    pub task_counts: StatusCounts,
    /// Percentage of tasks completed; 0 when there are no tasks
    pub completion_rate: f64,
    pub overdue: usize,
    pub upcoming: Vec<AgendaItem>,
    pub evidence_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub organizations: Vec<OrganizationAnalytics>,
    pub user_activity: Vec<UserActivity>,
    pub total_users: usize,
    pub overdue_tasks: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformDashboard {
    pub revenue: Vec<RevenuePoint>,
    pub total_revenue: Decimal,
    pub active_organizations: usize,
    pub roles: Vec<RoleSummary>,
    pub permissions: Vec<PermissionSummary>,
}

pub struct DashboardService {
    tasks: Arc<dyn EntityStore<Task>>,
    reminders: Arc<dyn EntityStore<Reminder>>,
    evidence: Arc<dyn EntityStore<Evidence>>,
    organizations: Arc<dyn EntityStore<Organization>>,
    analytics: Arc<dyn AnalyticsRpc>,
    views: ViewConfig,
}

impl DashboardService {
    pub fn new(
        tasks: Arc<dyn EntityStore<Task>>,
        reminders: Arc<dyn EntityStore<Reminder>>,
        evidence: Arc<dyn EntityStore<Evidence>>,
        organizations: Arc<dyn EntityStore<Organization>>,
        analytics: Arc<dyn AnalyticsRpc>,
        views: ViewConfig,
    ) -> Self {
        Self { tasks, reminders, evidence, organizations, analytics, views }
    }

    /// Summary of the records visible to `scope`
    pub async fn customer(&self, scope: RecordScope, today: NaiveDate) -> Result<CustomerDashboard, StoreError> {
        let tasks = scope.store(self.tasks.clone());
        let reminders = scope.store(self.reminders.clone());
        let evidence = scope.store(self.evidence.clone());
        let (tasks, reminders, evidence) = futures::try_join!(tasks.list(), reminders.list(), evidence.list())?;

        let mut counts = StatusCounts::default();
        for task in &tasks {
            match task.effective_status(today) {
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Overdue => counts.overdue += 1,
            }
        }

        let completion_rate = if tasks.is_empty() {
            0.0
        } else {
            counts.completed as f64 * 100.0 / tasks.len() as f64
        };

        let mut upcoming = agenda(&tasks, &reminders, today, self.views.agenda_window_days);
        upcoming.truncate(self.views.dashboard_agenda_items);

        Ok(CustomerDashboard {
            total_tasks: tasks.len(),
            overdue: counts.overdue,
            task_counts: counts,
            completion_rate,
            upcoming,
            evidence_count: evidence.len(),
        })
    }

    pub async fn admin(&self) -> Result<AdminDashboard, StoreError> {
        let (organizations, user_activity) = futures::try_join!(
            self.analytics.get_organization_analytics(),
            self.analytics.get_user_activity()
        )?;

        Ok(AdminDashboard {
            overdue_tasks: organizations.iter().map(|o| o.overdue_tasks).sum(),
            total_users: user_activity.len(),
            organizations,
            user_activity,
        })
    }

    pub async fn platform(&self) -> Result<PlatformDashboard, StoreError> {
        let (revenue, roles, permissions, organizations) = futures::try_join!(
            self.analytics.get_platform_revenue(),
            self.analytics.list_roles(),
            self.analytics.list_permissions(),
            self.organizations.list()
        )?;

        Ok(PlatformDashboard {
            total_revenue: revenue.iter().map(|p| p.amount).sum(),
            active_organizations: organizations
                .iter()
                .filter(|o| o.status == OrganizationStatus::Active)
                .count(),
            revenue,
            roles,
            permissions,
        })
    }

    pub async fn roles(&self) -> Result<Vec<RoleSummary>, StoreError> {
        self.analytics.list_roles().await
    }

    pub async fn permissions(&self) -> Result<Vec<PermissionSummary>, StoreError> {
        self.analytics.list_permissions().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::memory::MemoryStore;
    use crate::testing::{date, owned_task, sample_task};
    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    struct FixedRpc;

    #[async_trait]
    impl AnalyticsRpc for FixedRpc {
        async fn get_user_activity(&self) -> Result<Vec<UserActivity>, StoreError> {
            Ok(vec![])
        }

        async fn get_organization_analytics(&self) -> Result<Vec<OrganizationAnalytics>, StoreError> {
            Err(StoreError::Remote("get_organization_analytics failed".into()))
        }

        async fn get_platform_revenue(&self) -> Result<Vec<RevenuePoint>, StoreError> {
            Ok(vec![
                RevenuePoint { month: date("2025-01-01"), amount: Decimal::new(125_050, 2), active_subscriptions: 3 },
                RevenuePoint { month: date("2025-02-01"), amount: Decimal::new(99_950, 2), active_subscriptions: 2 },
            ])
        }

        async fn list_roles(&self) -> Result<Vec<RoleSummary>, StoreError> {
            Ok(vec![])
        }

        async fn list_permissions(&self) -> Result<Vec<PermissionSummary>, StoreError> {
            Ok(vec![])
        }
    }

    fn service(tasks: Vec<Task>) -> DashboardService {
        DashboardService::new(
            Arc::new(MemoryStore::with_records(tasks)),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(FixedRpc),
            AppConfig::development().views,
        )
    }

    #[tokio::test]
    async fn customer_summary() {
        let owner = Uuid::new_v4();
        let mut done = owned_task("2025-01-02", owner);
        done.mark_complete(Utc::now());
        let tasks = vec![
            done,
            owned_task("2024-12-20", owner),
            owned_task("2025-01-05", owner),
            owned_task("2025-01-10", owner),
            // Someone else's
            sample_task("2025-01-03"),
        ];

        let dash = service(tasks).customer(RecordScope::new(owner, None), date("2025-01-01")).await.unwrap();
        assert_eq!(dash.total_tasks, 4);
        assert_eq!(dash.overdue, 1);
        assert_eq!(dash.task_counts.pending, 2);
        assert_eq!(dash.completion_rate, 25.0);
        assert_eq!(dash.upcoming.len(), 2);
    }

    #[tokio::test]
    async fn empty_workspace_has_zero_completion() {
        let scope = RecordScope::new(Uuid::new_v4(), None);
        let dash = service(vec![sample_task("2025-01-02")]).customer(scope, date("2025-01-01")).await.unwrap();
        assert_eq!(dash.total_tasks, 0);
        assert_eq!(dash.completion_rate, 0.0);
    }

    #[tokio::test]
    async fn revenue_totals_are_exact() {
        let dash = service(vec![]).platform().await.unwrap();
        assert_eq!(dash.total_revenue, Decimal::new(225_000, 2));
    }

    #[tokio::test]
    async fn failed_procedure_fails_the_dashboard() {
        assert!(matches!(service(vec![]).admin().await, Err(StoreError::Remote(_))));
    }
}
