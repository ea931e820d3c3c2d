use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use super::resolution::{DenyReason, Resolution};
use super::resolver::RoleSource;
use super::role::Role;
use super::service::AccessService;
use crate::auth::Session;
use crate::database::store::StoreError;

/// Capability names checked by the API
pub mod names {
    pub const TASKS_MANAGE: &str = "tasks.manage";
    pub const REMINDERS_MANAGE: &str = "reminders.manage";
    pub const EVIDENCE_UPLOAD: &str = "evidence.upload";
    pub const REPORTS_EXPORT: &str = "reports.export";
    pub const USERS_MANAGE: &str = "users.manage";
    pub const ORGANIZATIONS_MANAGE: &str = "organizations.manage";
    pub const ANALYTICS_VIEW: &str = "analytics.view";
    pub const PLATFORM_MANAGE: &str = "platform.manage";

    pub const ALL: [&str; 8] = [
        TASKS_MANAGE,
        REMINDERS_MANAGE,
        EVIDENCE_UPLOAD,
        REPORTS_EXPORT,
        USERS_MANAGE,
        ORGANIZATIONS_MANAGE,
        ANALYTICS_VIEW,
        PLATFORM_MANAGE,
    ];
}

/// Remote role-to-permission mapping
#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn role_has_permission(&self, role: Role, permission: &str) -> Result<bool, StoreError>;
}

/// In-process role-to-permission mapping, seeded with the default catalog
pub struct MemoryPermissions {
    grants: RwLock<HashMap<Role, HashSet<String>>>,
}

impl MemoryPermissions {
    pub fn empty() -> Self {
        Self { grants: RwLock::new(HashMap::new()) }
    }

    pub fn default_catalog() -> Self {
        use names::*;

        let everyday = [TASKS_MANAGE, REMINDERS_MANAGE, EVIDENCE_UPLOAD];
        let mut grants: HashMap<Role, HashSet<String>> = HashMap::new();
        let mut grant = |role: Role, permissions: &[&str]| {
            grants.entry(role).or_default().extend(permissions.iter().map(|p| p.to_string()));
        };

        grant(Role::PlatformAdmin, &ALL);
        grant(Role::Admin, &everyday);
        grant(Role::Admin, &[REPORTS_EXPORT, USERS_MANAGE, ORGANIZATIONS_MANAGE, ANALYTICS_VIEW]);
        grant(Role::Manager, &everyday);
        grant(Role::Manager, &[REPORTS_EXPORT, ANALYTICS_VIEW]);
        grant(Role::Customer, &everyday);
        grant(Role::Customer, &[REPORTS_EXPORT]);
        grant(Role::User, &everyday);

        Self { grants: RwLock::new(grants) }
    }

    pub async fn grant(&self, role: Role, permission: &str) {
        self.grants.write().await.entry(role).or_default().insert(permission.to_string());
    }

    pub async fn revoke(&self, role: Role, permission: &str) {
        if let Some(set) = self.grants.write().await.get_mut(&role) {
            set.remove(permission);
        }
    }
}

#[async_trait]
impl PermissionStore for MemoryPermissions {
    async fn role_has_permission(&self, role: Role, permission: &str) -> Result<bool, StoreError> {
        let grants = self.grants.read().await;
        Ok(grants.get(&role).map(|set| set.contains(permission)).unwrap_or(false))
    }
}

/// Inline check of a single named permission for the current session
pub struct PermissionGuard<'a> {
    access: &'a AccessService,
    permission: String,
}

impl<'a> PermissionGuard<'a> {
    pub fn new(access: &'a AccessService, permission: impl Into<String>) -> Self {
        Self { access, permission: permission.into() }
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    pub async fn check(&self, session: &Session) -> Resolution {
        if session.loading {
            return Resolution::Pending;
        }
        let Some(user_id) = session.user_id else {
            return Resolution::Denied(DenyReason::Unauthenticated);
        };

        let resolved = self.access.resolve_role(user_id).await;
        if resolved.source == RoleSource::Fallback {
            return Resolution::Denied(DenyReason::LookupFailed);
        }

        match self.access.permissions().role_has_permission(resolved.role, &self.permission).await {
            Ok(true) => Resolution::Granted(resolved.role),
            Ok(false) => Resolution::Denied(DenyReason::InsufficientRole { role: resolved.role }),
            Err(e) => {
                tracing::warn!("Permission lookup '{}' for role {} failed: {}", self.permission, resolved.role, e);
                Resolution::Denied(DenyReason::LookupFailed)
            }
        }
    }

    /// `children` when granted, otherwise `fallback` (nothing by default)
    pub async fn gate<T>(&self, session: &Session, children: T, fallback: Option<T>) -> Option<T> {
        match self.check(session).await {
            Resolution::Granted(_) => Some(children),
            Resolution::Pending | Resolution::Denied(_) => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::service::AccessService;
    use crate::config::AccessConfig;
    use crate::testing::{FailingPermissions, FailingProfiles, StaticProfiles};
    use std::sync::Arc;
    use uuid::Uuid;

    fn service(profiles: Arc<StaticProfiles>, permissions: Arc<dyn PermissionStore>) -> AccessService {
        AccessService::new(profiles, permissions, AccessConfig { cache_roles: false, ..AccessConfig::default() })
    }

    #[tokio::test]
    async fn grants_and_denies_by_role() {
        let staff = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let profiles = Arc::new(StaticProfiles::with(staff, "user"));
        profiles.set(owner, "customer");
        let access = service(profiles, Arc::new(MemoryPermissions::default_catalog()));

        let guard = PermissionGuard::new(&access, names::REPORTS_EXPORT);
        assert_eq!(guard.check(&Session::authenticated(owner)).await, Resolution::Granted(Role::Customer));
        assert_eq!(
            guard.check(&Session::authenticated(staff)).await,
            Resolution::Denied(DenyReason::InsufficientRole { role: Role::User })
        );
    }

    #[tokio::test]
    async fn repeated_checks_are_idempotent() {
        let user = Uuid::new_v4();
        let access = service(Arc::new(StaticProfiles::with(user, "manager")), Arc::new(MemoryPermissions::default_catalog()));
        let guard = PermissionGuard::new(&access, names::ANALYTICS_VIEW);
        let session = Session::authenticated(user);

        let first = guard.check(&session).await;
        for _ in 0..5 {
            assert_eq!(guard.check(&session).await, first);
        }
        assert!(first.is_granted());
    }

    #[tokio::test]
    async fn gate_renders_fallback_when_denied() {
        let user = Uuid::new_v4();
        let access = service(Arc::new(StaticProfiles::with(user, "user")), Arc::new(MemoryPermissions::default_catalog()));
        let session = Session::authenticated(user);

        let export = PermissionGuard::new(&access, names::REPORTS_EXPORT);
        assert_eq!(export.gate(&session, "export", None).await, None);
        assert_eq!(export.gate(&session, "export", Some("upgrade")).await, Some("upgrade"));

        let tasks = PermissionGuard::new(&access, names::TASKS_MANAGE);
        assert_eq!(tasks.gate(&session, "tasks", None).await, Some("tasks"));
    }

    #[tokio::test]
    async fn any_failure_denies() {
        let user = Uuid::new_v4();
        let session = Session::authenticated(user);

        let access = AccessService::new(
            Arc::new(FailingProfiles::default()),
            Arc::new(MemoryPermissions::default_catalog()),
            AccessConfig::default(),
        );
        let guard = PermissionGuard::new(&access, names::TASKS_MANAGE);
        assert_eq!(guard.check(&session).await, Resolution::Denied(DenyReason::LookupFailed));

        let access = service(Arc::new(StaticProfiles::with(user, "admin")), Arc::new(FailingPermissions));
        let guard = PermissionGuard::new(&access, names::TASKS_MANAGE);
        assert_eq!(guard.check(&session).await, Resolution::Denied(DenyReason::LookupFailed));

        assert_eq!(guard.check(&Session::anonymous()).await, Resolution::Denied(DenyReason::Unauthenticated));
        assert_eq!(guard.check(&Session::loading()).await, Resolution::Pending);
    }
}
