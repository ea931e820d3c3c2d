use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::cache::RoleCache;
use super::guard::{GuardKind, RouteGuard};
use super::permission::{PermissionGuard, PermissionStore};
use super::resolution::Resolution;
use super::resolver::{ProfileStore, ResolvedRole, RoleResolver, RoleSource};
use super::role::AccessTier;
use crate::auth::Session;
use crate::config::AccessConfig;

/// The single access service shared by every guard and permission check
pub struct AccessService {
    resolver: RoleResolver,
    permissions: Arc<dyn PermissionStore>,
    config: AccessConfig,
}

/// Summary of the current session's access, as reported to clients
#[derive(Debug, Clone, Serialize)]
pub struct AccessSummary {
    pub user_id: Option<Uuid>,
    pub resolution: Resolution,
    pub tier: Option<AccessTier>,
    pub source: Option<RoleSource>,
    pub landing_route: String,
}

impl AccessService {
    pub fn new(profiles: Arc<dyn ProfileStore>, permissions: Arc<dyn PermissionStore>, config: AccessConfig) -> Self {
        let mut resolver = RoleResolver::new(profiles);
        if config.cache_roles {
            let ttl = match config.role_cache_ttl_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            };
            resolver = resolver.with_cache(RoleCache::new(ttl));
        }

        Self { resolver, permissions, config }
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    pub fn permissions(&self) -> &dyn PermissionStore {
        self.permissions.as_ref()
    }

    pub async fn resolve_role(&self, user_id: Uuid) -> ResolvedRole {
        self.resolver.resolve(user_id).await
    }

    pub fn guard(&self, kind: GuardKind) -> RouteGuard {
        RouteGuard::new(kind, self.config.clone())
    }

    pub fn permission(&self, name: impl Into<String>) -> PermissionGuard<'_> {
        PermissionGuard::new(self, name)
    }

    /// Drop any cached role so the next check re-reads the profile
    pub async fn invalidate(&self, user_id: Uuid) {
        if let Some(cache) = self.resolver.cache() {
            if cache.invalidate(user_id).await {
                tracing::debug!("Invalidated cached role for {}", user_id);
            }
        }
    }

    pub async fn sign_in(&self, user_id: Uuid) {
        self.invalidate(user_id).await;
    }

    pub async fn sign_out(&self, user_id: Uuid) {
        self.invalidate(user_id).await;
        tracing::info!("User {} signed out", user_id);
    }

    pub async fn summarize(&self, session: &Session) -> AccessSummary {
        let sign_in = self.config.sign_in_route.clone();
        if session.loading {
            return AccessSummary {
                user_id: None,
                resolution: Resolution::Pending,
                tier: None,
                source: None,
                landing_route: sign_in,
            };
        }
        let Some(user_id) = session.user_id else {
            return AccessSummary {
                user_id: None,
                resolution: Resolution::Denied(super::resolution::DenyReason::Unauthenticated),
                tier: None,
                source: None,
                landing_route: sign_in,
            };
        };

        let resolved = self.resolve_role(user_id).await;
        let tier = resolved.role.tier();
        AccessSummary {
            user_id: Some(user_id),
            resolution: Resolution::Granted(resolved.role),
            tier: Some(tier),
            source: Some(resolved.source),
            landing_route: tier.landing_route(&self.config).to_string(),
        }
    }
}
