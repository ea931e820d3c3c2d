use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::cache::RoleCache;
use super::role::Role;
use crate::database::store::{EntityStore, StoreError};
use crate::entities::UserProfile;

/// Remote profile table as seen by the role resolver
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Role tag recorded on the user's profile; `None` when there is no
    /// profile or no role on it
    async fn fetch_role(&self, user_id: Uuid) -> Result<Option<String>, StoreError>;
}

/// Reads roles from any profile entity store
pub struct ProfileRoles {
    profiles: Arc<dyn EntityStore<UserProfile>>,
}

impl ProfileRoles {
    pub fn new(profiles: Arc<dyn EntityStore<UserProfile>>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl ProfileStore for ProfileRoles {
    async fn fetch_role(&self, user_id: Uuid) -> Result<Option<String>, StoreError> {
        let profile = self.profiles.get(user_id).await?;
        Ok(profile.map(|p| p.role.as_str().to_string()))
    }
}

/// Where a resolved role came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSource {
    /// Read from the profile store
    Profile,
    /// Served from the shared role cache
    Cache,
    /// Lookup failed or returned an unknown tag; most restrictive role applied
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedRole {
    pub role: Role,
    pub source: RoleSource,
}

impl ResolvedRole {
    pub fn fallback() -> Self {
        Self { role: Role::most_restrictive(), source: RoleSource::Fallback }
    }
}

/// Resolves a user id to exactly one role, failing closed.
///
/// Callers must only invoke this once the session has finished loading.
pub struct RoleResolver {
    profiles: Arc<dyn ProfileStore>,
    cache: Option<RoleCache>,
}

impl RoleResolver {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles, cache: None }
    }

    pub fn with_cache(mut self, cache: RoleCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&RoleCache> {
        self.cache.as_ref()
    }

    pub async fn resolve(&self, user_id: Uuid) -> ResolvedRole {
        if let Some(cache) = &self.cache {
            if let Some(role) = cache.get(user_id).await {
                return ResolvedRole { role, source: RoleSource::Cache };
            }
        }

        let role = match self.profiles.fetch_role(user_id).await {
            Ok(Some(tag)) => match tag.parse::<Role>() {
                Ok(role) => role,
                Err(e) => {
                    tracing::warn!("Profile for {} carries {}; applying most restrictive role", user_id, e);
                    return ResolvedRole::fallback();
                }
            },
            // No profile or no role: not privileged, and a legitimate answer
            Ok(None) => Role::most_restrictive(),
            Err(e) => {
                tracing::warn!("Role lookup for {} failed: {}; applying most restrictive role", user_id, e);
                return ResolvedRole::fallback();
            }
        };

        if let Some(cache) = &self.cache {
            cache.insert(user_id, role).await;
        }

        tracing::debug!("Resolved role {} for user {}", role, user_id);
        ResolvedRole { role, source: RoleSource::Profile }
    }
}
