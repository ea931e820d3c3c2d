use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::role::Role;

#[derive(Debug, Clone, Copy)]
struct CachedRole {
    role: Role,
    stored_at: Instant,
}

/// Process-wide role cache keyed by user id.
///
/// Entries live until the user signs in or out again, until `clear`, or until
/// the optional TTL elapses.
#[derive(Debug, Clone)]
pub struct RoleCache {
    entries: Arc<RwLock<HashMap<Uuid, CachedRole>>>,
    ttl: Option<Duration>,
}

impl RoleCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn is_expired(&self, cached: &CachedRole) -> bool {
        matches!(self.ttl, Some(ttl) if cached.stored_at.elapsed() >= ttl)
    }

    /// Cached role, if still fresh. Expired entries are evicted on the way out.
    pub async fn get(&self, user_id: Uuid) -> Option<Role> {
        {
            let entries = self.entries.read().await;
            let cached = entries.get(&user_id)?;
            if !self.is_expired(cached) {
                return Some(cached.role);
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(&user_id).is_some_and(|cached| self.is_expired(cached)) {
            entries.remove(&user_id);
        }
        None
    }

    pub async fn insert(&self, user_id: Uuid, role: Role) {
        let mut entries = self.entries.write().await;
        entries.insert(user_id, CachedRole { role, stored_at: Instant::now() });
    }

    pub async fn invalidate(&self, user_id: Uuid) -> bool {
        self.entries.write().await.remove(&user_id).is_some()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
