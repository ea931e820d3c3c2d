use serde::Serialize;
use uuid::Uuid;

/// Authenticated identity as supplied by the auth collaborator.
///
/// Read-only to the rest of the system. `loading` is true while the
/// collaborator is still restoring or refreshing the session; no access
/// decision may be made until it clears.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: Option<Uuid>,
    pub loading: bool,
}

impl Session {
    pub fn loading() -> Self {
        Self { user_id: None, loading: true }
    }

    pub fn anonymous() -> Self {
        Self { user_id: None, loading: false }
    }

    pub fn authenticated(user_id: Uuid) -> Self {
        Self { user_id: Some(user_id), loading: false }
    }

    /// Identity of the session for change detection
    pub fn key(&self) -> (Option<Uuid>, bool) {
        (self.user_id, self.loading)
    }
}
