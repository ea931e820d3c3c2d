use serde::Serialize;

use super::role::Role;

/// Outcome of an access check. `Pending` is never mistaken for a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum Resolution {
    Pending,
    Granted(Role),
    Denied(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenyReason {
    /// No authenticated user
    Unauthenticated,
    /// Role resolved but does not satisfy the check
    InsufficientRole { role: Role },
    /// Remote lookup failed; treated as the most restrictive outcome
    LookupFailed,
}

impl Resolution {
    pub fn is_granted(&self) -> bool {
        matches!(self, Resolution::Granted(_))
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, Resolution::Pending)
    }
}
