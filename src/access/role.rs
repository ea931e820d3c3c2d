use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::AccessConfig;

/// Coarse role recorded on a user's profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    PlatformAdmin,
    Admin,
    Manager,
    User,
    Customer,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 5] = [Role::PlatformAdmin, Role::Admin, Role::Manager, Role::User, Role::Customer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PlatformAdmin => "platform_admin",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::User => "user",
            Role::Customer => "customer",
        }
    }

    /// Classification used whenever no privileged role can be established
    pub fn most_restrictive() -> Self {
        Role::Customer
    }

    fn rank(&self) -> u8 {
        match self {
            Role::PlatformAdmin => 4,
            Role::Admin => 3,
            Role::Manager => 2,
            Role::User => 1,
            Role::Customer => 0,
        }
    }

    /// Whether a holder of this role may give `target` to a profile, or edit
    /// a profile that currently holds it. Nobody hands out more than they hold.
    pub fn can_assign(&self, target: Role) -> bool {
        target.rank() <= self.rank()
    }

    pub fn tier(&self) -> AccessTier {
        match self {
            Role::PlatformAdmin => AccessTier::PlatformAdmin,
            Role::Admin | Role::Manager => AccessTier::Admin,
            Role::User | Role::Customer => AccessTier::Customer,
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "platform_admin" => Ok(Role::PlatformAdmin),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "user" => Ok(Role::User),
            "customer" => Ok(Role::Customer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access tier a role maps to; each tier has its own landing route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTier {
    PlatformAdmin,
    Admin,
    Customer,
}

impl AccessTier {
    pub fn landing_route<'a>(&self, routes: &'a AccessConfig) -> &'a str {
        match self {
            AccessTier::PlatformAdmin => &routes.platform_admin_route,
            AccessTier::Admin => &routes.admin_route,
            AccessTier::Customer => &routes.customer_route,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            assert_eq!(serde_json::to_value(role).unwrap(), role.as_str());
        }
        assert_eq!("superuser".parse::<Role>(), Err(UnknownRole("superuser".into())));
    }

    #[test]
    fn tiers_and_landing_routes() {
        let routes = AccessConfig::default();
        assert_eq!(Role::Manager.tier(), AccessTier::Admin);
        assert_eq!(Role::User.tier(), AccessTier::Customer);
        assert_eq!(Role::PlatformAdmin.tier().landing_route(&routes), "/platform-admin");
        assert_eq!(Role::most_restrictive().tier().landing_route(&routes), "/dashboard");
    }

    #[test]
    fn only_platform_admins_grant_platform_admin() {
        assert!(Role::PlatformAdmin.can_assign(Role::PlatformAdmin));
        assert!(!Role::Admin.can_assign(Role::PlatformAdmin));
        assert!(Role::Admin.can_assign(Role::Admin));
        assert!(Role::Admin.can_assign(Role::Customer));
        assert!(!Role::Manager.can_assign(Role::Admin));
        assert!(!Role::Customer.can_assign(Role::User));
    }
}
