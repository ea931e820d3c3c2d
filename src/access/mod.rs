//! Role-based access gating.
//!
//! A session resolves to exactly one [`Role`] through the shared
//! [`AccessService`] before any protected content is served. Route guards map
//! the role onto an access tier and either render or redirect; permission
//! guards check one named capability inline. Every failure path denies.
//! Owned records are further limited to the caller's [`RecordScope`].

pub mod cache;
pub mod guard;
pub mod permission;
pub mod resolution;
pub mod resolver;
pub mod role;
pub mod scope;
pub mod service;

pub use guard::{GuardKind, GuardState, GuardView, ResolutionTicket, RouteGuard};
pub use permission::{names as permissions, MemoryPermissions, PermissionGuard, PermissionStore};
pub use resolution::{DenyReason, Resolution};
pub use resolver::{ProfileRoles, ProfileStore, ResolvedRole, RoleResolver, RoleSource};
pub use role::{AccessTier, Role, UnknownRole};
pub use scope::{RecordScope, ScopedStore};
pub use service::{AccessService, AccessSummary};
