//! Route guard state machine.
//!
//! ```text
//! Unresolved ──(session loaded, user)──> Checking ──> Authorized
//!     │                                      └──────> Unauthorized
//!     └──(session loaded, no user)──> Unauthenticated
//! ```
//!
//! Any change of session user or loading flag resets the machine to
//! `Unresolved`. Role lookups are asynchronous; each one is issued against a
//! [`ResolutionTicket`] and its result is discarded if the session changed or
//! the guard was dropped in the meantime.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use super::resolution::{DenyReason, Resolution};
use super::resolver::{ResolvedRole, RoleSource};
use super::role::Role;
use super::service::AccessService;
use crate::auth::Session;
use crate::config::AccessConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardKind {
    Admin,
    Customer,
    PlatformAdmin,
}

impl GuardKind {
    pub fn permits(&self, role: Role) -> bool {
        match self {
            GuardKind::Admin => matches!(role, Role::PlatformAdmin | Role::Admin | Role::Manager),
            GuardKind::Customer => role != Role::PlatformAdmin,
            GuardKind::PlatformAdmin => role == Role::PlatformAdmin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Unresolved,
    Checking,
    Authorized(Role),
    Unauthorized { role: Role, reason: DenyReason, redirect: String },
    Unauthenticated { redirect: String },
}

/// What the guarded route should do right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardView {
    Loading,
    Render(Role),
    Redirect(String),
}

/// Token scoping one asynchronous role resolution to a guard's lifetime
#[derive(Debug, Clone)]
pub struct ResolutionTicket {
    epoch: u64,
    lifetime: Weak<AtomicU64>,
}

impl ResolutionTicket {
    /// False once the issuing guard was reset or dropped
    pub fn is_current(&self) -> bool {
        self.lifetime
            .upgrade()
            .map(|epoch| epoch.load(Ordering::SeqCst) == self.epoch)
            .unwrap_or(false)
    }
}

pub struct RouteGuard {
    kind: GuardKind,
    routes: AccessConfig,
    session: Option<(Option<uuid::Uuid>, bool)>,
    state: GuardState,
    epoch: Arc<AtomicU64>,
}

impl RouteGuard {
    pub fn new(kind: GuardKind, routes: AccessConfig) -> Self {
        Self {
            kind,
            routes,
            session: None,
            state: GuardState::Unresolved,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn kind(&self) -> GuardKind {
        self.kind
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Feed the current session. Returns a ticket when a role lookup must be
    /// started for it.
    pub fn observe(&mut self, session: &Session) -> Option<ResolutionTicket> {
        if self.session != Some(session.key()) {
            self.session = Some(session.key());
            self.reset();
        }

        if self.state != GuardState::Unresolved || session.loading {
            return None;
        }

        if session.user_id.is_none() {
            tracing::debug!("{:?} guard: no authenticated user, redirecting to sign-in", self.kind);
            self.state = GuardState::Unauthenticated { redirect: self.routes.sign_in_route.clone() };
            return None;
        }

        self.state = GuardState::Checking;
        Some(self.ticket())
    }

    /// Apply a resolved role. Stale tickets are ignored and return false.
    pub fn apply(&mut self, ticket: &ResolutionTicket, resolved: ResolvedRole) -> bool {
        let own = Weak::ptr_eq(&ticket.lifetime, &Arc::downgrade(&self.epoch));
        if !own || !ticket.is_current() || self.state != GuardState::Checking {
            tracing::debug!("{:?} guard: discarding stale role resolution", self.kind);
            return false;
        }

        let role = resolved.role;
        self.state = if self.kind.permits(role) {
            GuardState::Authorized(role)
        } else {
            let reason = match resolved.source {
                RoleSource::Fallback => DenyReason::LookupFailed,
                RoleSource::Profile | RoleSource::Cache => DenyReason::InsufficientRole { role },
            };
            let redirect = role.tier().landing_route(&self.routes).to_string();
            tracing::warn!("{:?} guard denied role {} ({:?}); redirecting to {}", self.kind, role, reason, redirect);
            GuardState::Unauthorized { role, reason, redirect }
        };
        true
    }

    pub fn resolution(&self) -> Resolution {
        match &self.state {
            GuardState::Unresolved | GuardState::Checking => Resolution::Pending,
            GuardState::Authorized(role) => Resolution::Granted(*role),
            GuardState::Unauthorized { reason, .. } => Resolution::Denied(*reason),
            GuardState::Unauthenticated { .. } => Resolution::Denied(DenyReason::Unauthenticated),
        }
    }

    pub fn view(&self) -> GuardView {
        match &self.state {
            GuardState::Unresolved | GuardState::Checking => GuardView::Loading,
            GuardState::Authorized(role) => GuardView::Render(*role),
            GuardState::Unauthorized { redirect, .. } | GuardState::Unauthenticated { redirect } => {
                GuardView::Redirect(redirect.clone())
            }
        }
    }

    /// Observe the session, resolve the role if needed and return the view
    pub async fn evaluate(&mut self, session: &Session, access: &AccessService) -> GuardView {
        if let (Some(ticket), Some(user_id)) = (self.observe(session), session.user_id) {
            let resolved = access.resolve_role(user_id).await;
            self.apply(&ticket, resolved);
        }
        self.view()
    }

    fn reset(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.state = GuardState::Unresolved;
    }

    fn ticket(&self) -> ResolutionTicket {
        ResolutionTicket {
            epoch: self.epoch.load(Ordering::SeqCst),
            lifetime: Arc::downgrade(&self.epoch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn granted(role: Role) -> ResolvedRole {
        ResolvedRole { role, source: RoleSource::Profile }
    }

    fn guard(kind: GuardKind) -> RouteGuard {
        RouteGuard::new(kind, AccessConfig::default())
    }

    #[test]
    fn loading_session_renders_loading_without_redirect() {
        let mut g = guard(GuardKind::Admin);
        assert!(g.observe(&Session::loading()).is_none());
        assert_eq!(g.view(), GuardView::Loading);
        assert_eq!(g.resolution(), Resolution::Pending);
    }

    #[test]
    fn every_guard_sends_anonymous_visitors_to_sign_in() {
        for kind in [GuardKind::Admin, GuardKind::Customer, GuardKind::PlatformAdmin] {
            let mut g = guard(kind);
            assert!(g.observe(&Session::anonymous()).is_none());
            assert_eq!(g.view(), GuardView::Redirect("/sign-in".into()));
            assert_eq!(g.resolution(), Resolution::Denied(DenyReason::Unauthenticated));
        }
    }

    #[test]
    fn admin_guard_redirects_non_admins_to_customer_landing() {
        for role in [Role::User, Role::Customer] {
            let mut g = guard(GuardKind::Admin);
            let ticket = g.observe(&Session::authenticated(Uuid::new_v4())).unwrap();
            assert_eq!(g.view(), GuardView::Loading);
            assert!(g.apply(&ticket, granted(role)));
            assert_eq!(g.view(), GuardView::Redirect("/dashboard".into()));
        }
    }

    #[test]
    fn customer_guard_turns_platform_admins_away() {
        let mut g = guard(GuardKind::Customer);
        let ticket = g.observe(&Session::authenticated(Uuid::new_v4())).unwrap();
        g.apply(&ticket, granted(Role::PlatformAdmin));
        assert_eq!(g.view(), GuardView::Redirect("/platform-admin".into()));
    }

    #[test]
    fn platform_guard_sends_admins_to_admin_landing() {
        let mut g = guard(GuardKind::PlatformAdmin);
        let ticket = g.observe(&Session::authenticated(Uuid::new_v4())).unwrap();
        g.apply(&ticket, granted(Role::Manager));
        assert_eq!(g.view(), GuardView::Redirect("/admin".into()));
        assert_eq!(
            g.resolution(),
            Resolution::Denied(DenyReason::InsufficientRole { role: Role::Manager })
        );
    }

    #[test]
    fn lookup_failure_redirects_like_an_unprivileged_role() {
        let user = Uuid::new_v4();

        let mut failed = guard(GuardKind::Admin);
        let ticket = failed.observe(&Session::authenticated(user)).unwrap();
        failed.apply(&ticket, ResolvedRole::fallback());

        let mut unprivileged = guard(GuardKind::Admin);
        let ticket = unprivileged.observe(&Session::authenticated(user)).unwrap();
        unprivileged.apply(&ticket, granted(Role::Customer));

        assert_eq!(failed.view(), unprivileged.view());
        assert_eq!(failed.resolution(), Resolution::Denied(DenyReason::LookupFailed));
    }

    #[test]
    fn session_change_discards_in_flight_resolution() {
        let mut g = guard(GuardKind::Admin);
        let stale = g.observe(&Session::authenticated(Uuid::new_v4())).unwrap();

        let fresh = g.observe(&Session::authenticated(Uuid::new_v4())).unwrap();
        assert!(!stale.is_current());
        assert!(!g.apply(&stale, granted(Role::Admin)));
        assert_eq!(g.view(), GuardView::Loading);

        assert!(g.apply(&fresh, granted(Role::Customer)));
        assert_eq!(g.view(), GuardView::Redirect("/dashboard".into()));
    }

    #[test]
    fn dropped_guard_invalidates_its_tickets() {
        let mut g = guard(GuardKind::Customer);
        let ticket = g.observe(&Session::authenticated(Uuid::new_v4())).unwrap();
        assert!(ticket.is_current());
        drop(g);
        assert!(!ticket.is_current());
    }

    #[test]
    fn tickets_from_another_guard_are_rejected() {
        let mut a = guard(GuardKind::Admin);
        let mut b = guard(GuardKind::Admin);
        let session = Session::authenticated(Uuid::new_v4());
        let ticket_a = a.observe(&session).unwrap();
        b.observe(&session).unwrap();
        assert!(!b.apply(&ticket_a, granted(Role::Admin)));
    }

    #[test]
    fn authorized_state_holds_until_session_changes() {
        let user = Uuid::new_v4();
        let mut g = guard(GuardKind::Admin);
        let ticket = g.observe(&Session::authenticated(user)).unwrap();
        g.apply(&ticket, granted(Role::Admin));

        assert!(g.observe(&Session::authenticated(user)).is_none());
        assert_eq!(g.view(), GuardView::Render(Role::Admin));

        assert!(g.observe(&Session::loading()).is_none());
        assert_eq!(g.view(), GuardView::Loading);
    }
}
