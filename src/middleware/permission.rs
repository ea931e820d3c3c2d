use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::access::{AccessService, DenyReason, Resolution};
use crate::app::AppState;
use crate::auth::Session;
use crate::error::ApiError;

/// Route layer state naming the permission a route requires
#[derive(Clone)]
pub struct RequiredPermission {
    pub state: AppState,
    pub name: &'static str,
}

impl RequiredPermission {
    pub fn new(state: AppState, name: &'static str) -> Self {
        Self { state, name }
    }
}

/// Deny with `403 FORBIDDEN` unless the session's role holds the permission
pub async fn require_permission(State(required): State<RequiredPermission>, request: Request, next: Next) -> Response {
    let session = request.extensions().get::<Session>().copied().unwrap_or_else(Session::anonymous);
    match ensure_permission(&required.state.access, &session, required.name).await {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

/// Inline form of [`require_permission`] for handlers gating one action
pub async fn ensure_permission(access: &AccessService, session: &Session, name: &str) -> Result<(), ApiError> {
    match access.permission(name).check(session).await {
        Resolution::Granted(_) => Ok(()),
        Resolution::Pending => Err(ApiError::service_unavailable("Session is still loading")),
        Resolution::Denied(DenyReason::Unauthenticated) => Err(ApiError::unauthorized("Authentication required")),
        Resolution::Denied(reason) => {
            tracing::warn!("Permission '{}' denied: {:?}", name, reason);
            Err(ApiError::forbidden(format!("Missing permission: {}", name)))
        }
    }
}
