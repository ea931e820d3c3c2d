use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::access::{GuardKind, GuardView, Role};
use crate::app::AppState;
use crate::auth::Session;
use crate::error::ApiError;

/// Caller identity for handlers behind a route guard
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub role: Role,
}

pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    guard(GuardKind::Admin, state, request, next).await
}

pub async fn require_customer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    guard(GuardKind::Customer, state, request, next).await
}

pub async fn require_platform_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    guard(GuardKind::PlatformAdmin, state, request, next).await
}

async fn guard(kind: GuardKind, state: AppState, mut request: Request, next: Next) -> Response {
    let session = request.extensions().get::<Session>().copied().unwrap_or_else(Session::anonymous);
    let mut guard = state.access.guard(kind);

    match guard.evaluate(&session, &state.access).await {
        GuardView::Render(role) => {
            let Some(user_id) = session.user_id else {
                return ApiError::unauthorized("Authentication required").into_response();
            };
            tracing::debug!("{:?} guard admitted {} as {}", kind, user_id, role);
            request.extensions_mut().insert(CurrentUser { user_id, role });
            next.run(request).await
        }
        // 303 See Other
        GuardView::Redirect(to) => {
            tracing::debug!("{:?} guard redirecting {} {} to {}", kind, request.method(), request.uri().path(), to);
            Redirect::to(&to).into_response()
        }
        GuardView::Loading => ApiError::service_unavailable("Session is still loading").into_response(),
    }
}
