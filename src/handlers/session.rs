// handlers/session.rs - Session introspection and sign-out

use axum::{extract::State, Extension};

use crate::access::AccessSummary;
use crate::app::AppState;
use crate::auth::Session;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/session - resolved role, tier and landing route for the caller
pub async fn show(State(state): State<AppState>, Extension(session): Extension<Session>) -> ApiResult<AccessSummary> {
    Ok(ApiResponse::success(state.access.summarize(&session).await))
}

/// POST /api/session - sign in: re-read the caller's role from their profile
pub async fn sign_in(State(state): State<AppState>, Extension(session): Extension<Session>) -> ApiResult<AccessSummary> {
    let user_id = session.user_id.ok_or_else(|| ApiError::unauthorized("Authentication required"))?;
    state.access.sign_in(user_id).await;
    Ok(ApiResponse::success(state.access.summarize(&session).await))
}

/// DELETE /api/session - sign out: drop the caller's cached role
pub async fn sign_out(State(state): State<AppState>, Extension(session): Extension<Session>) -> ApiResult<()> {
    let user_id = session.user_id.ok_or_else(|| ApiError::unauthorized("Authentication required"))?;
    state.access.sign_out(user_id).await;
    Ok(ApiResponse::<()>::no_content())
}
