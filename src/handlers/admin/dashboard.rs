use axum::{extract::State, Extension};

use crate::access::permissions;
use crate::app::AppState;
use crate::auth::Session;
use crate::middleware::{ensure_permission, ApiResponse, ApiResult};
use crate::services::dashboard_service::AdminDashboard;

/// GET /api/admin/dashboard - organization analytics and user activity
pub async fn get(State(state): State<AppState>, Extension(session): Extension<Session>) -> ApiResult<AdminDashboard> {
    ensure_permission(&state.access, &session, permissions::ANALYTICS_VIEW).await?;
    Ok(ApiResponse::success(state.dashboards.admin().await?))
}
