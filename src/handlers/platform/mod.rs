// handlers/platform/mod.rs - Platform tier (platform admins only)

use axum::extract::State;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::analytics::{PermissionSummary, RoleSummary};
use crate::services::dashboard_service::PlatformDashboard;

/// GET /api/platform/dashboard - revenue, active organizations and catalogs
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<PlatformDashboard> {
    Ok(ApiResponse::success(state.dashboards.platform().await?))
}

/// GET /api/platform/roles
pub async fn roles(State(state): State<AppState>) -> ApiResult<Vec<RoleSummary>> {
    Ok(ApiResponse::success(state.dashboards.roles().await?))
}

/// GET /api/platform/permissions
pub async fn permissions(State(state): State<AppState>) -> ApiResult<Vec<PermissionSummary>> {
    Ok(ApiResponse::success(state.dashboards.permissions().await?))
}
