use axum::extract::State;

use crate::access::RecordScope;
use crate::app::AppState;
use crate::handlers::today;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::dashboard_service::CustomerDashboard;

/// GET /api/dashboard - counts and upcoming items over the caller's records
pub async fn get(State(state): State<AppState>, scope: RecordScope) -> ApiResult<CustomerDashboard> {
    Ok(ApiResponse::success(state.dashboards.customer(scope, today()).await?))
}
