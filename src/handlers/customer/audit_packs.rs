use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::access::{permissions, RecordScope};
use crate::app::AppState;
use crate::auth::Session;
use crate::entities::AuditPack;
use crate::middleware::{ensure_permission, ApiResponse, ApiResult};
use crate::services::AuditPackRequest;

/// GET /api/audit-packs - newest first
pub async fn list(State(state): State<AppState>, scope: RecordScope) -> ApiResult<Vec<AuditPack>> {
    Ok(ApiResponse::success(state.audit_packs.list(scope).await?))
}

/// POST /api/audit-packs - requires `reports.export`
pub async fn generate(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    scope: RecordScope,
    Json(request): Json<AuditPackRequest>,
) -> ApiResult<AuditPack> {
    ensure_permission(&state.access, &session, permissions::REPORTS_EXPORT).await?;
    let pack = state.audit_packs.generate(scope, request, Utc::now()).await?;
    Ok(ApiResponse::created(pack))
}
