use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Extension,
};
use chrono::Utc;
use uuid::Uuid;

use crate::access::{permissions, RecordScope};
use crate::app::AppState;
use crate::auth::Session;
use crate::entities::Evidence;
use crate::filter::{Filter, Group, ListQuery};
use crate::handlers::today;
use crate::middleware::{ensure_permission, ApiResponse, ApiResult};
use crate::services::EvidenceUpload;

/// GET /api/evidence - the caller's evidence, filtered and grouped by type
pub async fn list(
    State(state): State<AppState>,
    scope: RecordScope,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Group<Evidence>>> {
    let filter = Filter::from_query::<Evidence>(&query, today())?;
    Ok(ApiResponse::success(state.evidence.grouped(scope, &filter).await?))
}

/// POST /api/evidence?name=..&evidence_type=..&file_name=.. - raw file bytes as the body
pub async fn upload(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    scope: RecordScope,
    Query(upload): Query<EvidenceUpload>,
    body: Bytes,
) -> ApiResult<Evidence> {
    ensure_permission(&state.access, &session, permissions::EVIDENCE_UPLOAD).await?;
    let evidence = state.evidence.upload(scope, upload, &body, Utc::now()).await?;
    Ok(ApiResponse::created(evidence))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    scope: RecordScope,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    ensure_permission(&state.access, &session, permissions::EVIDENCE_UPLOAD).await?;
    state.evidence.delete(scope, id).await?;
    Ok(ApiResponse::<()>::no_content())
}
