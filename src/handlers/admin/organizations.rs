use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::access::permissions;
use crate::app::AppState;
use crate::auth::Session;
use crate::entities::Organization;
use crate::filter::{Filter, ListQuery};
use crate::forms::{FormMode, OrganizationDraft};
use crate::handlers::{submit_form, today};
use crate::middleware::{ensure_permission, ApiResponse, ApiResult};

pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> ApiResult<Vec<Organization>> {
    let filter = Filter::from_query::<Organization>(&query, today())?;
    Ok(ApiResponse::success(filter.apply(&state.organizations.list().await?)))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Organization> {
    Ok(ApiResponse::success(state.organizations.get_404(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(draft): Json<OrganizationDraft>,
) -> ApiResult<Organization> {
    ensure_permission(&state.access, &session, permissions::ORGANIZATIONS_MANAGE).await?;
    let saved = submit_form(FormMode::Create, draft, state.organizations.as_ref()).await?;
    tracing::info!("Created organization {} ({})", saved.id, saved.name);
    Ok(ApiResponse::created(saved))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(draft): Json<OrganizationDraft>,
) -> ApiResult<Organization> {
    ensure_permission(&state.access, &session, permissions::ORGANIZATIONS_MANAGE).await?;
    let existing = state.organizations.get_404(id).await?;
    Ok(ApiResponse::success(submit_form(FormMode::Edit(existing), draft, state.organizations.as_ref()).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    ensure_permission(&state.access, &session, permissions::ORGANIZATIONS_MANAGE).await?;
    state.organizations.delete(id).await?;
    Ok(ApiResponse::<()>::no_content())
}
