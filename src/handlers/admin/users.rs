// Every route here sits behind `users.manage`. Callers may only grant, edit
// or remove roles at or below their own; role edits invalidate the affected
// user's cached role so the next request sees the new tier.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::access::Role;
use crate::app::AppState;
use crate::entities::UserProfile;
use crate::error::ApiError;
use crate::filter::{Filter, ListQuery};
use crate::forms::{FormMode, UserDraft};
use crate::handlers::{submit_form, today};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

fn ensure_can_assign(caller: &CurrentUser, role: Role) -> Result<(), ApiError> {
    if caller.role.can_assign(role) {
        return Ok(());
    }
    tracing::warn!("{} ({}) may not assign or manage role {}", caller.user_id, caller.role, role);
    Err(ApiError::forbidden(format!("Role {} is above your own", role)))
}

pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> ApiResult<Vec<UserProfile>> {
    let filter = Filter::from_query::<UserProfile>(&query, today())?;
    Ok(ApiResponse::success(filter.apply(&state.profiles.list().await?)))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<UserProfile> {
    Ok(ApiResponse::success(state.profiles.get_404(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    Json(draft): Json<UserDraft>,
) -> ApiResult<UserProfile> {
    ensure_can_assign(&caller, draft.role)?;
    let profile = submit_form(FormMode::Create, draft, state.profiles.as_ref()).await?;
    Ok(ApiResponse::created(profile))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(draft): Json<UserDraft>,
) -> ApiResult<UserProfile> {
    let existing = state.profiles.get_404(id).await?;
    ensure_can_assign(&caller, existing.role)?;
    ensure_can_assign(&caller, draft.role)?;

    let previous = existing.role;
    let profile = submit_form(FormMode::Edit(existing), draft, state.profiles.as_ref()).await?;
    if profile.role != previous {
        tracing::info!("Role of {} changed from {} to {} by {}", id, previous, profile.role, caller.user_id);
        state.access.invalidate(id).await;
    }
    Ok(ApiResponse::success(profile))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let existing = state.profiles.get_404(id).await?;
    ensure_can_assign(&caller, existing.role)?;
    state.profiles.delete(id).await?;
    state.access.invalidate(id).await;
    Ok(ApiResponse::<()>::no_content())
}
