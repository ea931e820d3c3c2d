use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::access::{permissions, RecordScope};
use crate::app::AppState;
use crate::auth::Session;
use crate::database::EntityStore;
use crate::entities::Reminder;
use crate::filter::{Filter, ListQuery};
use crate::forms::{FormMode, ReminderDraft};
use crate::handlers::{submit_form, today};
use crate::middleware::{ensure_permission, ApiResponse, ApiResult};

pub async fn list(
    State(state): State<AppState>,
    scope: RecordScope,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Reminder>> {
    let filter = Filter::from_query::<Reminder>(&query, today())?;
    let reminders = scope.store(state.reminders.clone()).list().await?;
    Ok(ApiResponse::success(filter.apply(&reminders)))
}

pub async fn get(State(state): State<AppState>, scope: RecordScope, Path(id): Path<Uuid>) -> ApiResult<Reminder> {
    Ok(ApiResponse::success(scope.store(state.reminders.clone()).get_404(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    scope: RecordScope,
    Json(draft): Json<ReminderDraft>,
) -> ApiResult<Reminder> {
    ensure_permission(&state.access, &session, permissions::REMINDERS_MANAGE).await?;
    let reminders = scope.store(state.reminders.clone());
    Ok(ApiResponse::created(submit_form(FormMode::Create, draft, &reminders).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    scope: RecordScope,
    Path(id): Path<Uuid>,
    Json(draft): Json<ReminderDraft>,
) -> ApiResult<Reminder> {
    ensure_permission(&state.access, &session, permissions::REMINDERS_MANAGE).await?;
    let reminders = scope.store(state.reminders.clone());
    let existing = reminders.get_404(id).await?;
    Ok(ApiResponse::success(submit_form(FormMode::Edit(existing), draft, &reminders).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    scope: RecordScope,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    ensure_permission(&state.access, &session, permissions::REMINDERS_MANAGE).await?;
    scope.store(state.reminders.clone()).delete(id).await?;
    Ok(ApiResponse::<()>::no_content())
}
