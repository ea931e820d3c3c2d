use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::access::{permissions, RecordScope};
use crate::app::AppState;
use crate::auth::Session;
use crate::database::EntityStore;
use crate::entities::Task;
use crate::filter::{Filter, ListQuery};
use crate::forms::{FormMode, TaskDraft};
use crate::handlers::{submit_form, today};
use crate::middleware::{ensure_permission, ApiResponse, ApiResult};

/// GET /api/tasks - the caller's tasks, filtered, searched and sorted
pub async fn list(State(state): State<AppState>, scope: RecordScope, Query(query): Query<ListQuery>) -> ApiResult<Vec<Task>> {
    let filter = Filter::from_query::<Task>(&query, today())?;
    let tasks = scope.store(state.tasks.clone()).list().await?;
    Ok(ApiResponse::success(filter.apply(&tasks)))
}

/// GET /api/tasks/:id
pub async fn get(State(state): State<AppState>, scope: RecordScope, Path(id): Path<Uuid>) -> ApiResult<Task> {
    Ok(ApiResponse::success(scope.store(state.tasks.clone()).get_404(id).await?))
}

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    scope: RecordScope,
    Json(draft): Json<TaskDraft>,
) -> ApiResult<Task> {
    ensure_permission(&state.access, &session, permissions::TASKS_MANAGE).await?;
    let tasks = scope.store(state.tasks.clone());
    Ok(ApiResponse::created(submit_form(FormMode::Create, draft, &tasks).await?))
}

/// PUT /api/tasks/:id - replace editable fields; status and identity are kept
pub async fn update(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    scope: RecordScope,
    Path(id): Path<Uuid>,
    Json(draft): Json<TaskDraft>,
) -> ApiResult<Task> {
    ensure_permission(&state.access, &session, permissions::TASKS_MANAGE).await?;
    let tasks = scope.store(state.tasks.clone());
    let existing = tasks.get_404(id).await?;
    Ok(ApiResponse::success(submit_form(FormMode::Edit(existing), draft, &tasks).await?))
}

/// DELETE /api/tasks/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    scope: RecordScope,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    ensure_permission(&state.access, &session, permissions::TASKS_MANAGE).await?;
    scope.store(state.tasks.clone()).delete(id).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// POST /api/tasks/:id/complete
pub async fn complete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    scope: RecordScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Task> {
    ensure_permission(&state.access, &session, permissions::TASKS_MANAGE).await?;
    let tasks = scope.store(state.tasks.clone());
    let mut task = tasks.get_404(id).await?;
    task.mark_complete(Utc::now());
    Ok(ApiResponse::success(tasks.update(task).await?))
}

/// POST /api/tasks/:id/reopen
pub async fn reopen(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    scope: RecordScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Task> {
    ensure_permission(&state.access, &session, permissions::TASKS_MANAGE).await?;
    let tasks = scope.store(state.tasks.clone());
    let mut task = tasks.get_404(id).await?;
    task.reopen();
    Ok(ApiResponse::success(tasks.update(task).await?))
}
