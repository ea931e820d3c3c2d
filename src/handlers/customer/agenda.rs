use axum::extract::{Query, State};
use serde::Deserialize;

use crate::access::RecordScope;
use crate::app::AppState;
use crate::database::EntityStore;
use crate::filter::{agenda, AgendaItem};
use crate::handlers::today;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct AgendaQuery {
    pub days: Option<u32>,
}

/// GET /api/agenda?days=N - the caller's open tasks and reminders coming up, soonest first
pub async fn get(
    State(state): State<AppState>,
    scope: RecordScope,
    Query(query): Query<AgendaQuery>,
) -> ApiResult<Vec<AgendaItem>> {
    let window = query.days.unwrap_or(state.views.agenda_window_days);
    let (tasks, reminders) = (scope.store(state.tasks.clone()), scope.store(state.reminders.clone()));
    let (tasks, reminders) = futures::try_join!(tasks.list(), reminders.list())?;
    Ok(ApiResponse::success(agenda(&tasks, &reminders, today(), window)))
}
