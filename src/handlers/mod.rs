// handlers/mod.rs - Handlers grouped by the route guard in front of them
//
// Public (no session) → Session (any caller) → Customer / Admin / Platform
// (role-gated by the guard middleware in app.rs)

pub mod admin;
pub mod customer;
pub mod platform;
pub mod public;
pub mod session;

use chrono::{NaiveDate, Utc};

use crate::database::EntityStore;
use crate::error::ApiError;
use crate::forms::{Draft, FormMode, FormState, Notifications, SubmitOutcome};

/// Calendar date used for overdue detection and agenda windows
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Submit a request body through the record's form: blocked drafts answer
/// 422 with field errors, store failures answer with the store's status.
pub(crate) async fn submit_form<D: Draft>(
    mode: FormMode<D::Record>,
    draft: D,
    store: &dyn EntityStore<D::Record>,
) -> Result<D::Record, ApiError> {
    let mut form = FormState::submitted(mode, draft);
    match form.submit(store, &Notifications::default(), Utc::now()).await {
        SubmitOutcome::Saved(record) => Ok(record),
        SubmitOutcome::Blocked(e) => Err(e.into()),
        SubmitOutcome::Failed(e) => Err(e.into()),
    }
}
