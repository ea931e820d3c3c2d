//! Create/edit forms for business records.
//!
//! A form holds a controlled [`Draft`]. Submitting builds a record, checks it
//! against the same [`Validate`](crate::entities::Validate) schema the stores
//! enforce, and persists it. Incomplete drafts are blocked without persisting
//! or notifying; store failures push a notification and keep the form open
//! with its values intact.

pub mod drafts;
pub mod notify;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::store::{EntityStore, StoreError};
use crate::entities::{Entity, Validate, ValidationError};

pub use drafts::{EvidenceDraft, OrganizationDraft, ReminderDraft, TaskDraft, UserDraft};
pub use notify::{Level, Notification, Notifications};

/// Editable field values for one record type
pub trait Draft: Default + Clone + Send + Sync {
    type Record: Entity;

    /// Fresh record with a generated id and creation timestamp
    fn build(&self, id: Uuid, now: DateTime<Utc>) -> Result<Self::Record, ValidationError>;

    /// Replacement for `existing`, keeping its identity and creation timestamp
    fn apply_to(&self, existing: &Self::Record) -> Result<Self::Record, ValidationError>;

    fn from_record(record: &Self::Record) -> Self;
}

#[derive(Debug, Clone)]
pub enum FormMode<R> {
    Create,
    Edit(R),
}

#[derive(Debug)]
pub enum SubmitOutcome<R> {
    /// Required fields missing or invalid; nothing was persisted
    Blocked(ValidationError),
    Saved(R),
    Failed(StoreError),
}

impl<R> SubmitOutcome<R> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }
}

pub struct FormState<D: Draft> {
    mode: FormMode<D::Record>,
    draft: D,
    open: bool,
}

impl<D: Draft> Default for FormState<D> {
    fn default() -> Self {
        Self { mode: FormMode::Create, draft: D::default(), open: false }
    }
}

impl<D: Draft> FormState<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form opened on values that arrived whole, as from a request body
    pub fn submitted(mode: FormMode<D::Record>, draft: D) -> Self {
        Self { mode, draft, open: true }
    }

    pub fn open_create(&mut self) {
        self.mode = FormMode::Create;
        self.draft = D::default();
        self.open = true;
    }

    pub fn open_edit(&mut self, record: D::Record) {
        self.draft = D::from_record(&record);
        self.mode = FormMode::Edit(record);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.mode = FormMode::Create;
        self.draft = D::default();
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> &FormMode<D::Record> {
        &self.mode
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub async fn submit(
        &mut self,
        store: &dyn EntityStore<D::Record>,
        notifications: &Notifications,
        now: DateTime<Utc>,
    ) -> SubmitOutcome<D::Record> {
        let built = match &self.mode {
            FormMode::Create => self.draft.build(Uuid::new_v4(), now),
            FormMode::Edit(existing) => self.draft.apply_to(existing),
        };
        let record = match built.and_then(|r| r.validate().map(|_| r)) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("{} form blocked: {}", <D::Record as Entity>::LABEL, e);
                return SubmitOutcome::Blocked(e);
            }
        };

        let result = match self.mode {
            FormMode::Create => store.insert(record).await,
            FormMode::Edit(_) => store.update(record).await,
        };

        match result {
            Ok(saved) => {
                self.close();
                SubmitOutcome::Saved(saved)
            }
            Err(e) => {
                tracing::error!("Failed to save {}: {}", <D::Record as Entity>::LABEL, e);
                notifications.error(format!("Could not save {}. Please try again.", <D::Record as Entity>::LABEL));
                SubmitOutcome::Failed(e)
            }
        }
    }
}
