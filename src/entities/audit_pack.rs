use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schema::{require_text, Validate, ValidationError};
use super::{Entity, Owned};

/// Bundle of evidence and tasks covering a reporting period, handed to inspectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditPack {
    pub id: Uuid,
    pub name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub evidence_ids: Vec<Uuid>,
    pub task_ids: Vec<Uuid>,
    pub completed_tasks: usize,
    pub generated_by: Uuid,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    pub generated_at: DateTime<Utc>,
}

impl Validate for AuditPack {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        if self.period_end < self.period_start {
            return Err(ValidationError::invalid("period_end", "must not be before period_start"));
        }
        Ok(())
    }
}

impl Entity for AuditPack {
    const COLLECTION: &'static str = "audit_packs";
    const LABEL: &'static str = "Audit pack";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}

impl Owned for AuditPack {
    fn owner_id(&self) -> Uuid {
        self.generated_by
    }

    fn organization_id(&self) -> Option<Uuid> {
        self.organization_id
    }

    fn assign(&mut self, owner_id: Uuid, organization_id: Option<Uuid>) {
        self.generated_by = owner_id;
        self.organization_id = organization_id;
    }
}
