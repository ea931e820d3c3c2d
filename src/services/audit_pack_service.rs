use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::access::RecordScope;
use crate::database::store::{EntityStore, StoreError};
use crate::entities::{AuditPack, Evidence, Task, ValidationError};
use crate::filter::DateRange;

#[derive(Debug, Clone, Deserialize)]
pub struct AuditPackRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

pub struct AuditPackService {
    tasks: Arc<dyn EntityStore<Task>>,
    evidence: Arc<dyn EntityStore<Evidence>>,
    packs: Arc<dyn EntityStore<AuditPack>>,
}

impl AuditPackService {
    pub fn new(
        tasks: Arc<dyn EntityStore<Task>>,
        evidence: Arc<dyn EntityStore<Evidence>>,
        packs: Arc<dyn EntityStore<AuditPack>>,
    ) -> Self {
        Self { tasks, evidence, packs }
    }

    /// Packs visible to `scope`, newest first
    pub async fn list(&self, scope: RecordScope) -> Result<Vec<AuditPack>, StoreError> {
        let mut packs = scope.store(self.packs.clone()).list().await?;
        packs.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(packs)
    }

    /// Snapshot the caller's tasks due and evidence uploaded within the period
    pub async fn generate(
        &self,
        scope: RecordScope,
        request: AuditPackRequest,
        now: DateTime<Utc>,
    ) -> Result<AuditPack, StoreError> {
        if request.period_end < request.period_start {
            return Err(ValidationError::invalid("period_end", "must not be before period_start").into());
        }

        let period = DateRange::new(Some(request.period_start), Some(request.period_end));
        let (tasks, evidence) = (scope.store(self.tasks.clone()), scope.store(self.evidence.clone()));
        let (tasks, evidence) = futures::try_join!(tasks.list(), evidence.list())?;

        let tasks: Vec<&Task> = tasks.iter().filter(|t| period.contains(t.due_date)).collect();
        let evidence_ids = evidence
            .iter()
            .filter(|e| period.contains(e.uploaded_at.date_naive()))
            .map(|e| e.id)
            .collect();

        let name = request
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Audit pack {} to {}", request.period_start, request.period_end));

        let pack = AuditPack {
            id: Uuid::new_v4(),
            name,
            period_start: request.period_start,
            period_end: request.period_end,
            evidence_ids,
            task_ids: tasks.iter().map(|t| t.id).collect(),
            completed_tasks: tasks.iter().filter(|t| t.is_completed()).count(),
            generated_by: scope.user_id,
            organization_id: scope.organization_id,
            generated_at: now,
        };

        let saved = scope.store(self.packs.clone()).insert(pack).await?;
        tracing::info!(
            "Generated audit pack {} with {} task(s) and {} evidence item(s)",
            saved.id,
            saved.task_ids.len(),
            saved.evidence_ids.len()
        );
        Ok(saved)
    }
}
