use chrono::{DateTime, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::access::RecordScope;
use crate::database::store::{EntityStore, StoreError};
use crate::entities::schema::non_blank;
use crate::entities::Evidence;
use crate::filter::{group_by, Filter, Group};

/// Metadata accompanying an uploaded file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvidenceUpload {
    pub name: String,
    pub evidence_type: String,
    pub file_name: String,
    #[serde(default)]
    pub task_id: Option<Uuid>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Hex SHA-256 of uploaded content
pub fn checksum(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}

pub struct EvidenceService {
    store: Arc<dyn EntityStore<Evidence>>,
}

impl EvidenceService {
    pub fn new(store: Arc<dyn EntityStore<Evidence>>) -> Self {
        Self { store }
    }

    /// Record metadata for `content` under the caller's scope; the bytes
    /// themselves are not retained
    pub async fn upload(
        &self,
        scope: RecordScope,
        upload: EvidenceUpload,
        content: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Evidence, StoreError> {
        let evidence = Evidence {
            id: Uuid::new_v4(),
            task_id: upload.task_id,
            name: upload.name.trim().to_string(),
            evidence_type: upload.evidence_type.trim().to_string(),
            file_name: upload.file_name.trim().to_string(),
            file_size: content.len() as u64,
            content_type: non_blank(&upload.content_type),
            checksum: checksum(content),
            notes: non_blank(&upload.notes),
            owner_id: scope.user_id,
            organization_id: scope.organization_id,
            uploaded_at: now,
        };

        let saved = scope.store(self.store.clone()).insert(evidence).await?;
        tracing::info!("Stored evidence {} ({} bytes, {})", saved.id, saved.file_size, saved.evidence_type);
        Ok(saved)
    }

    /// Visible evidence, filtered and grouped by type tag in first-seen order
    pub async fn grouped(&self, scope: RecordScope, filter: &Filter) -> Result<Vec<Group<Evidence>>, StoreError> {
        let records = filter.apply(&scope.store(self.store.clone()).list().await?);
        Ok(group_by(&records, |e| e.evidence_type.as_str()))
    }

    pub async fn delete(&self, scope: RecordScope, id: Uuid) -> Result<(), StoreError> {
        scope.store(self.store.clone()).delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::store::ValidatedStore;
    use crate::entities::ValidationError;
    use crate::testing::date;

    fn service() -> EvidenceService {
        EvidenceService::new(ValidatedStore::shared(Arc::new(MemoryStore::new())))
    }

    fn upload(name: &str, evidence_type: &str) -> EvidenceUpload {
        EvidenceUpload {
            name: name.to_string(),
            evidence_type: evidence_type.to_string(),
            file_name: format!("{}.pdf", name),
            ..Default::default()
        }
    }

    #[test]
    fn checksum_is_sha256_hex() {
        assert_eq!(checksum(b"abc"), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    fn scope() -> RecordScope {
        RecordScope::new(Uuid::new_v4(), None)
    }

    #[tokio::test]
    async fn groups_uploads_by_type() {
        let (svc, mine) = (service(), scope());
        let now = Utc::now();
        svc.upload(mine, upload("fridge-am", "temperature-log"), b"4C", now).await.unwrap();
        svc.upload(mine, upload("fridge-pm", "temperature-log"), b"5C", now).await.unwrap();
        svc.upload(scope(), upload("walk-in", "temperature-log"), b"2C", now).await.unwrap();
        svc.upload(mine, upload("food-hygiene-l2", "training-certificate"), b"cert", now).await.unwrap();

        let groups = svc.grouped(mine, &Filter::new(date("2025-01-01"))).await.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].label.as_str(), groups[0].count), ("Temperature Log", 2));
        assert_eq!((groups[1].label.as_str(), groups[1].count), ("Training Certificate", 1));
    }

    #[tokio::test]
    async fn rejects_upload_without_name() {
        let err = service().upload(scope(), upload("  ", "temperature-log"), b"x", Utc::now()).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(ValidationError::MissingField("name"))));
    }

    #[tokio::test]
    async fn only_the_owner_can_delete() {
        let (svc, mine) = (service(), scope());
        let saved = svc.upload(mine, upload("fridge-am", "temperature-log"), b"4C", Utc::now()).await.unwrap();

        assert!(matches!(svc.delete(scope(), saved.id).await, Err(StoreError::NotFound(_))));
        svc.delete(mine, saved.id).await.unwrap();
    }
}
