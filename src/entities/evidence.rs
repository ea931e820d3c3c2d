use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schema::{require_max_len, require_tag, require_text, Validate, ValidationError};
use super::{Entity, Owned};

/// Metadata for an uploaded evidence file.
///
/// Only metadata is kept; the content is hashed on upload and discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: Uuid,
    #[serde(default)]
    pub task_id: Option<Uuid>,
    pub name: String,
    /// Classification tag such as `temperature-log` or `training-certificate`
    pub evidence_type: String,
    pub file_name: String,
    pub file_size: u64,
    #[serde(default)]
    pub content_type: Option<String>,
    /// Hex SHA-256 of the uploaded content
    pub checksum: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub owner_id: Uuid,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    pub uploaded_at: DateTime<Utc>,
}

impl Validate for Evidence {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_max_len("name", &self.name, 200)?;
        require_tag("evidence_type", &self.evidence_type)?;
        require_text("file_name", &self.file_name)?;
        if self.checksum.len() != 64 || !self.checksum.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::invalid("checksum", "must be a hex SHA-256 digest"));
        }
        Ok(())
    }
}

impl Entity for Evidence {
    const COLLECTION: &'static str = "evidence";
    const LABEL: &'static str = "Evidence";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }
}

impl Owned for Evidence {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn organization_id(&self) -> Option<Uuid> {
        self.organization_id
    }

    fn assign(&mut self, owner_id: Uuid, organization_id: Option<Uuid>) {
        self.owner_id = owner_id;
        self.organization_id = organization_id;
    }
}
