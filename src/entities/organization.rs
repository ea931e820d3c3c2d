use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schema::{require_email, require_max_len, require_text, Validate, ValidationError};
use super::Entity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationStatus {
    #[default]
    Active,
    Trial,
    Suspended,
}

impl OrganizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationStatus::Active => "active",
            OrganizationStatus::Trial => "trial",
            OrganizationStatus::Suspended => "suspended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub industry: String,
    pub contact_email: String,
    #[serde(default)]
    pub status: OrganizationStatus,
    pub created_at: DateTime<Utc>,
}

impl Validate for Organization {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_max_len("name", &self.name, 200)?;
        require_email("contact_email", &self.contact_email)
    }
}

impl Entity for Organization {
    const COLLECTION: &'static str = "organizations";
    const LABEL: &'static str = "Organization";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
