use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schema::{require_email, require_text, Validate, ValidationError};
use super::Entity;
use crate::access::Role;

/// Profile row for an authenticated user; `role` is what the role resolver reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    #[serde(default = "Role::most_restrictive")]
    pub role: Role,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Validate for UserProfile {
    fn validate(&self) -> Result<(), ValidationError> {
        require_email("email", &self.email)?;
        require_text("full_name", &self.full_name)
    }
}

impl Entity for UserProfile {
    const COLLECTION: &'static str = "profiles";
    const LABEL: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
