//! Business records managed by the portal.
//!
//! Every record type implements [`Entity`] (identity + storage collection)
//! and [`Validate`] (the shared minimum shape).

pub mod audit_pack;
pub mod evidence;
pub mod organization;
pub mod reminder;
pub mod schema;
pub mod task;
pub mod user;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

pub use audit_pack::AuditPack;
pub use evidence::Evidence;
pub use organization::{Organization, OrganizationStatus};
pub use reminder::{Recurrence, Reminder};
pub use schema::{Validate, ValidationError};
pub use task::{Priority, Task, TaskCategory, TaskStatus};
pub use user::UserProfile;

pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + Validate + 'static {
    /// Storage collection (table or local key) holding this record type
    const COLLECTION: &'static str;
    /// Singular label used in notifications and error messages
    const LABEL: &'static str;

    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;
}

/// Records that belong to the user who created them and, when that user has
/// one, to their organization.
pub trait Owned: Entity {
    fn owner_id(&self) -> Uuid;

    fn organization_id(&self) -> Option<Uuid>;

    fn assign(&mut self, owner_id: Uuid, organization_id: Option<Uuid>);
}
