use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::Draft;
use crate::access::Role;
use crate::entities::schema::non_blank;
use crate::entities::{
    Evidence, Organization, OrganizationStatus, Owned, Priority, Recurrence, Reminder, Task, TaskCategory, TaskStatus,
    UserProfile, ValidationError,
};
use crate::services::evidence_service::checksum;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Option<Uuid>,
}

impl Draft for TaskDraft {
    type Record = Task;

    fn build(&self, id: Uuid, now: DateTime<Utc>) -> Result<Task, ValidationError> {
        Ok(Task {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category,
            priority: self.priority,
            status: TaskStatus::Pending,
            due_date: self.due_date.ok_or(ValidationError::MissingField("due_date"))?,
            owner_id: Uuid::nil(),
            organization_id: None,
            assigned_to: self.assigned_to,
            created_at: now,
            completed_at: None,
        })
    }

    fn apply_to(&self, existing: &Task) -> Result<Task, ValidationError> {
        let mut task = self.build(existing.id, existing.created_at)?;
        task.status = existing.status;
        task.completed_at = existing.completed_at;
        task.assign(existing.owner_id, existing.organization_id);
        Ok(task)
    }

    fn from_record(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category,
            priority: task.priority,
            due_date: Some(task.due_date),
            assigned_to: task.assigned_to,
        }
    }
}

/// Evidence metadata plus the file picked for upload
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EvidenceDraft {
    pub name: String,
    pub evidence_type: String,
    pub task_id: Option<Uuid>,
    pub notes: Option<String>,
    pub file_name: String,
    pub content_type: Option<String>,
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl Draft for EvidenceDraft {
    type Record = Evidence;

    fn build(&self, id: Uuid, now: DateTime<Utc>) -> Result<Evidence, ValidationError> {
        Ok(Evidence {
            id,
            task_id: self.task_id,
            name: self.name.trim().to_string(),
            evidence_type: self.evidence_type.trim().to_string(),
            file_name: self.file_name.trim().to_string(),
            file_size: self.content.len() as u64,
            content_type: non_blank(&self.content_type),
            checksum: checksum(&self.content),
            notes: non_blank(&self.notes),
            owner_id: Uuid::nil(),
            organization_id: None,
            uploaded_at: now,
        })
    }

    /// Metadata only; the stored file and checksum are kept
    fn apply_to(&self, existing: &Evidence) -> Result<Evidence, ValidationError> {
        Ok(Evidence {
            task_id: self.task_id,
            name: self.name.trim().to_string(),
            evidence_type: self.evidence_type.trim().to_string(),
            notes: non_blank(&self.notes),
            ..existing.clone()
        })
    }

    fn from_record(evidence: &Evidence) -> Self {
        Self {
            name: evidence.name.clone(),
            evidence_type: evidence.evidence_type.clone(),
            task_id: evidence.task_id,
            notes: evidence.notes.clone(),
            file_name: evidence.file_name.clone(),
            content_type: evidence.content_type.clone(),
            content: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReminderDraft {
    pub title: String,
    pub task_id: Option<Uuid>,
    pub remind_on: Option<NaiveDate>,
    pub recurrence: Recurrence,
    pub notes: Option<String>,
}

impl Draft for ReminderDraft {
    type Record = Reminder;

    fn build(&self, id: Uuid, now: DateTime<Utc>) -> Result<Reminder, ValidationError> {
        Ok(Reminder {
            id,
            title: self.title.trim().to_string(),
            task_id: self.task_id,
            remind_on: self.remind_on.ok_or(ValidationError::MissingField("remind_on"))?,
            recurrence: self.recurrence,
            notes: non_blank(&self.notes),
            owner_id: Uuid::nil(),
            organization_id: None,
            created_at: now,
        })
    }

    fn apply_to(&self, existing: &Reminder) -> Result<Reminder, ValidationError> {
        let mut reminder = self.build(existing.id, existing.created_at)?;
        reminder.assign(existing.owner_id, existing.organization_id);
        Ok(reminder)
    }

    fn from_record(reminder: &Reminder) -> Self {
        Self {
            title: reminder.title.clone(),
            task_id: reminder.task_id,
            remind_on: Some(reminder.remind_on),
            recurrence: reminder.recurrence,
            notes: reminder.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrganizationDraft {
    pub name: String,
    pub industry: String,
    pub contact_email: String,
    pub status: OrganizationStatus,
}

impl Draft for OrganizationDraft {
    type Record = Organization;

    fn build(&self, id: Uuid, now: DateTime<Utc>) -> Result<Organization, ValidationError> {
        Ok(Organization {
            id,
            name: self.name.trim().to_string(),
            industry: self.industry.trim().to_lowercase(),
            contact_email: self.contact_email.trim().to_string(),
            status: self.status,
            created_at: now,
        })
    }

    fn apply_to(&self, existing: &Organization) -> Result<Organization, ValidationError> {
        self.build(existing.id, existing.created_at)
    }

    fn from_record(org: &Organization) -> Self {
        Self {
            name: org.name.clone(),
            industry: org.industry.clone(),
            contact_email: org.contact_email.clone(),
            status: org.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserDraft {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub organization_id: Option<Uuid>,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            email: String::new(),
            full_name: String::new(),
            role: Role::most_restrictive(),
            organization_id: None,
        }
    }
}

impl Draft for UserDraft {
    type Record = UserProfile;

    fn build(&self, id: Uuid, now: DateTime<Utc>) -> Result<UserProfile, ValidationError> {
        Ok(UserProfile {
            id,
            email: self.email.trim().to_lowercase(),
            full_name: self.full_name.trim().to_string(),
            role: self.role,
            organization_id: self.organization_id,
            created_at: now,
        })
    }

    fn apply_to(&self, existing: &UserProfile) -> Result<UserProfile, ValidationError> {
        self.build(existing.id, existing.created_at)
    }

    fn from_record(profile: &UserProfile) -> Self {
        Self {
            email: profile.email.clone(),
            full_name: profile.full_name.clone(),
            role: profile.role,
            organization_id: profile.organization_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Validate;
    use crate::testing::date;

    #[test]
    fn task_edit_keeps_identity_and_completion() {
        let now = Utc::now();
        let draft = TaskDraft { title: "Fridge check".into(), due_date: Some(date("2025-01-05")), ..Default::default() };
        let mut task = draft.build(Uuid::new_v4(), now).unwrap();
        let owner = Uuid::new_v4();
        task.assign(owner, None);
        task.mark_complete(now);

        let mut edit = TaskDraft::from_record(&task);
        edit.title = "Fridge check (kitchen)".into();
        let updated = edit.apply_to(&task).unwrap();

        assert_eq!(updated.id, task.id);
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.is_completed());
        assert_eq!(updated.owner_id, owner);
        assert_eq!(updated.title, "Fridge check (kitchen)");
    }

    #[test]
    fn missing_date_is_a_missing_field() {
        let draft = ReminderDraft { title: "Renew licence".into(), ..Default::default() };
        assert_eq!(
            draft.build(Uuid::new_v4(), Utc::now()).unwrap_err(),
            ValidationError::MissingField("remind_on")
        );
    }

    #[test]
    fn evidence_draft_hashes_content() {
        let draft = EvidenceDraft {
            name: "Fridge log".into(),
            evidence_type: "temperature-log".into(),
            file_name: "fridge.csv".into(),
            content: b"abc".to_vec(),
            ..Default::default()
        };
        let evidence = draft.build(Uuid::new_v4(), Utc::now()).unwrap();
        assert_eq!(evidence.file_size, 3);
        assert!(evidence.validate().is_ok());
    }

    #[test]
    fn user_draft_defaults_to_most_restrictive_role() {
        assert_eq!(UserDraft::default().role, Role::Customer);
    }
}
