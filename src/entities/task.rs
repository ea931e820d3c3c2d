use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::schema::{require_max_len, require_text, Validate, ValidationError};
use super::{Entity, Owned};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskCategory {
    #[default]
    FoodSafety,
    HealthSafety,
    FireSafety,
    Cleaning,
    Maintenance,
    Training,
    Licensing,
    Other,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::FoodSafety => "food-safety",
            TaskCategory::HealthSafety => "health-safety",
            TaskCategory::FireSafety => "fire-safety",
            TaskCategory::Cleaning => "cleaning",
            TaskCategory::Maintenance => "maintenance",
            TaskCategory::Training => "training",
            TaskCategory::Licensing => "licensing",
            TaskCategory::Other => "other",
        }
    }
}

impl FromStr for TaskCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "food-safety" => Ok(TaskCategory::FoodSafety),
            "health-safety" => Ok(TaskCategory::HealthSafety),
            "fire-safety" => Ok(TaskCategory::FireSafety),
            "cleaning" => Ok(TaskCategory::Cleaning),
            "maintenance" => Ok(TaskCategory::Maintenance),
            "training" => Ok(TaskCategory::Training),
            "licensing" => Ok(TaskCategory::Licensing),
            "other" => Ok(TaskCategory::Other),
            other => Err(ValidationError::invalid("category", format!("unknown category '{}'", other))),
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Overdue,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Overdue => "overdue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: TaskCategory,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    pub due_date: NaiveDate,
    /// Creator; records without one are visible to nobody
    #[serde(default)]
    pub owner_id: Uuid,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Past due and still open as of `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.due_date < today
    }

    /// Status as displayed on `today`: open tasks past their due date read as overdue
    pub fn effective_status(&self, today: NaiveDate) -> TaskStatus {
        if self.is_overdue(today) {
            TaskStatus::Overdue
        } else {
            self.status
        }
    }

    pub fn mark_complete(&mut self, now: DateTime<Utc>) {
        if !self.is_completed() {
            self.status = TaskStatus::Completed;
            self.completed_at = Some(now);
        }
    }

    pub fn reopen(&mut self) {
        if self.is_completed() {
            self.status = TaskStatus::Pending;
            self.completed_at = None;
        }
    }
}

impl Validate for Task {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_max_len("title", &self.title, 200)?;
        require_max_len("description", &self.description, 5000)?;
        match (self.status, self.completed_at) {
            (TaskStatus::Completed, None) => Err(ValidationError::invalid("completed_at", "completed tasks need a completion time")),
            (TaskStatus::Completed, Some(_)) | (_, None) => Ok(()),
            (_, Some(_)) => Err(ValidationError::invalid("completed_at", "only completed tasks carry a completion time")),
        }
    }
}

impl Entity for Task {
    const COLLECTION: &'static str = "tasks";
    const LABEL: &'static str = "Task";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Owned for Task {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn task(due: NaiveDate) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Fridge temperature check".into(),
            description: String::new(),
            category: TaskCategory::FoodSafety,
            priority: Priority::High,
            status: TaskStatus::Pending,
            due_date: due,
            owner_id: Uuid::new_v4(),
            organization_id: None,
            assigned_to: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn complete_and_reopen_keep_schema_valid() {
        let mut t = task(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        t.mark_complete(Utc::now());
        assert!(t.is_completed());
        assert!(t.completed_at.is_some());
        assert!(t.validate().is_ok());

        t.reopen();
        assert_eq!(t.status, TaskStatus::Pending);
        assert!(t.completed_at.is_none());
        assert!(t.validate().is_ok());
    }

    #[test]
    fn overdue_only_when_open() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let mut t = task(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        assert_eq!(t.effective_status(today), TaskStatus::Overdue);
        t.mark_complete(Utc::now());
        assert_eq!(t.effective_status(today), TaskStatus::Completed);
    }

    #[test]
    fn category_tags_parse() {
        assert_eq!("food-safety".parse::<TaskCategory>().unwrap(), TaskCategory::FoodSafety);
        assert!("gardening".parse::<TaskCategory>().is_err());
        assert_eq!(serde_json::to_value(TaskCategory::FireSafety).unwrap(), "fire-safety");
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut t = task(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        t.title = "   ".into();
        assert_eq!(t.validate(), Err(ValidationError::MissingField("title")));
    }
}
