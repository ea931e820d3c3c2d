use chrono::NaiveDate;

use super::types::{Listable, SortValue};
use crate::entities::{AuditPack, Evidence, Organization, Reminder, Task, UserProfile};

impl Listable for Task {
    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn status(&self, today: NaiveDate) -> Option<&'static str> {
        Some(self.effective_status(today).as_str())
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str(), self.category.as_str()]
    }

    fn list_date(&self) -> Option<NaiveDate> {
        Some(self.due_date)
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "due_date" => Some(SortValue::Date(self.due_date)),
            "title" => Some(SortValue::Text(self.title.to_lowercase())),
            "priority" => Some(SortValue::Number(self.priority as i64)),
            "created_at" => Some(SortValue::Date(self.created_at.date_naive())),
            _ => None,
        }
    }

    fn sort_columns() -> &'static [&'static str] {
        &["due_date", "title", "priority", "created_at"]
    }
}

impl Listable for Evidence {
    fn category(&self) -> Option<&str> {
        Some(self.evidence_type.as_str())
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.file_name.as_str(), self.evidence_type.as_str()];
        if let Some(notes) = &self.notes {
            fields.push(notes.as_str());
        }
        fields
    }

    fn list_date(&self) -> Option<NaiveDate> {
        Some(self.uploaded_at.date_naive())
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "uploaded_at" => Some(SortValue::Date(self.uploaded_at.date_naive())),
            "name" => Some(SortValue::Text(self.name.to_lowercase())),
            "file_size" => Some(SortValue::Number(self.file_size as i64)),
            _ => None,
        }
    }

    fn sort_columns() -> &'static [&'static str] {
        &["uploaded_at", "name", "file_size"]
    }
}

impl Listable for Reminder {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        if let Some(notes) = &self.notes {
            fields.push(notes.as_str());
        }
        fields
    }

    fn list_date(&self) -> Option<NaiveDate> {
        Some(self.remind_on)
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "remind_on" => Some(SortValue::Date(self.remind_on)),
            "title" => Some(SortValue::Text(self.title.to_lowercase())),
            _ => None,
        }
    }

    fn sort_columns() -> &'static [&'static str] {
        &["remind_on", "title"]
    }
}

impl Listable for Organization {
    fn category(&self) -> Option<&str> {
        Some(self.industry.as_str())
    }

    fn status(&self, _today: NaiveDate) -> Option<&'static str> {
        Some(self.status.as_str())
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.contact_email.as_str(), self.industry.as_str()]
    }

    fn list_date(&self) -> Option<NaiveDate> {
        Some(self.created_at.date_naive())
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "name" => Some(SortValue::Text(self.name.to_lowercase())),
            "created_at" => Some(SortValue::Date(self.created_at.date_naive())),
            _ => None,
        }
    }

    fn sort_columns() -> &'static [&'static str] {
        &["name", "created_at"]
    }
}

impl Listable for UserProfile {
    fn category(&self) -> Option<&str> {
        Some(self.role.as_str())
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.email.as_str(), self.full_name.as_str()]
    }

    fn list_date(&self) -> Option<NaiveDate> {
        Some(self.created_at.date_naive())
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "email" => Some(SortValue::Text(self.email.to_lowercase())),
            "full_name" => Some(SortValue::Text(self.full_name.to_lowercase())),
            "created_at" => Some(SortValue::Date(self.created_at.date_naive())),
            _ => None,
        }
    }

    fn sort_columns() -> &'static [&'static str] {
        &["email", "full_name", "created_at"]
    }
}

impl Listable for AuditPack {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn list_date(&self) -> Option<NaiveDate> {
        Some(self.generated_at.date_naive())
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "generated_at" => Some(SortValue::Date(self.generated_at.date_naive())),
            "period_start" => Some(SortValue::Date(self.period_start)),
            "name" => Some(SortValue::Text(self.name.to_lowercase())),
            _ => None,
        }
    }

    fn sort_columns() -> &'static [&'static str] {
        &["generated_at", "period_start", "name"]
    }
}
