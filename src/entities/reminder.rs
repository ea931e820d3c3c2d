use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schema::{require_max_len, require_text, Validate, ValidationError};
use super::{Entity, Owned};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    /// The `n`-th occurrence of a series anchored on `start` (the 0th is
    /// `start` itself). Always counted from the anchor, so a series on the
    /// 31st lands on each month's last day without drifting.
    pub fn nth(&self, start: NaiveDate, n: u32) -> Option<NaiveDate> {
        match (self, n) {
            (_, 0) => Some(start),
            (Recurrence::None, _) => None,
            (Recurrence::Daily, n) => start.checked_add_signed(Duration::days(i64::from(n))),
            (Recurrence::Weekly, n) => start.checked_add_signed(Duration::weeks(i64::from(n))),
            (Recurrence::Monthly, n) => start.checked_add_months(Months::new(n)),
            (Recurrence::Yearly, n) => start.checked_add_months(Months::new(n.checked_mul(12)?)),
        }
    }

    /// Index of the first occurrence that could fall on or after `from`
    fn first_candidate(&self, start: NaiveDate, from: NaiveDate) -> u32 {
        let days = (from - start).num_days().max(0);
        let skip = match self {
            Recurrence::None => 0,
            Recurrence::Daily => days,
            Recurrence::Weekly => days / 7,
            // Months are at least 28 days and years at least 365
            Recurrence::Monthly => days / 31,
            Recurrence::Yearly => days / 366,
        };
        u32::try_from(skip).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub task_id: Option<Uuid>,
    pub remind_on: NaiveDate,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub owner_id: Uuid,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    /// First occurrence on or after `from`
    pub fn next_occurrence(&self, from: NaiveDate) -> Option<NaiveDate> {
        let mut n = self.recurrence.first_candidate(self.remind_on, from);
        loop {
            let date = self.recurrence.nth(self.remind_on, n)?;
            if date >= from {
                return Some(date);
            }
            n = n.checked_add(1)?;
        }
    }
}

impl Validate for Reminder {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_max_len("title", &self.title, 200)
    }
}

impl Entity for Reminder {
    const COLLECTION: &'static str = "reminders";
    const LABEL: &'static str = "Reminder";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Owned for Reminder {
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
