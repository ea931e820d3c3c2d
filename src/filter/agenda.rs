use chrono::{Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{Priority, Reminder, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgendaKind {
    Task,
    Reminder,
}

/// One dated entry in the upcoming agenda
#[derive(Debug, Clone, Serialize)]
pub struct AgendaItem {
    pub kind: AgendaKind,
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Uuid>,
}

fn window_end(today: NaiveDate, window_days: u32) -> NaiveDate {
    today
        .checked_add_signed(Duration::days(window_days as i64))
        .unwrap_or(NaiveDate::MAX)
}

/// Open tasks due within `[today, today + window_days]`, soonest first
pub fn upcoming_tasks(tasks: &[Task], today: NaiveDate, window_days: u32) -> Vec<Task> {
    let end = window_end(today, window_days);
    let mut upcoming: Vec<Task> = tasks
        .iter()
        .filter(|t| !t.is_completed() && t.due_date >= today && t.due_date <= end)
        .cloned()
        .collect();
    upcoming.sort_by_key(|t| t.due_date);
    upcoming
}

/// Merge open tasks and reminders falling inside the window into one
/// ascending list. Recurring reminders contribute their next occurrence.
pub fn agenda(tasks: &[Task], reminders: &[Reminder], today: NaiveDate, window_days: u32) -> Vec<AgendaItem> {
    let end = window_end(today, window_days);

    let mut items: Vec<AgendaItem> = upcoming_tasks(tasks, today, window_days)
        .into_iter()
        .map(|t| AgendaItem {
            kind: AgendaKind::Task,
            id: t.id,
            title: t.title,
            date: t.due_date,
            priority: Some(t.priority),
            task_id: None,
        })
        .collect();

    for reminder in reminders {
        let Some(date) = reminder.next_occurrence(today) else {
            continue;
        };
        if date > end {
            continue;
        }
        items.push(AgendaItem {
            kind: AgendaKind::Reminder,
            id: reminder.id,
            title: reminder.title.clone(),
            date,
            priority: None,
            task_id: reminder.task_id,
        });
    }

    // stable: tasks before reminders on the same day
    items.sort_by_key(|item| item.date);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Recurrence;
    use crate::testing::{date, sample_task};
    use chrono::Utc;

    fn reminder(title: &str, on: &str, recurrence: Recurrence) -> Reminder {
        Reminder {
            id: Uuid::new_v4(),
            title: title.to_string(),
            task_id: None,
            remind_on: date(on),
            recurrence,
            notes: None,
            owner_id: Uuid::nil(),
            organization_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn orders_upcoming_tasks_ascending() {
        let tasks = vec![
            sample_task("2025-01-05"),
            sample_task("2025-01-01"),
            sample_task("2025-01-10"),
        ];

        let dates: Vec<_> = upcoming_tasks(&tasks, date("2025-01-01"), 30)
            .into_iter()
            .map(|t| t.due_date)
            .collect();
        assert_eq!(dates, [date("2025-01-01"), date("2025-01-05"), date("2025-01-10")]);
    }

    #[test]
    fn excludes_completed_past_and_out_of_window() {
        let mut done = sample_task("2025-01-03");
        done.mark_complete(Utc::now());
        let tasks = vec![done, sample_task("2024-12-31"), sample_task("2025-03-01")];

        assert!(upcoming_tasks(&tasks, date("2025-01-01"), 30).is_empty());
    }

    #[test]
    fn merges_reminders_by_next_occurrence() {
        let tasks = vec![sample_task("2025-01-05")];
        let reminders = vec![
            reminder("Weekly fridge check", "2024-12-30", Recurrence::Weekly),
            reminder("One-off", "2024-12-01", Recurrence::None),
            reminder("Licence renewal", "2025-06-01", Recurrence::None),
        ];

        let items = agenda(&tasks, &reminders, date("2025-01-01"), 30);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, AgendaKind::Task);
        assert_eq!(items[1].kind, AgendaKind::Reminder);
        assert_eq!(items[1].date, date("2025-01-06"));
    }
}
