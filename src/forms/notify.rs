use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Error,
}

/// Transient message shown to the user after an action
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub level: Level,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), level, message: message.into(), created_at: Utc::now() }
    }
}

/// Bounded queue of pending notifications; the oldest is dropped when full
pub struct Notifications {
    queue: Mutex<VecDeque<Notification>>,
    capacity: usize,
}

impl Notifications {
    pub fn new(capacity: usize) -> Self {
        Self { queue: Mutex::new(VecDeque::with_capacity(capacity)), capacity: capacity.max(1) }
    }

    pub fn push(&self, notification: Notification) {
        let mut queue = self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if queue.len() == self.capacity {
            queue.pop_front();
        }
        queue.push_back(notification);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Notification::new(Level::Success, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Notification::new(Level::Error, message));
    }

    /// Take everything queued so far
    pub fn drain(&self) -> Vec<Notification> {
        let mut queue = self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_when_full() {
        let notes = Notifications::new(2);
        notes.error("first");
        notes.error("second");
        notes.success("third");

        let drained: Vec<_> = notes.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(drained, ["second", "third"]);
        assert!(notes.is_empty());
    }
}
