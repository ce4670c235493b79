use serde::{Deserialize, Serialize};

/// A reminder attached to exactly one task.
///
/// Times are epoch milliseconds. A reminder with a `repeat_interval` repeats
/// indefinitely every interval starting at `reminder_time`; one without fires
/// at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Option<i64>,
    pub task_id: i64,
    pub reminder_time: i64,
    pub repeat_interval: Option<i64>,
}

impl Notification {
    pub fn one_shot(task_id: i64, reminder_time: i64) -> Self {
        Notification {
            id: None,
            task_id,
            reminder_time,
            repeat_interval: None,
        }
    }

    pub fn repeating(task_id: i64, reminder_time: i64, repeat_interval: i64) -> Self {
        Notification {
            id: None,
            task_id,
            reminder_time,
            repeat_interval: Some(repeat_interval),
        }
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat_interval.is_some()
    }

    /// A one-shot reminder whose time has passed. Repeating reminders are never stale.
    pub fn is_stale_at(&self, now_ms: i64) -> bool {
        !self.is_repeating() && self.reminder_time < now_ms
    }
}
