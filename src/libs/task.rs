use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A to-do item.
///
/// `id` stays `None` until the store assigns one. `created_at` is set once by
/// [`Task::new`] (epoch milliseconds) and is never changed by an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    /// Expected to be 1-10; the core accepts any integer.
    pub priority: i32,
    pub created_at: i64,
}

impl Task {
    pub fn new(name: &str, description: Option<&str>, priority: i32) -> Self {
        Task {
            id: None,
            name: name.to_string(),
            description: description.filter(|d| !d.is_empty()).map(str::to_string),
            priority,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Description with an absent value read as empty.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}
