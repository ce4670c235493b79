//! Persistence seam for tasks and notifications.
//!
//! The scheduler and the todo service only see this trait; the SQLite-backed
//! implementation lives in [`crate::db::store::SqliteStore`]. All calls are
//! blocking and are expected to run off the presentation thread.

use super::error::Result;
use super::notification::Notification;
use super::task::Task;

/// Durable CRUD for tasks and their reminders.
pub trait Store: Send + Sync {
    /// Inserts a task and returns the id assigned to it.
    fn add_task(&self, task: &Task) -> Result<i64>;

    /// Updates name, description and priority. `id` and `created_at` never change.
    fn edit_task(&self, task: &Task) -> Result<()>;

    /// Removes the task row only; dependent notifications are the caller's job.
    fn delete_task(&self, task_id: i64) -> Result<usize>;

    /// All tasks, highest priority first.
    fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Point lookup; `None` when no task has this id.
    fn get_task(&self, task_id: i64) -> Result<Option<Task>>;

    /// Inserts a notification, replacing any row with the same id, and returns its id.
    fn add_notification(&self, notification: &Notification) -> Result<i64>;

    /// Rewrites a stored notification in place.
    fn edit_notification(&self, notification: &Notification) -> Result<()>;

    /// Returns the number of rows removed; an unknown id removes none.
    fn delete_notification(&self, notification_id: i64) -> Result<usize>;

    /// Removes every notification of a task, returning how many there were.
    fn delete_notifications_by_task_id(&self, task_id: i64) -> Result<usize>;

    fn delete_all_notifications(&self) -> Result<usize>;

    /// All notifications, earliest reminder time first.
    fn list_notifications(&self) -> Result<Vec<Notification>>;
}
