//! Presentation-facing state and commands.
//!
//! [`TodoService`] is what a front end talks to. It publishes the task list,
//! the notification list, the current filter selection and the "need alarm
//! permission" flag on `watch` channels, and exposes the mutating commands.
//!
//! Store and timer calls block, so every command runs them on Tokio's
//! blocking pool. A mutation holds the write gate across write, refetch and
//! publish: whatever a subscriber sees after a command returns already
//! contains that command's write.

use super::error::{Result, TimerError};
use super::filter::{filter_and_sort, FilterState};
use super::notification::Notification;
use super::scheduler::{ReminderScheduler, ScheduleOutcome};
use super::store::Store;
use super::task::Task;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tracing::info;

/// Observable task and reminder state plus the commands that change it.
pub struct TodoService {
    store: Arc<dyn Store>,
    scheduler: ReminderScheduler,
    tasks: watch::Sender<Vec<Task>>,
    notifications: watch::Sender<Vec<Notification>>,
    filter: watch::Sender<FilterState>,
    need_alarm_permission: watch::Sender<bool>,
    write_gate: Mutex<()>,
}

/// Runs a blocking closure on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

impl TodoService {
    /// Builds the service and loads both lists (reclaiming stale reminders first).
    pub async fn new(store: Arc<dyn Store>, scheduler: ReminderScheduler) -> Result<Self> {
        let service = TodoService {
            store,
            scheduler,
            tasks: watch::Sender::new(Vec::new()),
            notifications: watch::Sender::new(Vec::new()),
            filter: watch::Sender::new(FilterState::default()),
            need_alarm_permission: watch::Sender::new(false),
            write_gate: Mutex::new(()),
        };
        service.refresh().await?;
        Ok(service)
    }

    /// The scheduler every command goes through.
    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    /// All tasks, highest priority first, as of the last completed command.
    pub fn tasks(&self) -> watch::Receiver<Vec<Task>> {
        self.tasks.subscribe()
    }

    /// All remaining reminders, earliest first. Stale one-shots are already gone.
    pub fn notifications(&self) -> watch::Receiver<Vec<Notification>> {
        self.notifications.subscribe()
    }

    pub fn filter(&self) -> watch::Receiver<FilterState> {
        self.filter.subscribe()
    }

    /// Raised when a one-shot reminder could not be scheduled for lack of exact alarms.
    pub fn need_alarm_permission(&self) -> watch::Receiver<bool> {
        self.need_alarm_permission.subscribe()
    }

    /// One-shot point lookup straight from the store.
    pub async fn task(&self, task_id: i64) -> Result<Option<Task>> {
        let store = Arc::clone(&self.store);
        blocking(move || store.get_task(task_id)).await
    }

    /// The task with `task_id` every time the task list is published; `None` once it is gone.
    pub fn task_stream(&self, task_id: i64) -> impl Stream<Item = Option<Task>> {
        WatchStream::new(self.tasks.subscribe()).map(move |tasks| tasks.into_iter().find(|t| t.id == Some(task_id)))
    }

    /// Reloads both lists.
    pub async fn refresh(&self) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        self.refresh_notifications().await?;
        self.refresh_tasks().await
    }

    async fn refresh_tasks(&self) -> Result<()> {
        let store = Arc::clone(&self.store);
        let tasks = blocking(move || store.list_tasks()).await?;
        self.tasks.send_replace(tasks);
        Ok(())
    }

    /// Reclaims stale reminders, then publishes the remaining ones.
    async fn refresh_notifications(&self) -> Result<()> {
        let store = Arc::clone(&self.store);
        let scheduler = self.scheduler.clone();
        let notifications = blocking(move || {
            scheduler.reclaim_stale()?;
            store.list_notifications()
        })
        .await?;
        self.notifications.send_replace(notifications);
        Ok(())
    }

    /// Stores a new task and returns its id.
    pub async fn add_task(&self, task: Task) -> Result<i64> {
        let _gate = self.write_gate.lock().await;
        let store = Arc::clone(&self.store);
        let task_id = blocking(move || store.add_task(&task)).await?;
        info!(task_id, "task added");
        self.refresh_tasks().await?;
        Ok(task_id)
    }

    /// Saves name, description and priority of an existing task.
    pub async fn edit_task(&self, task: Task) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        let store = Arc::clone(&self.store);
        blocking(move || store.edit_task(&task)).await?;
        self.refresh_tasks().await
    }

    /// Deletes a task together with its reminders and their timers.
    ///
    /// Notifications go first so none outlives its task in the store.
    /// Returns the number of notifications removed.
    pub async fn delete_task(&self, task_id: i64) -> Result<usize> {
        let _gate = self.write_gate.lock().await;
        let store = Arc::clone(&self.store);
        let scheduler = self.scheduler.clone();
        let removed = blocking(move || {
            let dependents: Vec<Notification> = store
                .list_notifications()?
                .into_iter()
                .filter(|n| n.task_id == task_id)
                .collect();
            let removed = store.delete_notifications_by_task_id(task_id)?;
            scheduler.cancel_all(&dependents);
            store.delete_task(task_id)?;
            Ok(removed)
        })
        .await?;
        info!(task_id, notifications = removed, "task deleted");

        self.refresh_notifications().await?;
        self.refresh_tasks().await?;
        Ok(removed)
    }

    /// Persists a reminder and schedules it.
    ///
    /// `PermissionDenied` raises the need-alarm-permission flag; the reminder
    /// stays stored either way. A repeat interval that is not positive is
    /// rejected before anything is written. If scheduling fails after the
    /// row was written, the list is still republished before the error is
    /// returned.
    pub async fn add_notification(&self, notification: Notification) -> Result<(i64, ScheduleOutcome)> {
        if let Some(interval) = notification.repeat_interval.filter(|interval| *interval <= 0) {
            return Err(TimerError::InvalidInterval(interval).into());
        }

        let _gate = self.write_gate.lock().await;
        let store = Arc::clone(&self.store);
        let scheduler = self.scheduler.clone();
        let (notification_id, scheduled) = blocking(move || {
            let notification_id = store.add_notification(&notification)?;
            let persisted = Notification {
                id: Some(notification_id),
                ..notification
            };
            Ok((notification_id, scheduler.schedule(&persisted)))
        })
        .await?;

        self.refresh_notifications().await?;
        let outcome = scheduled?;
        if outcome == ScheduleOutcome::PermissionDenied {
            self.need_alarm_permission.send_replace(true);
        }
        Ok((notification_id, outcome))
    }

    /// Deletes one reminder and cancels its timer.
    pub async fn delete_notification(&self, notification: Notification) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        let store = Arc::clone(&self.store);
        let scheduler = self.scheduler.clone();
        blocking(move || {
            if let Some(notification_id) = notification.id {
                store.delete_notification(notification_id)?;
            }
            scheduler.cancel(&notification);
            Ok(())
        })
        .await?;
        self.refresh_notifications().await
    }

    /// Deletes every reminder and cancels the timers of a snapshot taken just before.
    pub async fn delete_all_notifications(&self) -> Result<usize> {
        let _gate = self.write_gate.lock().await;
        let store = Arc::clone(&self.store);
        let scheduler = self.scheduler.clone();
        let removed = blocking(move || {
            let snapshot = store.list_notifications()?;
            let removed = store.delete_all_notifications()?;
            scheduler.cancel_all(&snapshot);
            Ok(removed)
        })
        .await?;
        info!(count = removed, "all notifications deleted");

        self.refresh_notifications().await?;
        Ok(removed)
    }

    /// Records the filter selection and returns the current tasks filtered and sorted by it.
    pub fn apply_filter(&self, query: &str, priority: Option<i32>, sort: &str) -> Vec<Task> {
        self.filter.send_replace(FilterState {
            query: query.to_string(),
            priority,
            sort: sort.to_string(),
        });
        filter_and_sort(&self.tasks.borrow(), query, priority, sort)
    }

    /// Back to no query, no priority filter and `Date Ascending`.
    pub fn reset_filter(&self) {
        self.filter.send_replace(FilterState::default());
    }

    /// Current tasks under the current filter selection.
    pub fn visible_tasks(&self) -> Vec<Task> {
        self.filter.borrow().apply(&self.tasks.borrow())
    }

    /// Clears the permission flag once the user has been prompted.
    pub fn acknowledge_alarm_permission(&self) {
        self.need_alarm_permission.send_replace(false);
    }
}
