//! Reminder scheduling.
//!
//! # Overview
//!
//! [`ReminderScheduler`] maps persisted [`Notification`]s onto registrations
//! in a [`TimerFacility`]. The set of live registrations is derived from the
//! notification table: [`ReminderScheduler::restore`] rebuilds it from
//! scratch and [`ReminderScheduler::sync`] brings it back in line after other
//! processes changed the table. The scheduler only remembers the last row it
//! scheduled per id, so `sync` can tell new and edited rows from known ones.
//!
//! | Reminder  | Registration                              | Needs exact alarms |
//! |-----------|-------------------------------------------|--------------------|
//! | One-shot  | Single fire at `reminder_time`            | yes                |
//! | Repeating | Every `repeat_interval` from `reminder_time` | no              |
//!
//! A one-shot reminder that could not be registered (permission denied, task
//! missing, process not running at fire time) stays in the table until its
//! time has passed, and is then removed by [`ReminderScheduler::reclaim_stale`].
//!
//! Two failure modes are silent towards the caller but published as
//! [`SchedulerEvent`]s: a task that no longer resolves when scheduling
//! ([`SchedulerEvent::TaskUnresolved`]) and a display refused at fire time
//! ([`SchedulerEvent::DisplayDenied`]).

use super::error::{ReminderError, Result, TimerError};
use super::notification::Notification;
use super::notifier::{Notifier, REMINDER_TITLE};
use super::store::Store;
use super::timer::{FireCallback, TimerFacility};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 64;

/// Result of [`ReminderScheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// A timer registration now exists for the notification.
    Scheduled,
    /// Exact alarms are not allowed; the notification stays persisted but unscheduled.
    PermissionDenied,
    /// The task could not be resolved; nothing was scheduled.
    TaskUnresolved,
}

/// Everything the scheduler did, for observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerEvent {
    Scheduled { notification_id: i64, repeating: bool },
    PermissionDenied { notification_id: i64 },
    TaskUnresolved { notification_id: i64, task_id: i64 },
    Cancelled { notification_id: i64 },
    Reclaimed { notification_id: i64 },
    Fired { notification_id: i64, task_name: String },
    DisplayDenied { notification_id: i64 },
}

/// Counts from [`ReminderScheduler::sync`] and [`ReminderScheduler::restore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Stale one-shot reminders deleted from the store.
    pub reclaimed: Vec<i64>,
    /// Registrations dropped because their row no longer exists.
    pub cancelled: Vec<i64>,
    pub scheduled: usize,
    pub permission_denied: usize,
    pub unresolved: usize,
}

impl SyncSummary {
    /// Whether the pass changed anything.
    pub fn is_empty(&self) -> bool {
        self.reclaimed.is_empty()
            && self.cancelled.is_empty()
            && self.scheduled == 0
            && self.permission_denied == 0
            && self.unresolved == 0
    }
}

/// Last row handed to [`ReminderScheduler::schedule`] for an id. `outcome` is
/// `None` when the timer rejected the row.
#[derive(Debug, Clone)]
struct Known {
    notification: Notification,
    outcome: Option<ScheduleOutcome>,
}

#[derive(Debug, Default)]
struct SyncState {
    known: HashMap<i64, Known>,
    last_sync_ms: Option<i64>,
}

/// Maps notification rows to timer registrations.
///
/// Cloning is cheap; clones share the collaborators, the event channel and
/// the sync state.
#[derive(Clone)]
pub struct ReminderScheduler {
    store: Arc<dyn Store>,
    timer: Arc<dyn TimerFacility>,
    notifier: Arc<dyn Notifier>,
    events: broadcast::Sender<SchedulerEvent>,
    state: Arc<Mutex<SyncState>>,
}

impl ReminderScheduler {
    pub fn new(store: Arc<dyn Store>, timer: Arc<dyn TimerFacility>, notifier: Arc<dyn Notifier>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        ReminderScheduler {
            store,
            timer,
            notifier,
            events,
            state: Arc::new(Mutex::new(SyncState::default())),
        }
    }

    /// A receiver for every [`SchedulerEvent`] published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SchedulerEvent> {
        self.events.subscribe()
    }

    pub fn timer(&self) -> &Arc<dyn TimerFacility> {
        &self.timer
    }

    fn remember(&self, notification_id: i64, notification: &Notification, outcome: Option<ScheduleOutcome>) {
        self.state.lock().known.insert(
            notification_id,
            Known {
                notification: notification.clone(),
                outcome,
            },
        );
    }

    fn forget(&self, notification_id: i64) {
        self.state.lock().known.remove(&notification_id);
    }

    fn emit(&self, event: SchedulerEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Registers a timer for a persisted notification.
    ///
    /// The task name is resolved now and captured for the fire callback. If
    /// the task does not resolve, nothing is scheduled and no error is
    /// returned. Scheduling the same id again replaces the previous timer.
    pub fn schedule(&self, notification: &Notification) -> Result<ScheduleOutcome> {
        let notification_id = notification.id.ok_or(ReminderError::NotPersisted)?;

        let task_name = match self.store.get_task(notification.task_id)? {
            Some(task) => task.name,
            None => {
                warn!(notification_id, task_id = notification.task_id, "task not found, reminder left unscheduled");
                self.emit(SchedulerEvent::TaskUnresolved {
                    notification_id,
                    task_id: notification.task_id,
                });
                self.remember(notification_id, notification, Some(ScheduleOutcome::TaskUnresolved));
                return Ok(ScheduleOutcome::TaskUnresolved);
            }
        };

        let on_fire = self.fire_callback(notification_id, task_name);
        let registered = match notification.repeat_interval {
            Some(interval) => self
                .timer
                .register_repeating(notification_id, notification.reminder_time, interval, on_fire),
            None if !self.timer.can_schedule_exact_alarms() => Err(TimerError::PermissionDenied),
            None => self.timer.register_one_shot(notification_id, notification.reminder_time, on_fire),
        };

        let outcome = match registered {
            Ok(()) => {
                info!(notification_id, repeating = notification.is_repeating(), "reminder scheduled");
                self.emit(SchedulerEvent::Scheduled {
                    notification_id,
                    repeating: notification.is_repeating(),
                });
                ScheduleOutcome::Scheduled
            }
            Err(TimerError::PermissionDenied) => {
                warn!(notification_id, "exact alarm permission denied, reminder left unscheduled");
                self.emit(SchedulerEvent::PermissionDenied { notification_id });
                ScheduleOutcome::PermissionDenied
            }
            Err(e) => {
                self.remember(notification_id, notification, None);
                return Err(e.into());
            }
        };
        self.remember(notification_id, notification, Some(outcome));
        Ok(outcome)
    }

    fn fire_callback(&self, notification_id: i64, task_name: String) -> FireCallback {
        let notifier = Arc::clone(&self.notifier);
        let events = self.events.clone();
        Arc::new(move || fire_reminder(notifier.as_ref(), &events, notification_id, &task_name))
    }

    /// Removes the timer for `notification`. Safe when nothing is registered.
    pub fn cancel(&self, notification: &Notification) {
        let Some(notification_id) = notification.id else {
            return;
        };
        self.timer.cancel(notification_id);
        self.forget(notification_id);
        debug!(notification_id, "reminder cancelled");
        self.emit(SchedulerEvent::Cancelled { notification_id });
    }

    /// Cancels every notification of a snapshot. Best effort: the snapshot may
    /// be out of date relative to the store.
    pub fn cancel_all(&self, notifications: &[Notification]) {
        for notification in notifications {
            self.cancel(notification);
        }
    }

    /// Deletes and cancels every one-shot reminder whose time has passed.
    pub fn reclaim_stale(&self) -> Result<Vec<i64>> {
        self.reclaim_stale_at(Utc::now().timestamp_millis())
    }

    /// [`Self::reclaim_stale`] against an explicit clock reading.
    ///
    /// Both the delete and the cancel are attempted for every candidate; a
    /// failed delete is logged and the sweep moves on. Returns the ids that
    /// were deleted from the store.
    pub fn reclaim_stale_at(&self, now_ms: i64) -> Result<Vec<i64>> {
        let stale: Vec<Notification> = self
            .store
            .list_notifications()?
            .into_iter()
            .filter(|n| n.is_stale_at(now_ms))
            .collect();
        Ok(self.reclaim(&stale))
    }

    fn reclaim(&self, stale: &[Notification]) -> Vec<i64> {
        let mut purged = Vec::with_capacity(stale.len());
        for notification in stale {
            let Some(notification_id) = notification.id else {
                continue;
            };
            match self.store.delete_notification(notification_id) {
                Ok(_) => {
                    purged.push(notification_id);
                    self.emit(SchedulerEvent::Reclaimed { notification_id });
                }
                Err(e) => warn!(notification_id, "failed to delete stale reminder: {e}"),
            }
            self.timer.cancel(notification_id);
            self.forget(notification_id);
        }

        if !purged.is_empty() {
            info!(count = purged.len(), "stale reminders reclaimed");
        }
        purged
    }

    /// Rebuilds timer registrations from the store after a process start.
    ///
    /// Every stale one-shot reminder is reclaimed and every remaining row is
    /// scheduled, whatever this scheduler knew before.
    pub fn restore(&self) -> Result<SyncSummary> {
        *self.state.lock() = SyncState::default();
        let summary = self.sync()?;
        info!(
            scheduled = summary.scheduled,
            reclaimed = summary.reclaimed.len(),
            permission_denied = summary.permission_denied,
            unresolved = summary.unresolved,
            "reminders restored"
        );
        Ok(summary)
    }

    /// Brings the timer registrations in line with the notification table.
    pub fn sync(&self) -> Result<SyncSummary> {
        self.sync_at(Utc::now().timestamp_millis())
    }

    /// [`Self::sync`] against an explicit clock reading.
    ///
    /// The table may have been changed by another process since the last
    /// pass. In order:
    ///
    /// 1. Registrations whose row is gone are cancelled.
    /// 2. Stale one-shot reminders are reclaimed, except rows this scheduler
    ///    has never seen that came due after the previous pass: those were
    ///    added in between and are scheduled, which fires them right away.
    /// 3. Rows that are new, or differ from what was last scheduled for their
    ///    id, are scheduled. A row refused for lack of exact alarms is retried
    ///    once the timer allows them.
    ///
    /// Rows whose timer rejected them are logged and skipped until they change.
    pub fn sync_at(&self, now_ms: i64) -> Result<SyncSummary> {
        let previous_sync_ms = self.state.lock().last_sync_ms.replace(now_ms);
        let rows = self.store.list_notifications()?;
        let live: HashSet<i64> = rows.iter().filter_map(|n| n.id).collect();
        let mut summary = SyncSummary::default();

        for notification_id in self.timer.active_registrations() {
            if !live.contains(&notification_id) {
                self.timer.cancel(notification_id);
                self.emit(SchedulerEvent::Cancelled { notification_id });
                summary.cancelled.push(notification_id);
            }
        }
        self.state.lock().known.retain(|id, _| live.contains(id));

        let (stale, current): (Vec<Notification>, Vec<Notification>) = rows
            .into_iter()
            .partition(|n| n.is_stale_at(now_ms) && !self.came_due_unseen(n, previous_sync_ms));
        summary.reclaimed = self.reclaim(&stale);

        let exact_alarms = self.timer.can_schedule_exact_alarms();
        for notification in current.iter().filter(|n| self.needs_scheduling(n, exact_alarms)) {
            match self.schedule(notification) {
                Ok(ScheduleOutcome::Scheduled) => summary.scheduled += 1,
                Ok(ScheduleOutcome::PermissionDenied) => summary.permission_denied += 1,
                Ok(ScheduleOutcome::TaskUnresolved) => summary.unresolved += 1,
                // One bad row must not keep the others from being scheduled.
                Err(ReminderError::Timer(e)) => warn!(notification_id = ?notification.id, "reminder not scheduled: {e}"),
                Err(e) => return Err(e),
            }
        }

        if !summary.is_empty() {
            debug!(
                scheduled = summary.scheduled,
                cancelled = summary.cancelled.len(),
                reclaimed = summary.reclaimed.len(),
                "reminders synced"
            );
        }
        Ok(summary)
    }

    fn came_due_unseen(&self, notification: &Notification, previous_sync_ms: Option<i64>) -> bool {
        let Some(since) = previous_sync_ms else {
            return false;
        };
        let seen = notification
            .id
            .is_some_and(|id| self.state.lock().known.contains_key(&id));
        !seen && notification.reminder_time >= since
    }

    fn needs_scheduling(&self, notification: &Notification, exact_alarms: bool) -> bool {
        let Some(notification_id) = notification.id else {
            return false;
        };
        match self.state.lock().known.get(&notification_id) {
            None => true,
            Some(known) if known.notification != *notification => true,
            Some(known) => exact_alarms && known.outcome == Some(ScheduleOutcome::PermissionDenied),
        }
    }
}

/// Fire-time action: shows "Task Reminder" with the captured task name.
///
/// A refused display is logged and dropped. There is no retry.
pub fn fire_reminder(notifier: &dyn Notifier, events: &broadcast::Sender<SchedulerEvent>, notification_id: i64, task_name: &str) {
    match notifier.show(REMINDER_TITLE, task_name) {
        Ok(()) => {
            info!(notification_id, "reminder delivered");
            let _ = events.send(SchedulerEvent::Fired {
                notification_id,
                task_name: task_name.to_string(),
            });
        }
        Err(e) => {
            warn!(notification_id, "reminder not displayed: {e}");
            let _ = events.send(SchedulerEvent::DisplayDenied { notification_id });
        }
    }
}
