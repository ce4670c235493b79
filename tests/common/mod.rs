#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use todo_reminders::db::store::SqliteStore;
use todo_reminders::libs::error::{NotifyError, TimerError};
use todo_reminders::libs::notifier::Notifier;
use todo_reminders::libs::scheduler::ReminderScheduler;
use todo_reminders::libs::timer::{FireCallback, TimerFacility};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCall {
    OneShot { id: i64, at_ms: i64 },
    Repeating { id: i64, first_ms: i64, interval_ms: i64 },
    Cancel { id: i64 },
}

/// Timer that records calls and fires only when told to.
pub struct RecordingTimer {
    exact_alarms: AtomicBool,
    calls: Mutex<Vec<TimerCall>>,
    live: Mutex<HashMap<i64, FireCallback>>,
    fail_next: Mutex<Option<TimerError>>,
}

impl RecordingTimer {
    pub fn new(exact_alarms: bool) -> Self {
        RecordingTimer {
            exact_alarms: AtomicBool::new(exact_alarms),
            calls: Mutex::new(Vec::new()),
            live: Mutex::new(HashMap::new()),
            fail_next: Mutex::new(None),
        }
    }

    /// Makes the next registration fail with `error`.
    pub fn fail_next(&self, error: TimerError) {
        *self.fail_next.lock() = Some(error);
    }

    pub fn set_exact_alarms(&self, allowed: bool) {
        self.exact_alarms.store(allowed, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<TimerCall> {
        self.calls.lock().clone()
    }

    pub fn cancels_of(&self, id: i64) -> usize {
        self.calls().iter().filter(|c| **c == TimerCall::Cancel { id }).count()
    }

    /// Runs the callback registered for `id`, as if its time had come.
    pub fn fire(&self, id: i64) -> bool {
        let callback = self.live.lock().get(&id).cloned();
        match callback {
            Some(on_fire) => {
                on_fire();
                true
            }
            None => false,
        }
    }
}

impl TimerFacility for RecordingTimer {
    fn can_schedule_exact_alarms(&self) -> bool {
        self.exact_alarms.load(Ordering::SeqCst)
    }

    fn register_one_shot(&self, id: i64, at_ms: i64, on_fire: FireCallback) -> Result<(), TimerError> {
        if let Some(error) = self.fail_next.lock().take() {
            return Err(error);
        }
        if !self.can_schedule_exact_alarms() {
            return Err(TimerError::PermissionDenied);
        }
        self.calls.lock().push(TimerCall::OneShot { id, at_ms });
        self.live.lock().insert(id, on_fire);
        Ok(())
    }

    fn register_repeating(&self, id: i64, first_ms: i64, interval_ms: i64, on_fire: FireCallback) -> Result<(), TimerError> {
        if let Some(error) = self.fail_next.lock().take() {
            return Err(error);
        }
        if interval_ms <= 0 {
            return Err(TimerError::InvalidInterval(interval_ms));
        }
        self.calls.lock().push(TimerCall::Repeating {
            id,
            first_ms,
            interval_ms,
        });
        self.live.lock().insert(id, on_fire);
        Ok(())
    }

    fn cancel(&self, id: i64) {
        self.calls.lock().push(TimerCall::Cancel { id });
        self.live.lock().remove(&id);
    }

    fn is_registered(&self, id: i64) -> bool {
        self.live.lock().contains_key(&id)
    }

    fn active_registrations(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.live.lock().keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

/// Notifier that keeps what it was asked to show.
pub struct RecordingNotifier {
    permitted: AtomicBool,
    shown: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new(permitted: bool) -> Self {
        RecordingNotifier {
            permitted: AtomicBool::new(permitted),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        if !self.permitted.load(Ordering::SeqCst) {
            return Err(NotifyError::PermissionDenied);
        }
        self.shown.lock().push((title.to_string(), body.to_string()));
        Ok(())
    }
}

pub struct Harness {
    pub store: Arc<SqliteStore>,
    pub timer: Arc<RecordingTimer>,
    pub notifier: Arc<RecordingNotifier>,
    pub scheduler: ReminderScheduler,
}

pub fn harness(exact_alarms: bool) -> Harness {
    build(SqliteStore::open_in_memory().unwrap(), exact_alarms)
}

/// A harness over a database file, so several harnesses can share one database
/// the way separate `todo` processes do.
pub fn file_harness(path: &Path, exact_alarms: bool) -> Harness {
    build(SqliteStore::open(path).unwrap(), exact_alarms)
}

fn build(store: SqliteStore, exact_alarms: bool) -> Harness {
    let store = Arc::new(store);
    let timer = Arc::new(RecordingTimer::new(exact_alarms));
    let notifier = Arc::new(RecordingNotifier::new(true));
    let scheduler = ReminderScheduler::new(store.clone(), timer.clone(), notifier.clone());
    Harness {
        store,
        timer,
        notifier,
        scheduler,
    }
}

pub const MINUTE: i64 = 60_000;
