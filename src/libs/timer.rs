//! Timer facility: registers callbacks that fire at a wall-clock time.
//!
//! Registrations are keyed by notification id. Registering an id that is
//! already registered replaces the previous registration, so at most one
//! timer exists per id at any time.
//!
//! [`TokioTimer`] is the in-process implementation: every registration is a
//! task on the Tokio runtime that sleeps until its fire time. Registrations
//! live only as long as the process; after a restart they are rebuilt from
//! the notification table (see [`crate::libs::scheduler::ReminderScheduler::restore`]).

use super::error::TimerError;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Invoked by the timer facility when a registration fires.
pub type FireCallback = Arc<dyn Fn() + Send + Sync>;

pub trait TimerFacility: Send + Sync {
    /// Whether precise one-time alarms may be registered.
    fn can_schedule_exact_alarms(&self) -> bool;

    /// Fires `on_fire` once at `at_ms` (epoch milliseconds).
    fn register_one_shot(&self, id: i64, at_ms: i64, on_fire: FireCallback) -> Result<(), TimerError>;

    /// Fires `on_fire` every `interval_ms` starting at `first_ms`.
    fn register_repeating(&self, id: i64, first_ms: i64, interval_ms: i64, on_fire: FireCallback) -> Result<(), TimerError>;

    /// Drops the registration for `id`, if any. Unknown ids are ignored.
    fn cancel(&self, id: i64);

    fn is_registered(&self, id: i64) -> bool;

    /// Ids with a live registration, in ascending order.
    fn active_registrations(&self) -> Vec<i64>;
}

struct Registration {
    generation: u64,
    task: JoinHandle<()>,
}

type Registry = Arc<Mutex<HashMap<i64, Registration>>>;

/// [`TimerFacility`] driven by Tokio timers.
pub struct TokioTimer {
    handle: Handle,
    exact_alarms: AtomicBool,
    next_generation: AtomicU64,
    registrations: Registry,
}

impl TokioTimer {
    /// Binds to the runtime the caller is running on.
    pub fn new(exact_alarms: bool) -> Result<Self, TimerError> {
        let handle = Handle::try_current().map_err(|e| TimerError::Unavailable(e.to_string()))?;
        Ok(Self::with_handle(handle, exact_alarms))
    }

    pub fn with_handle(handle: Handle, exact_alarms: bool) -> Self {
        TokioTimer {
            handle,
            exact_alarms: AtomicBool::new(exact_alarms),
            next_generation: AtomicU64::new(1),
            registrations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Grants or revokes the exact alarm capability, e.g. after the user answered a prompt.
    pub fn set_exact_alarms_allowed(&self, allowed: bool) {
        self.exact_alarms.store(allowed, Ordering::SeqCst);
    }

    /// Aborts every registration.
    pub fn shutdown(&self) {
        for (_, registration) in self.registrations.lock().drain() {
            registration.task.abort();
        }
    }

    fn install(&self, id: i64, generation: u64, task: JoinHandle<()>) {
        let previous = self.registrations.lock().insert(id, Registration { generation, task });
        if let Some(previous) = previous {
            debug!(notification_id = id, "replacing existing timer registration");
            previous.task.abort();
        }
    }

    fn generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst)
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Longest delay or period handed to Tokio; `Instant + Duration` panics on overflow.
const MAX_DELAY: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

/// Time left until `at_ms`, zero when it already passed, capped at [`MAX_DELAY`].
fn delay_until(at_ms: i64, now_ms: i64) -> Duration {
    let millis = at_ms.saturating_sub(now_ms).max(0) as u64;
    Duration::from_millis(millis).min(MAX_DELAY)
}

/// First occurrence of `first_ms + k * interval_ms` (k >= 0) that is not in the past.
///
/// Saturates at `i64::MAX` when that occurrence is not representable.
pub fn next_occurrence(first_ms: i64, interval_ms: i64, now_ms: i64) -> i64 {
    if first_ms >= now_ms || interval_ms <= 0 {
        return first_ms;
    }
    let elapsed = i128::from(now_ms) - i128::from(first_ms);
    let interval = i128::from(interval_ms);
    let periods = (elapsed + interval - 1) / interval;
    i64::try_from(i128::from(first_ms) + periods * interval).unwrap_or(i64::MAX)
}

impl TimerFacility for TokioTimer {
    fn can_schedule_exact_alarms(&self) -> bool {
        self.exact_alarms.load(Ordering::SeqCst)
    }

    fn register_one_shot(&self, id: i64, at_ms: i64, on_fire: FireCallback) -> Result<(), TimerError> {
        if !self.can_schedule_exact_alarms() {
            return Err(TimerError::PermissionDenied);
        }

        let generation = self.generation();
        let delay = delay_until(at_ms, Utc::now().timestamp_millis());
        let registry = Arc::clone(&self.registrations);

        // Hold the lock while spawning so a zero-delay timer cannot look for
        // its entry before it has been inserted.
        let mut registrations = self.registrations.lock();
        let task = self.handle.spawn(async move {
            time::sleep(delay).await;
            {
                let mut registrations = registry.lock();
                match registrations.get(&id) {
                    Some(current) if current.generation == generation => {
                        registrations.remove(&id);
                    }
                    _ => return,
                }
            }
            on_fire();
        });
        if let Some(previous) = registrations.insert(id, Registration { generation, task }) {
            debug!(notification_id = id, "replacing existing timer registration");
            previous.task.abort();
        }

        debug!(notification_id = id, delay_ms = delay.as_millis() as u64, "one-shot timer registered");
        Ok(())
    }

    fn register_repeating(&self, id: i64, first_ms: i64, interval_ms: i64, on_fire: FireCallback) -> Result<(), TimerError> {
        if interval_ms <= 0 {
            return Err(TimerError::InvalidInterval(interval_ms));
        }

        let now_ms = Utc::now().timestamp_millis();
        let delay = delay_until(next_occurrence(first_ms, interval_ms, now_ms), now_ms);
        let period = Duration::from_millis(interval_ms as u64).min(MAX_DELAY);

        let task = self.handle.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + delay, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                on_fire();
            }
        });
        self.install(id, self.generation(), task);

        debug!(notification_id = id, delay_ms = delay.as_millis() as u64, interval_ms, "repeating timer registered");
        Ok(())
    }

    fn cancel(&self, id: i64) {
        if let Some(registration) = self.registrations.lock().remove(&id) {
            registration.task.abort();
            debug!(notification_id = id, "timer cancelled");
        }
    }

    fn is_registered(&self, id: i64) -> bool {
        self.registrations.lock().contains_key(&id)
    }

    fn active_registrations(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.registrations.lock().keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, FireCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&count);
        let on_fire: FireCallback = Arc::new(move || {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        (count, on_fire)
    }

    #[test]
    fn next_occurrence_skips_missed_periods() {
        assert_eq!(next_occurrence(1_000, 100, 500), 1_000);
        assert_eq!(next_occurrence(1_000, 100, 1_000), 1_000);
        assert_eq!(next_occurrence(1_000, 100, 1_001), 1_100);
        assert_eq!(next_occurrence(1_000, 100, 1_250), 1_300);
    }

    #[test]
    fn next_occurrence_saturates_instead_of_overflowing() {
        assert_eq!(next_occurrence(i64::MIN, i64::MAX, i64::MAX), i64::MAX);
        assert_eq!(next_occurrence(i64::MAX - 10, i64::MAX, i64::MAX), i64::MAX);
        assert_eq!(next_occurrence(0, 3, i64::MAX), i64::MAX);
        assert_eq!(next_occurrence(-10, 7, 5), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn far_future_registrations_do_not_panic() {
        let timer = TokioTimer::new(true).unwrap();
        let (count, on_fire) = counter();

        timer.register_one_shot(1, i64::MAX, Arc::clone(&on_fire)).unwrap();
        timer.register_repeating(2, i64::MIN, i64::MAX, Arc::clone(&on_fire)).unwrap();
        timer.register_repeating(3, i64::MAX, i64::MAX, on_fire).unwrap();
        time::sleep(Duration::from_secs(60)).await;

        assert_eq!(timer.active_registrations(), vec![1, 2, 3]);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn one_shot_fires_once_and_unregisters() {
        let timer = TokioTimer::new(true).unwrap();
        let (count, on_fire) = counter();
        let at = Utc::now().timestamp_millis() + 60_000;

        timer.register_one_shot(7, at, on_fire).unwrap();
        assert!(timer.is_registered(7));

        time::sleep(Duration::from_secs(61)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!timer.is_registered(7));
    }

    #[tokio::test(start_paused = true)]
    async fn registering_same_id_replaces_previous() {
        let timer = TokioTimer::new(true).unwrap();
        let (count, on_fire) = counter();
        let at = Utc::now().timestamp_millis() + 1_000;

        timer.register_one_shot(1, at, Arc::clone(&on_fire)).unwrap();
        timer.register_one_shot(1, at, on_fire).unwrap();
        assert_eq!(timer.active_registrations(), vec![1]);

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn repeating_fires_every_interval_until_cancelled() {
        let timer = TokioTimer::new(true).unwrap();
        let (count, on_fire) = counter();
        let first = Utc::now().timestamp_millis() + 1_000;

        timer.register_repeating(3, first, 10_000, on_fire).unwrap();
        time::sleep(Duration::from_millis(21_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        timer.cancel(3);
        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(timer.active_registrations().is_empty());
    }

    #[tokio::test]
    async fn one_shot_refused_without_exact_alarms() {
        let timer = TokioTimer::new(false).unwrap();
        let (_, on_fire) = counter();

        assert_eq!(timer.register_one_shot(1, 0, on_fire), Err(TimerError::PermissionDenied));
        assert!(!timer.is_registered(1));
    }

    #[tokio::test]
    async fn cancel_unknown_id_is_noop() {
        let timer = TokioTimer::new(true).unwrap();
        timer.cancel(404);
        assert!(timer.active_registrations().is_empty());
    }

    #[test]
    fn new_outside_runtime_is_unavailable() {
        assert!(matches!(TokioTimer::new(true), Err(TimerError::Unavailable(_))));
    }
}
