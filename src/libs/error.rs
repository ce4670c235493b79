//! Error types for the reminder core.
//!
//! Three families of failure exist and they are handled very differently:
//!
//! - [`ReminderError`] is what store-backed operations return. Store failures
//!   have no recovery path and are always propagated to the caller.
//! - [`TimerError`] comes from the timer facility. `PermissionDenied` is
//!   recovered by the scheduler (the reminder stays persisted but unscheduled).
//! - [`NotifyError`] comes from the notifier at fire time and is only logged.

use thiserror::Error;

/// Errors produced by the store, the scheduler and the todo service.
#[derive(Debug, Error)]
pub enum ReminderError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),

    /// The data directory or configuration file could not be accessed.
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    /// No task with the given id exists in the store.
    #[error("Task not found: {id}")]
    TaskNotFound { id: i64 },

    /// The operation needs a store-assigned id but the record has none.
    #[error("Record has not been saved yet")]
    NotPersisted,

    /// A blocking store call running on the background pool panicked or was cancelled.
    #[error("Background operation failed: {0}")]
    Background(#[from] tokio::task::JoinError),

    /// The timer facility could not be reached at all.
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),
}

/// Errors returned by a [`crate::libs::timer::TimerFacility`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// The platform refuses precise one-time alarms for this application.
    #[error("Exact alarm scheduling is not permitted")]
    PermissionDenied,

    /// Repeating registrations need a positive period.
    #[error("Invalid repeat interval: {0} ms")]
    InvalidInterval(i64),

    /// No async runtime is available to drive the timers.
    #[error("Timer runtime unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by a [`crate::libs::notifier::Notifier`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// Displaying notifications has not been granted.
    #[error("Notification display permission not granted")]
    PermissionDenied,
}

pub type Result<T> = std::result::Result<T, ReminderError>;
