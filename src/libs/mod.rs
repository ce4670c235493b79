//! Core library modules.
//!
//! The reminder core is `store`, `timer`, `notifier`, `scheduler` and
//! `service`; the rest supports the command line front end.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use todo_reminders::db::store::SqliteStore;
//! use todo_reminders::libs::notifier::ConsoleNotifier;
//! use todo_reminders::libs::scheduler::ReminderScheduler;
//! use todo_reminders::libs::service::TodoService;
//! use todo_reminders::libs::task::Task;
//! use todo_reminders::libs::timer::TokioTimer;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = Arc::new(SqliteStore::open_default()?);
//! let timer = Arc::new(TokioTimer::new(true)?);
//! let scheduler = ReminderScheduler::new(store.clone(), timer, Arc::new(ConsoleNotifier::new(true)));
//! let service = TodoService::new(store, scheduler).await?;
//! service.add_task(Task::new("Buy milk", None, 5)).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data_storage;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod messages;
pub mod notification;
pub mod notifier;
pub mod scheduler;
pub mod service;
pub mod store;
pub mod task;
pub mod timer;
pub mod view;
