//! # todo-reminders
//!
//! A to-do list with timed reminders. Tasks and their reminders are kept in
//! SQLite; reminders become timers that show "Task Reminder" with the task
//! name when they fire. One-time reminders need exact-alarm permission,
//! repeating ones do not.
//!
//! ```rust,no_run
//! use todo_reminders::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
