//! Text for every [`Message`].
//!
//! All user-facing wording lives in the single match below, so a message
//! reads the same wherever it is printed.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated(id) => format!("Task #{} created.", id),
            Message::TaskUpdated(id) => format!("Task #{} updated.", id),
            Message::TaskDeleted { id, notifications } => match notifications {
                0 => format!("Task #{} deleted.", id),
                n => format!("Task #{} deleted together with {} reminder(s).", id, n),
            },
            Message::TaskNotFound(id) => format!("Task with ID {} not found.", id),
            Message::TasksNotFound => "No tasks yet.".to_string(),
            Message::TasksHeader => "Tasks:".to_string(),
            Message::TasksMatchingHeader(summary) => format!("Tasks ({}):", summary),
            Message::ConfirmDeleteTask(name) => format!("Delete task '{}' and all of its reminders?", name),
            Message::EditingTask(name) => format!("Editing task: {}", name),
            Message::PromptTaskName => "Task name".to_string(),
            Message::PromptTaskDescription => "Description (optional)".to_string(),
            Message::PromptTaskPriority => "Priority (1-10)".to_string(),
            Message::TaskPriorityRange => "Priority must be between 1 and 10".to_string(),
            Message::TaskNameEmpty => "Task name cannot be empty".to_string(),
            Message::SelectTask => "Select a task".to_string(),
            Message::InvalidSortOption(option) => format!("Unknown sort option '{}'. Showing tasks unsorted.", option),

            // === NOTIFICATION MESSAGES ===
            Message::ReminderScheduled(id, time) => format!("Reminder #{} scheduled for {}.", id, time),
            Message::ReminderSavedUnscheduled(id) => format!("Reminder #{} saved but not scheduled.", id),
            Message::ReminderTaskUnresolved(id) => format!("Reminder #{} saved, but its task could not be found. It will not fire.", id),
            Message::ReminderInPast(time) => format!("{} is already in the past; a one-time reminder would be discarded.", time),
            Message::NotificationDeleted(id) => format!("Reminder #{} deleted.", id),
            Message::NotificationNotFound(id) => format!("Reminder with ID {} not found.", id),
            Message::NotificationsDeleted(count) => format!("Deleted {} reminder(s).", count),
            Message::NotificationsNotFound => "No reminders scheduled.".to_string(),
            Message::NotificationsHeader => "Reminders:".to_string(),
            Message::NoTasksForReminder => "Create a task first; reminders are attached to tasks.".to_string(),
            Message::ConfirmDeleteNotification(id) => format!("Delete reminder #{}?", id),
            Message::ConfirmDeleteAllNotifications(count) => format!("Delete ALL {} reminder(s)?", count),
            Message::PromptReminderTime => "Reminder time (YYYY-MM-DD HH:MM)".to_string(),
            Message::PromptRepeatMinutes => "Repeat every N minutes (0 for a one-time reminder)".to_string(),
            Message::InvalidReminderTime(input) => format!("Invalid reminder time '{}'. Expected YYYY-MM-DD HH:MM.", input),
            Message::InvalidRepeatInterval => "Repeat interval must be a positive number of minutes".to_string(),
            Message::ExactAlarmPermissionNeeded => {
                "Exact alarms are disabled, so one-time reminders cannot be scheduled. Enable them with `todo init`.".to_string()
            }

            // === REMINDER DELIVERY ===
            Message::ReminderDisplay { title, body } => format!("🔔 {}: {}", title, body),
            Message::ReminderDisplayDenied(id) => format!("Reminder #{} fired but notifications are disabled.", id),

            // === WATCHER MESSAGES ===
            Message::WatcherStarted { scheduled, reclaimed } => match reclaimed {
                0 => format!("Watching {} reminder(s). Press Ctrl-C to stop.", scheduled),
                r => format!("Watching {} reminder(s), {} stale reminder(s) removed. Press Ctrl-C to stop.", scheduled, r),
            },
            Message::WatcherUnresolvedReminders(count) => format!("{} reminder(s) reference a missing task and were skipped.", count),
            Message::WatcherReceivedSigterm => "Received SIGTERM, shutting down.".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT, shutting down.".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl-C, shutting down.".to_string(),
            Message::WatcherCtrlCListenFailed(error) => format!("Failed to listen for Ctrl-C: {}", error),
            Message::WatcherSignalHandlingNotSupported => "Signal handling is not supported on this platform.".to_string(),
            Message::WatcherStopped => "Reminder watcher stopped.".to_string(),
            Message::StaleRemindersReclaimed(count) => format!("Removed {} stale reminder(s).", count),
            Message::RemindersSynced { scheduled, cancelled } => {
                format!("Picked up database changes: {} reminder(s) scheduled, {} cancelled.", scheduled, cancelled)
            }

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved.".to_string(),
            Message::ConfigParseError(error) => format!("Failed to parse configuration: {}", error),
            Message::PromptExactAlarms => "Allow exact one-time alarms?".to_string(),
            Message::PromptNotificationsEnabled => "Allow reminder notifications to be displayed?".to_string(),
            Message::PromptDefaultSort => "Default task sort order".to_string(),
            Message::ExactAlarmsEnabled => "Exact alarms enabled.".to_string(),

            // === DATABASE MESSAGES ===
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),

            // === GENERIC ===
            Message::OperationCancelled => "Operation cancelled.".to_string(),
        };
        write!(f, "{}", text)
    }
}
