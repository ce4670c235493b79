use super::formatter::{format_repeat, format_timestamp};
use super::notification::Notification;
use super::task::Task;
use anyhow::Result;
use prettytable::{row, Table};
use std::collections::HashMap;

pub struct View {}

impl View {
    pub fn tasks(tasks: &[Task]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "DESCRIPTION", "PRIORITY", "CREATED"]);
        for task in tasks {
            table.add_row(row![
                task.id.unwrap_or(0),
                task.name,
                task.description_or_empty(),
                task.priority,
                format_timestamp(task.created_at)
            ]);
        }
        table.printstd();

        Ok(())
    }

    /// Reminders with the name of their task; `?` when the task is gone.
    pub fn notifications(notifications: &[Notification], tasks: &[Task]) -> Result<()> {
        let names: HashMap<i64, &str> = tasks
            .iter()
            .filter_map(|task| task.id.map(|id| (id, task.name.as_str())))
            .collect();
        let mut table = Table::new();

        table.add_row(row!["ID", "TASK", "TIME", "REPEAT"]);
        for notification in notifications {
            table.add_row(row![
                notification.id.unwrap_or(0),
                names.get(&notification.task_id).copied().unwrap_or("?"),
                format_timestamp(notification.reminder_time),
                format_repeat(notification.repeat_interval)
            ]);
        }
        table.printstd();

        Ok(())
    }
}
