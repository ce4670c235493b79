pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;

pub fn success(msg: Message) -> String {
    format!("✅ {}", msg)
}

pub fn error(msg: Message) -> String {
    format!("❌ {}", msg)
}

pub fn warning(msg: Message) -> String {
    format!("⚠️  {}", msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes() {
        assert_eq!(success(Message::TaskCreated(3)), "✅ Task #3 created.");
        assert_eq!(error(Message::TaskNotFound(9)), "❌ Task with ID 9 not found.");
        assert!(warning(Message::ExactAlarmPermissionNeeded).starts_with("⚠️  Exact alarms"));
    }

    #[test]
    fn task_deleted_mentions_reminders_only_when_there_were_some() {
        assert_eq!(Message::TaskDeleted { id: 1, notifications: 0 }.to_string(), "Task #1 deleted.");
        assert_eq!(
            Message::TaskDeleted { id: 1, notifications: 2 }.to_string(),
            "Task #1 deleted together with 2 reminder(s)."
        );
    }

    #[test]
    fn reminder_display_shows_title_and_task_name() {
        let msg = Message::ReminderDisplay {
            title: "Task Reminder".to_string(),
            body: "Buy milk".to_string(),
        };
        assert_eq!(msg.to_string(), "🔔 Task Reminder: Buy milk");
    }
}
