//! Display of reminder messages.

use super::error::NotifyError;
use super::messages::Message;
use crate::msg_print;
use std::sync::atomic::{AtomicBool, Ordering};

/// Title of every reminder message.
pub const REMINDER_TITLE: &str = "Task Reminder";

pub trait Notifier: Send + Sync {
    /// Shows a message now. Fails with `PermissionDenied` when display is not granted.
    fn show(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Prints reminders to the terminal.
pub struct ConsoleNotifier {
    permitted: AtomicBool,
}

impl ConsoleNotifier {
    pub fn new(permitted: bool) -> Self {
        ConsoleNotifier {
            permitted: AtomicBool::new(permitted),
        }
    }

    pub fn set_permitted(&self, permitted: bool) {
        self.permitted.store(permitted, Ordering::SeqCst);
    }
}

impl Notifier for ConsoleNotifier {
    fn show(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        if !self.permitted.load(Ordering::SeqCst) {
            return Err(NotifyError::PermissionDenied);
        }

        msg_print!(
            Message::ReminderDisplay {
                title: title.to_string(),
                body: body.to_string(),
            },
            true
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denied_until_permitted() {
        let notifier = ConsoleNotifier::new(false);
        assert_eq!(notifier.show(REMINDER_TITLE, "Buy milk"), Err(NotifyError::PermissionDenied));

        notifier.set_permitted(true);
        assert_eq!(notifier.show(REMINDER_TITLE, "Buy milk"), Ok(()));
    }
}
