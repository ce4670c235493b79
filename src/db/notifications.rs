use crate::libs::error::{ReminderError, Result};
use crate::libs::notification::Notification;
use rusqlite::{params, Connection, Row};

const INSERT_NOTIFICATION: &str =
    "INSERT OR REPLACE INTO notifications (id, task_id, reminder_time, repeat_interval) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_NOTIFICATION: &str = "UPDATE notifications SET task_id = ?2, reminder_time = ?3, repeat_interval = ?4 WHERE id = ?1";
const DELETE_NOTIFICATION: &str = "DELETE FROM notifications WHERE id = ?1";
const DELETE_BY_TASK_ID: &str = "DELETE FROM notifications WHERE task_id = ?1";
const DELETE_ALL: &str = "DELETE FROM notifications";
const SELECT_NOTIFICATIONS: &str =
    "SELECT id, task_id, reminder_time, repeat_interval FROM notifications ORDER BY reminder_time ASC, id ASC";

/// Notification table operations over a borrowed connection.
pub struct Notifications<'a> {
    conn: &'a Connection,
}

impl<'a> Notifications<'a> {
    /// Wraps a connection whose schema is already migrated.
    pub fn new(conn: &'a Connection) -> Self {
        Notifications { conn }
    }

    /// Inserts or replaces by id. A `None` id lets SQLite assign one.
    pub fn insert(&self, notification: &Notification) -> Result<i64> {
        self.conn.execute(
            INSERT_NOTIFICATION,
            params![
                notification.id,
                notification.task_id,
                notification.reminder_time,
                notification.repeat_interval
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Rewrites the row with the notification's id. A missing row is not an error.
    pub fn update(&self, notification: &Notification) -> Result<()> {
        let id = notification.id.ok_or(ReminderError::NotPersisted)?;
        self.conn.execute(
            UPDATE_NOTIFICATION,
            params![id, notification.task_id, notification.reminder_time, notification.repeat_interval],
        )?;

        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<usize> {
        Ok(self.conn.execute(DELETE_NOTIFICATION, params![id])?)
    }

    /// Deletes every reminder of a task and returns how many there were.
    pub fn delete_by_task_id(&self, task_id: i64) -> Result<usize> {
        Ok(self.conn.execute(DELETE_BY_TASK_ID, params![task_id])?)
    }

    pub fn delete_all(&self) -> Result<usize> {
        Ok(self.conn.execute(DELETE_ALL, [])?)
    }

    /// All reminders, earliest first.
    pub fn fetch(&self) -> Result<Vec<Notification>> {
        let mut stmt = self.conn.prepare(SELECT_NOTIFICATIONS)?;
        let notifications = stmt.query_map([], Self::from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notifications)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Notification> {
        Ok(Notification {
            id: Some(row.get(0)?),
            task_id: row.get(1)?,
            reminder_time: row.get(2)?,
            repeat_interval: row.get(3)?,
        })
    }
}
