use super::db::Db;
use super::notifications::Notifications;
use super::tasks::Tasks;
use crate::libs::error::Result;
use crate::libs::notification::Notification;
use crate::libs::store::Store;
use crate::libs::task::Task;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

/// [`Store`] backed by a single SQLite connection.
///
/// Calls are serialized on the connection mutex. Several stores, in this
/// process or in others, may open the same file; SQLite's locking and the
/// busy timeout set by [`Db`] arbitrate between them.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens the database file in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    /// Opens (creating and migrating if needed) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_db(Db::open(path)?))
    }

    /// A private, migrated in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_db(Db::open_in_memory()?))
    }

    fn from_db(db: Db) -> Self {
        SqliteStore { conn: Mutex::new(db.conn) }
    }
}

impl Store for SqliteStore {
    fn add_task(&self, task: &Task) -> Result<i64> {
        Tasks::new(&self.conn.lock()).insert(task)
    }

    fn edit_task(&self, task: &Task) -> Result<()> {
        Tasks::new(&self.conn.lock()).update(task)
    }

    fn delete_task(&self, task_id: i64) -> Result<usize> {
        Tasks::new(&self.conn.lock()).delete(task_id)
    }

    fn list_tasks(&self) -> Result<Vec<Task>> {
        Tasks::new(&self.conn.lock()).fetch()
    }

    fn get_task(&self, task_id: i64) -> Result<Option<Task>> {
        Tasks::new(&self.conn.lock()).get_by_id(task_id)
    }

    fn add_notification(&self, notification: &Notification) -> Result<i64> {
        Notifications::new(&self.conn.lock()).insert(notification)
    }

    fn edit_notification(&self, notification: &Notification) -> Result<()> {
        Notifications::new(&self.conn.lock()).update(notification)
    }

    fn delete_notification(&self, notification_id: i64) -> Result<usize> {
        Notifications::new(&self.conn.lock()).delete(notification_id)
    }

    fn delete_notifications_by_task_id(&self, task_id: i64) -> Result<usize> {
        Notifications::new(&self.conn.lock()).delete_by_task_id(task_id)
    }

    fn delete_all_notifications(&self) -> Result<usize> {
        Notifications::new(&self.conn.lock()).delete_all()
    }

    fn list_notifications(&self) -> Result<Vec<Notification>> {
        Notifications::new(&self.conn.lock()).fetch()
    }
}
