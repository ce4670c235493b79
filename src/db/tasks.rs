use crate::libs::error::{ReminderError, Result};
use crate::libs::task::Task;
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_TASK: &str = "INSERT INTO tasks (name, description, priority, created_at) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_TASK: &str = "UPDATE tasks SET name = ?2, description = ?3, priority = ?4 WHERE id = ?1";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const SELECT_TASKS: &str = "SELECT id, name, description, priority, created_at FROM tasks";
const ORDER_BY_PRIORITY: &str = "ORDER BY priority DESC, id ASC";
const WHERE_ID: &str = "WHERE id = ?1";

/// Task table operations over a borrowed connection.
pub struct Tasks<'a> {
    conn: &'a Connection,
}

impl<'a> Tasks<'a> {
    /// Wraps a connection whose schema is already migrated.
    pub fn new(conn: &'a Connection) -> Self {
        Tasks { conn }
    }

    /// Inserts `task`, ignoring its `id`, and returns the id SQLite assigned.
    pub fn insert(&self, task: &Task) -> Result<i64> {
        self.conn
            .execute(INSERT_TASK, params![task.name, task.description, task.priority, task.created_at])?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Writes name, description and priority back. `created_at` is left as stored.
    ///
    /// Fails with [`ReminderError::TaskNotFound`] when no row has the task's id.
    pub fn update(&self, task: &Task) -> Result<()> {
        let id = task.id.ok_or(ReminderError::NotPersisted)?;
        let affected = self
            .conn
            .execute(UPDATE_TASK, params![id, task.name, task.description, task.priority])?;

        if affected == 0 {
            return Err(ReminderError::TaskNotFound { id });
        }

        Ok(())
    }

    /// Deletes one task and returns the number of rows removed (0 or 1).
    pub fn delete(&self, id: i64) -> Result<usize> {
        Ok(self.conn.execute(DELETE_TASK, params![id])?)
    }

    /// All tasks, highest priority first, ties in insertion order.
    pub fn fetch(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!("{} {}", SELECT_TASKS, ORDER_BY_PRIORITY))?;
        let tasks = stmt.query_map([], Self::from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(tasks)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Task>> {
        let task = self
            .conn
            .query_row(&format!("{} {}", SELECT_TASKS, WHERE_ID), params![id], Self::from_row)
            .optional()?;

        Ok(task)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            description: row.get(2)?,
            priority: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}
