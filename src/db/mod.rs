//! SQLite persistence.
//!
//! [`db::Db`] opens a connection and brings the schema to the latest
//! version; [`tasks::Tasks`] and [`notifications::Notifications`] hold the
//! SQL for each table; [`store::SqliteStore`] puts them behind the
//! [`crate::libs::store::Store`] trait.

pub mod db;
pub mod migrations;
pub mod notifications;
pub mod store;
pub mod tasks;
