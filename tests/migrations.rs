#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use todo_reminders::db::db::Db;
    use todo_reminders::db::migrations::{get_db_version, init_with_migrations, needs_migration, MigrationManager};

    struct MigrationTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("todo.db");
            MigrationTestContext {
                _temp_dir: temp_dir,
                db_path,
            }
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_run_automatically(ctx: &mut MigrationTestContext) {
        let db = Db::open(&ctx.db_path).unwrap();

        assert_eq!(get_db_version(&db.conn).unwrap(), MigrationManager::new().latest_version());
        assert!(!needs_migration(&db.conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_needs_migration(ctx: &mut MigrationTestContext) {
        let conn = Connection::open(&ctx.db_path).unwrap();

        assert_eq!(get_db_version(&conn).unwrap(), 0);
        assert!(needs_migration(&conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_history(ctx: &mut MigrationTestContext) {
        let mut conn = Connection::open(&ctx.db_path).unwrap();
        let manager = MigrationManager::new();
        manager.run_migrations(&mut conn).unwrap();

        let history = manager.get_migration_history(&conn).unwrap();
        let names: Vec<(u32, &str)> = history.iter().map(|(v, name, _)| (*v, name.as_str())).collect();
        assert_eq!(
            names,
            vec![(1, "create_tasks"), (2, "create_notifications"), (3, "autoincrement_ids")]
        );
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_are_idempotent(ctx: &mut MigrationTestContext) {
        let mut conn = Connection::open(&ctx.db_path).unwrap();
        init_with_migrations(&mut conn).unwrap();
        init_with_migrations(&mut conn).unwrap();

        let manager = MigrationManager::new();
        assert_eq!(manager.get_migration_history(&conn).unwrap().len(), manager.latest_version() as usize);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_schema_has_both_tables(ctx: &mut MigrationTestContext) {
        let db = Db::open(&ctx.db_path).unwrap();

        let mut stmt = db
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('tasks', 'notifications') ORDER BY name")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(tables, vec!["notifications", "tasks"]);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_upgrade_keeps_rows_and_stops_reusing_ids(ctx: &mut MigrationTestContext) {
        let mut conn = Connection::open(&ctx.db_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE migrations (
                id INTEGER PRIMARY KEY,
                version INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL,
                applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            INSERT INTO migrations (version, name) VALUES (1, 'create_tasks'), (2, 'create_notifications');
            CREATE TABLE tasks (
                id INTEGER NOT NULL PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                priority INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );
            CREATE TABLE notifications (
                id INTEGER NOT NULL PRIMARY KEY,
                task_id INTEGER NOT NULL,
                reminder_time INTEGER NOT NULL,
                repeat_interval INTEGER
            );
            INSERT INTO tasks (id, name, description, priority, created_at) VALUES (1, 'Buy milk', NULL, 3, 100), (2, 'Call mom', 'evening', 7, 50);
            INSERT INTO notifications (id, task_id, reminder_time, repeat_interval) VALUES (1, 1, 1000, NULL), (2, 2, 2000, 60000);
            DELETE FROM notifications WHERE id = 2;",
        )
        .unwrap();

        init_with_migrations(&mut conn).unwrap();

        let tasks: Vec<(i64, String)> = conn
            .prepare("SELECT id, name FROM tasks ORDER BY id")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(tasks, vec![(1, "Buy milk".to_string()), (2, "Call mom".to_string())]);

        conn.execute("DELETE FROM notifications WHERE id = 1", []).unwrap();
        conn.execute(
            "INSERT INTO notifications (task_id, reminder_time, repeat_interval) VALUES (2, 3000, NULL)",
            [],
        )
        .unwrap();
        assert!(conn.last_insert_rowid() > 1);
    }
}
