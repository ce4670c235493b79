#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use todo_reminders::db::store::SqliteStore;
    use todo_reminders::libs::error::ReminderError;
    use todo_reminders::libs::notification::Notification;
    use todo_reminders::libs::store::Store;
    use todo_reminders::libs::task::Task;

    struct StoreTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for StoreTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("todo.db");
            StoreTestContext {
                _temp_dir: temp_dir,
                db_path,
            }
        }
    }

    impl StoreTestContext {
        fn store(&self) -> SqliteStore {
            SqliteStore::open(&self.db_path).unwrap()
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_tasks_listed_by_priority_descending(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        store.add_task(&Task::new("Low", None, 1)).unwrap();
        store.add_task(&Task::new("High", None, 9)).unwrap();
        store.add_task(&Task::new("Mid", Some("details"), 5)).unwrap();

        let names: Vec<String> = store.list_tasks().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_task_round_trip_and_delete(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        let task = Task::new("Buy milk", Some("2 litres"), 3);
        let id = store.add_task(&task).unwrap();

        let loaded = store.get_task(id).unwrap().unwrap();
        assert_eq!(loaded, Task { id: Some(id), ..task });

        assert_eq!(store.delete_task(id).unwrap(), 1);
        assert_eq!(store.get_task(id).unwrap(), None);
        assert_eq!(store.delete_task(id).unwrap(), 0);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_edit_missing_task_fails(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        let ghost = Task {
            id: Some(77),
            ..Task::new("Ghost", None, 1)
        };

        assert!(matches!(store.edit_task(&ghost), Err(ReminderError::TaskNotFound { id: 77 })));
        assert!(matches!(
            store.edit_task(&Task::new("Unsaved", None, 1)),
            Err(ReminderError::NotPersisted)
        ));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_data_survives_reopen(ctx: &mut StoreTestContext) {
        let task_id = {
            let store = ctx.store();
            let task_id = store.add_task(&Task::new("Persisted", None, 4)).unwrap();
            store
                .add_notification(&Notification::repeating(task_id, 1_000, 60_000))
                .unwrap();
            task_id
        };

        let store = ctx.store();
        assert_eq!(store.list_tasks().unwrap().len(), 1);
        let notifications = store.list_notifications().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].task_id, task_id);
        assert_eq!(notifications[0].repeat_interval, Some(60_000));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_notifications_ordered_by_time(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        store.add_notification(&Notification::one_shot(1, 3_000)).unwrap();
        store.add_notification(&Notification::one_shot(1, 1_000)).unwrap();
        store.add_notification(&Notification::one_shot(2, 2_000)).unwrap();

        let times: Vec<i64> = store
            .list_notifications()
            .unwrap()
            .into_iter()
            .map(|n| n.reminder_time)
            .collect();
        assert_eq!(times, vec![1_000, 2_000, 3_000]);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_add_notification_with_id_replaces_row(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        let id = store.add_notification(&Notification::one_shot(1, 1_000)).unwrap();

        let replaced = Notification {
            id: Some(id),
            ..Notification::repeating(1, 5_000, 60_000)
        };
        assert_eq!(store.add_notification(&replaced).unwrap(), id);

        assert_eq!(store.list_notifications().unwrap(), vec![replaced]);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_edit_notification(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        let id = store.add_notification(&Notification::one_shot(1, 1_000)).unwrap();

        let edited = Notification {
            id: Some(id),
            ..Notification::one_shot(1, 9_000)
        };
        store.edit_notification(&edited).unwrap();

        assert_eq!(store.list_notifications().unwrap(), vec![edited]);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_bulk_notification_deletes(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        store.add_notification(&Notification::one_shot(1, 1_000)).unwrap();
        store.add_notification(&Notification::one_shot(1, 2_000)).unwrap();
        store.add_notification(&Notification::one_shot(2, 3_000)).unwrap();

        assert_eq!(store.delete_notifications_by_task_id(1).unwrap(), 2);
        assert_eq!(store.delete_notifications_by_task_id(1).unwrap(), 0);
        assert_eq!(store.list_notifications().unwrap().len(), 1);

        assert_eq!(store.delete_all_notifications().unwrap(), 1);
        assert!(store.list_notifications().unwrap().is_empty());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_deleted_ids_are_not_reassigned(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        let task_id = store.add_task(&Task::new("Stretch", None, 2)).unwrap();
        let repeating = store
            .add_notification(&Notification::repeating(task_id, 1_000, 60_000))
            .unwrap();

        store.delete_notifications_by_task_id(task_id).unwrap();
        store.delete_task(task_id).unwrap();

        let next_task = store.add_task(&Task::new("Buy milk", None, 3)).unwrap();
        let next_notification = store.add_notification(&Notification::one_shot(next_task, 5_000)).unwrap();
        assert_ne!(next_task, task_id);
        assert_ne!(next_notification, repeating);

        // Also across reopening the file.
        store.delete_notification(next_notification).unwrap();
        drop(store);
        let reopened = ctx.store();
        let after_reopen = reopened.add_notification(&Notification::one_shot(next_task, 6_000)).unwrap();
        assert!(after_reopen > next_notification);
    }
}
