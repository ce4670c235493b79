/// Every user-facing message. Text lives in `display.rs`.
#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated(i64),
    TaskUpdated(i64),
    TaskDeleted { id: i64, notifications: usize },
    TaskNotFound(i64),
    TasksNotFound,
    TasksHeader,
    TasksMatchingHeader(String), // filter summary
    ConfirmDeleteTask(String),   // name
    EditingTask(String),         // name
    PromptTaskName,
    PromptTaskDescription,
    PromptTaskPriority,
    TaskPriorityRange,
    TaskNameEmpty,
    SelectTask,
    InvalidSortOption(String),

    // === NOTIFICATION MESSAGES ===
    ReminderScheduled(i64, String),  // id, time
    ReminderSavedUnscheduled(i64),   // id
    ReminderTaskUnresolved(i64),     // id
    ReminderInPast(String),          // time
    NotificationDeleted(i64),
    NotificationNotFound(i64),
    NotificationsDeleted(usize),
    NotificationsNotFound,
    NotificationsHeader,
    NoTasksForReminder,
    ConfirmDeleteNotification(i64),
    ConfirmDeleteAllNotifications(usize),
    PromptReminderTime,
    PromptRepeatMinutes,
    InvalidReminderTime(String),
    InvalidRepeatInterval,
    ExactAlarmPermissionNeeded,

    // === REMINDER DELIVERY ===
    ReminderDisplay { title: String, body: String },
    ReminderDisplayDenied(i64),

    // === WATCHER MESSAGES ===
    WatcherStarted { scheduled: usize, reclaimed: usize },
    WatcherUnresolvedReminders(usize),
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String),
    WatcherSignalHandlingNotSupported,
    WatcherStopped,
    StaleRemindersReclaimed(usize),
    RemindersSynced { scheduled: usize, cancelled: usize },

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigParseError(String),
    PromptExactAlarms,
    PromptNotificationsEnabled,
    PromptDefaultSort,
    ExactAlarmsEnabled,

    // === DATABASE MESSAGES ===
    DatabaseUpToDate,
    MigrationsFound(usize),
    RunningMigration(u32, String),

    // === GENERIC ===
    OperationCancelled,
}
