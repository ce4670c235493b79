use super::{confirm, Context};
use crate::{
    libs::{
        formatter::{format_timestamp, minutes_to_interval, parse_local_datetime},
        messages::Message,
        notification::Notification,
        scheduler::ScheduleOutcome,
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

#[derive(Debug, Args)]
pub struct RemindArgs {
    #[command(subcommand)]
    command: Option<RemindCommand>,
}

#[derive(Debug, Subcommand)]
enum RemindCommand {
    /// Attach a reminder to a task; prompts for anything not given
    Add {
        task_id: Option<i64>,
        /// Local time, YYYY-MM-DD HH:MM
        #[arg(short, long)]
        at: Option<String>,
        /// Repeat every N minutes
        #[arg(short, long)]
        every: Option<u32>,
    },
    List,
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every reminder
    Clear {
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn cmd(args: RemindArgs) -> Result<()> {
    let ctx = Context::open().await?;
    match args.command {
        Some(RemindCommand::Add { task_id, at, every }) => handle_add(&ctx, task_id, at, every).await,
        Some(RemindCommand::List) | None => handle_list(&ctx),
        Some(RemindCommand::Delete { id, yes }) => handle_delete(&ctx, id, yes).await,
        Some(RemindCommand::Clear { yes }) => handle_clear(&ctx, yes).await,
    }
}

fn select_task(ctx: &Context) -> Result<Option<i64>> {
    let tasks = ctx.service.tasks().borrow().clone();
    if tasks.is_empty() {
        msg_info!(Message::NoTasksForReminder);
        return Ok(None);
    }

    let items: Vec<String> = tasks.iter().map(|task| task.name.clone()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::SelectTask.to_string())
        .items(&items)
        .default(0)
        .interact()?;
    Ok(tasks[selection].id)
}

fn prompt_time() -> Result<String> {
    let input = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptReminderTime.to_string())
        .validate_with(|value: &String| match parse_local_datetime(value) {
            Some(_) => Ok(()),
            None => Err(Message::InvalidReminderTime(value.clone()).to_string()),
        })
        .interact_text()?;
    Ok(input)
}

fn prompt_repeat() -> Result<u32> {
    let minutes = Input::<u32>::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptRepeatMinutes.to_string())
        .default(0)
        .interact_text()?;
    Ok(minutes)
}

async fn handle_add(ctx: &Context, task_id: Option<i64>, at: Option<String>, every: Option<u32>) -> Result<()> {
    let task_id = match task_id {
        Some(task_id) => task_id,
        None => match select_task(ctx)? {
            Some(task_id) => task_id,
            None => return Ok(()),
        },
    };
    if ctx.service.task(task_id).await?.is_none() {
        msg_error!(Message::TaskNotFound(task_id));
        return Ok(());
    }

    let (at, every) = match at {
        Some(at) => (at, every.unwrap_or(0)),
        None => {
            let at = prompt_time()?;
            let every = match every {
                Some(every) => every,
                None => prompt_repeat()?,
            };
            (at, every)
        }
    };
    let Some(reminder_time) = parse_local_datetime(&at) else {
        msg_error!(Message::InvalidReminderTime(at));
        return Ok(());
    };

    let notification = match minutes_to_interval(every) {
        Some(interval) => Notification::repeating(task_id, reminder_time, interval),
        None if reminder_time < Utc::now().timestamp_millis() => {
            msg_warning!(Message::ReminderInPast(format_timestamp(reminder_time)));
            return Ok(());
        }
        None => Notification::one_shot(task_id, reminder_time),
    };

    let (notification_id, outcome) = ctx.service.add_notification(notification.clone()).await?;
    match outcome {
        ScheduleOutcome::Scheduled => {
            msg_success!(Message::ReminderScheduled(notification_id, format_timestamp(reminder_time)));
        }
        ScheduleOutcome::PermissionDenied => {
            msg_warning!(Message::ReminderSavedUnscheduled(notification_id));
        }
        ScheduleOutcome::TaskUnresolved => {
            msg_warning!(Message::ReminderTaskUnresolved(notification_id));
        }
    }

    if *ctx.service.need_alarm_permission().borrow() {
        let persisted = Notification {
            id: Some(notification_id),
            ..notification
        };
        request_exact_alarms(ctx, persisted).await?;
    }
    Ok(())
}

/// Asks for exact alarm permission and, when granted, schedules the reminder that needed it.
async fn request_exact_alarms(ctx: &Context, notification: Notification) -> Result<()> {
    msg_warning!(Message::ExactAlarmPermissionNeeded);
    ctx.service.acknowledge_alarm_permission();

    let granted = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptExactAlarms.to_string())
        .default(false)
        .interact()?;
    if !granted {
        return Ok(());
    }

    let mut config = ctx.config.clone();
    let mut reminders = config.reminders();
    reminders.exact_alarms = true;
    config.reminders = Some(reminders);
    config.save()?;
    ctx.timer.set_exact_alarms_allowed(true);
    msg_success!(Message::ExactAlarmsEnabled);

    let scheduler = ctx.service.scheduler().clone();
    let reminder_time = notification.reminder_time;
    let notification_id = notification.id.unwrap_or_default();
    let outcome = tokio::task::spawn_blocking(move || scheduler.schedule(&notification)).await??;
    if outcome == ScheduleOutcome::Scheduled {
        msg_success!(Message::ReminderScheduled(notification_id, format_timestamp(reminder_time)));
    }
    Ok(())
}

fn handle_list(ctx: &Context) -> Result<()> {
    let notifications = ctx.service.notifications().borrow().clone();
    if notifications.is_empty() {
        msg_info!(Message::NotificationsNotFound);
        return Ok(());
    }

    let tasks = ctx.service.tasks().borrow().clone();
    msg_print!(Message::NotificationsHeader, true);
    View::notifications(&notifications, &tasks)?;
    Ok(())
}

async fn handle_delete(ctx: &Context, id: i64, yes: bool) -> Result<()> {
    let notification = ctx
        .service
        .notifications()
        .borrow()
        .iter()
        .find(|n| n.id == Some(id))
        .cloned();
    let Some(notification) = notification else {
        msg_error!(Message::NotificationNotFound(id));
        return Ok(());
    };

    if !confirm(Message::ConfirmDeleteNotification(id), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    ctx.service.delete_notification(notification).await?;
    msg_success!(Message::NotificationDeleted(id));
    Ok(())
}

async fn handle_clear(ctx: &Context, yes: bool) -> Result<()> {
    let count = ctx.service.notifications().borrow().len();
    if count == 0 {
        msg_info!(Message::NotificationsNotFound);
        return Ok(());
    }

    if !confirm(Message::ConfirmDeleteAllNotifications(count), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    let removed = ctx.service.delete_all_notifications().await?;
    msg_success!(Message::NotificationsDeleted(removed));
    Ok(())
}
