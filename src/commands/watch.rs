//! `todo watch`: keeps reminders alive in the foreground.
//!
//! Rebuilds every timer from the notification table, then waits for a
//! shutdown signal while fired reminders print themselves. Other `todo`
//! invocations write to the same database, so every few seconds the timers
//! are synced with the table: deleted reminders are cancelled, new ones
//! scheduled and stale one-time reminders swept. The exact alarm setting is
//! re-read from the configuration on the same tick.

use super::Context;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::scheduler::{SchedulerEvent, SyncSummary};
use crate::libs::timer::TokioTimer;
use crate::{msg_error, msg_info, msg_warning};
use anyhow::Result;
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};

const SYNC_INTERVAL: Duration = Duration::from_secs(5);

pub async fn cmd() -> Result<()> {
    let ctx = Context::open().await?;
    let scheduler = ctx.service.scheduler().clone();
    let mut events = scheduler.subscribe();

    let restore = scheduler.clone();
    let summary = tokio::task::spawn_blocking(move || restore.restore()).await??;
    msg_info!(Message::WatcherStarted {
        scheduled: summary.scheduled,
        reclaimed: summary.reclaimed.len(),
    });
    if summary.unresolved > 0 {
        msg_warning!(Message::WatcherUnresolvedReminders(summary.unresolved));
    }
    if summary.permission_denied > 0 {
        msg_warning!(Message::ExactAlarmPermissionNeeded);
    }

    let mut shutdown = spawn_signal_listener();
    let mut sync = tokio::time::interval(SYNC_INTERVAL);
    // The first tick completes immediately and restore already synced.
    sync.tick().await;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = sync.tick() => {
                reload_exact_alarms(&ctx.timer);
                let pass = scheduler.clone();
                match tokio::task::spawn_blocking(move || pass.sync()).await? {
                    Ok(summary) => report_sync(&summary),
                    // A busy database is retried on the next tick.
                    Err(e) => tracing::warn!("reminder sync failed: {e}"),
                }
            }
            event = events.recv() => match event {
                Ok(SchedulerEvent::DisplayDenied { notification_id }) => {
                    msg_warning!(Message::ReminderDisplayDenied(notification_id));
                }
                Ok(SchedulerEvent::TaskUnresolved { notification_id, .. }) => {
                    msg_warning!(Message::ReminderTaskUnresolved(notification_id));
                }
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    ctx.timer.shutdown();
    msg_info!(Message::WatcherStopped);
    Ok(())
}

/// Applies the current `exact_alarms` setting, which `todo remind add` may have changed.
fn reload_exact_alarms(timer: &TokioTimer) {
    match Config::read() {
        Ok(config) => timer.set_exact_alarms_allowed(config.reminders().exact_alarms),
        Err(e) => tracing::warn!("configuration not reloaded: {e}"),
    }
}

fn report_sync(summary: &SyncSummary) {
    if !summary.reclaimed.is_empty() {
        msg_info!(Message::StaleRemindersReclaimed(summary.reclaimed.len()));
    }
    if summary.scheduled > 0 || !summary.cancelled.is_empty() {
        msg_info!(Message::RemindersSynced {
            scheduled: summary.scheduled,
            cancelled: summary.cancelled.len(),
        });
    }
    // Unresolved tasks are reported per reminder through the event stream.
    if summary.permission_denied > 0 {
        msg_warning!(Message::ExactAlarmPermissionNeeded);
    }
}

/// Resolves once SIGTERM/SIGINT (Unix) or Ctrl-C (elsewhere) arrives.
fn spawn_signal_listener() -> oneshot::Receiver<()> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(mut sigterm), Ok(mut sigint)) => {
                    tokio::select! {
                        _ = sigterm.recv() => msg_info!(Message::WatcherReceivedSigterm),
                        _ = sigint.recv() => msg_info!(Message::WatcherReceivedSigint),
                    }
                }
                _ => match tokio::signal::ctrl_c().await {
                    Ok(()) => msg_info!(Message::WatcherReceivedCtrlC),
                    Err(e) => msg_error!(Message::WatcherCtrlCListenFailed(e.to_string())),
                },
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => msg_info!(Message::WatcherReceivedCtrlC),
                Err(e) => msg_error!(Message::WatcherCtrlCListenFailed(e.to_string())),
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(not(any(unix, windows)))]
    {
        msg_warning!(Message::WatcherSignalHandlingNotSupported);
        std::mem::forget(shutdown_tx);
    }

    shutdown_rx
}
