//! Command line front end.
//!
//! Every subcommand that touches data opens a [`Context`]: the SQLite store,
//! an in-process timer and a console notifier wired into a [`TodoService`].
//! Timers only live as long as the process, so reminders are delivered by
//! `todo watch`, which rebuilds them from the database on start.

pub mod init;
pub mod remind;
pub mod task;
pub mod watch;

use crate::db::store::SqliteStore;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::notifier::ConsoleNotifier;
use crate::libs::scheduler::ReminderScheduler;
use crate::libs::service::TodoService;
use crate::libs::timer::TokioTimer;
use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::sync::Arc;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Create, edit, delete and list tasks")]
    Task(task::TaskArgs),
    #[command(about = "Manage task reminders")]
    Remind(remind::RemindArgs),
    #[command(about = "Deliver reminders until stopped")]
    Watch,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Task(args) => task::cmd(args).await,
            Commands::Remind(args) => remind::cmd(args).await,
            Commands::Watch => watch::cmd().await,
        }
    }
}

/// Everything a data command needs.
pub struct Context {
    pub config: Config,
    pub timer: Arc<TokioTimer>,
    pub service: TodoService,
}

impl Context {
    pub async fn open() -> Result<Self> {
        let config = Config::read()?;
        let grants = config.reminders();

        let store = Arc::new(SqliteStore::open_default()?);
        let timer = Arc::new(TokioTimer::new(grants.exact_alarms)?);
        let notifier = Arc::new(ConsoleNotifier::new(grants.notifications_enabled));
        let scheduler = ReminderScheduler::new(store.clone(), timer.clone(), notifier);
        let service = TodoService::new(store, scheduler).await?;

        Ok(Context {
            config,
            timer,
            service,
        })
    }
}

/// Asks before a destructive action unless `assume_yes` is set.
pub(crate) fn confirm(prompt: Message, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .default(false)
        .interact()?;
    Ok(confirmed)
}
