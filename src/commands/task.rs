use super::{confirm, Context};
use crate::{
    libs::{filter::SortKey, messages::Message, task::Task, view::View},
    msg_error, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input};
use std::str::FromStr;

const MIN_PRIORITY: i32 = 1;
const MAX_PRIORITY: i32 = 10;

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: Option<TaskCommand>,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Create a task; prompts for anything not given
    Add {
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=10))]
        priority: Option<i32>,
    },
    Edit {
        id: i64,
    },
    /// Delete a task together with its reminders
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
    List {
        /// Case-insensitive text matched against name and description
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long)]
        priority: Option<i32>,
        /// One of: Date Ascending, Date Descending, Priority Ascending, ...
        #[arg(short, long)]
        sort: Option<String>,
    },
}

pub async fn cmd(args: TaskArgs) -> Result<()> {
    let ctx = Context::open().await?;
    match args.command {
        Some(TaskCommand::Add {
            name,
            description,
            priority,
        }) => handle_add(&ctx, name, description, priority).await,
        Some(TaskCommand::Edit { id }) => handle_edit(&ctx, id).await,
        Some(TaskCommand::Delete { id, yes }) => handle_delete(&ctx, id, yes).await,
        Some(TaskCommand::List { query, priority, sort }) => handle_list(&ctx, &query, priority, sort),
        None => handle_list(&ctx, "", None, None),
    }
}

fn prompt_name(default: Option<String>) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme).with_prompt(Message::PromptTaskName.to_string());
    if let Some(default) = default {
        input = input.default(default);
    }
    let name = input
        .validate_with(|value: &String| {
            if value.trim().is_empty() {
                Err(Message::TaskNameEmpty.to_string())
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(name.trim().to_string())
}

fn prompt_description(default: String) -> Result<String> {
    let description = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTaskDescription.to_string())
        .default(default)
        .allow_empty(true)
        .interact_text()?;
    Ok(description)
}

fn prompt_priority(default: i32) -> Result<i32> {
    let priority = Input::<i32>::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTaskPriority.to_string())
        .default(default)
        .validate_with(|value: &i32| {
            if (MIN_PRIORITY..=MAX_PRIORITY).contains(value) {
                Ok(())
            } else {
                Err(Message::TaskPriorityRange.to_string())
            }
        })
        .interact_text()?;
    Ok(priority)
}

async fn handle_add(ctx: &Context, name: Option<String>, description: Option<String>, priority: Option<i32>) -> Result<()> {
    let task = match name {
        Some(name) if !name.trim().is_empty() => Task::new(name.trim(), description.as_deref(), priority.unwrap_or(MIN_PRIORITY)),
        Some(_) => {
            msg_error!(Message::TaskNameEmpty);
            return Ok(());
        }
        None => {
            let name = prompt_name(None)?;
            let description = prompt_description(description.unwrap_or_default())?;
            let priority = prompt_priority(priority.unwrap_or(MIN_PRIORITY))?;
            Task::new(&name, Some(description.as_str()), priority)
        }
    };

    let task_id = ctx.service.add_task(task).await?;
    msg_success!(Message::TaskCreated(task_id));
    Ok(())
}

async fn handle_edit(ctx: &Context, id: i64) -> Result<()> {
    let Some(task) = ctx.service.task(id).await? else {
        msg_error!(Message::TaskNotFound(id));
        return Ok(());
    };

    msg_print!(Message::EditingTask(task.name.clone()), true);
    let name = prompt_name(Some(task.name.clone()))?;
    let description = prompt_description(task.description_or_empty().to_string())?;
    let priority = prompt_priority(task.priority)?;

    ctx.service
        .edit_task(Task {
            name,
            description: Some(description).filter(|d| !d.is_empty()),
            priority,
            ..task
        })
        .await?;
    msg_success!(Message::TaskUpdated(id));
    Ok(())
}

async fn handle_delete(ctx: &Context, id: i64, yes: bool) -> Result<()> {
    let Some(task) = ctx.service.task(id).await? else {
        msg_error!(Message::TaskNotFound(id));
        return Ok(());
    };

    if !confirm(Message::ConfirmDeleteTask(task.name), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    let notifications = ctx.service.delete_task(id).await?;
    msg_success!(Message::TaskDeleted { id, notifications });
    Ok(())
}

fn handle_list(ctx: &Context, query: &str, priority: Option<i32>, sort: Option<String>) -> Result<()> {
    let sort = sort.unwrap_or_else(|| ctx.config.list().default_sort);
    if SortKey::from_str(&sort).is_err() {
        msg_warning!(Message::InvalidSortOption(sort.clone()));
    }

    let tasks = ctx.service.apply_filter(query, priority, &sort);
    if tasks.is_empty() {
        msg_info!(Message::TasksNotFound);
        return Ok(());
    }

    let header = match (query.is_empty(), priority) {
        (true, None) => Message::TasksHeader,
        (_, priority) => Message::TasksMatchingHeader(filter_summary(query, priority)),
    };
    msg_print!(header, true);
    View::tasks(&tasks)?;
    Ok(())
}

fn filter_summary(query: &str, priority: Option<i32>) -> String {
    let mut parts = Vec::new();
    if !query.is_empty() {
        parts.push(format!("matching \"{}\"", query));
    }
    if let Some(priority) = priority {
        parts.push(format!("priority {}", priority));
    }
    parts.join(", ")
}
