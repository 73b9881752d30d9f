//! CLI subcommand handlers

use anyhow::Result;
use colored::Colorize;
use db::models::{Domain, TaskFilter, TaskStatus};

use crate::{
    api::ApiClient,
    config::Config,
    output::OutputHandler,
};

/// Show server reachability and local configuration
pub async fn status(api: &ApiClient) -> Result<()> {
    let output = OutputHandler::new();

    output.print_header("agentctl status");
    if api.health_check().await? {
        output.print_success(&format!("Server: Connected ({})", api.base_url()));
    } else {
        output.print_error(&format!("Server: Not reachable at {}", api.base_url()));
    }

    println!();
    println!("  {} {}", "Version:".dimmed(), env!("CARGO_PKG_VERSION"));
    println!("  {} {}", "Config:".dimmed(), Config::config_path().display());
    Ok(())
}

pub async fn list_domains(api: &ApiClient) -> Result<()> {
    let output = OutputHandler::new();
    output.print_header("Domains");
    output.print_domains(&api.list_domains().await?);
    Ok(())
}

pub async fn list_tasks(api: &ApiClient, filter: &TaskFilter, archived: bool) -> Result<()> {
    let output = OutputHandler::new();

    output.print_header(if archived { "Archived tasks" } else { "Tasks" });
    let tasks = api.list_tasks(filter, archived).await?;

    if tasks.is_empty() {
        output.print_info("No tasks found.");
    } else {
        output.print_tasks_table(&tasks);
    }
    Ok(())
}

/// Apply a reviewer decision; `rejected` archives the task.
pub async fn review_task(api: &ApiClient, task_id: &str, status: TaskStatus) -> Result<()> {
    let output = OutputHandler::new();
    let task = api.review_task(task_id, status).await?;

    if task.status == TaskStatus::Rejected {
        output.print_success(&format!("Rejected and archived: {}", task.title));
    } else {
        output.print_success(&format!("{} is now {}", task.title, task.status));
    }
    Ok(())
}

pub async fn archive_task(api: &ApiClient, task_id: &str) -> Result<()> {
    let output = OutputHandler::new();
    let task = api.archive_task(task_id).await?;
    output.print_success(&format!("Archived: {}", task.title));
    Ok(())
}

pub async fn clear_archive(api: &ApiClient) -> Result<()> {
    api.clear_archive().await?;
    OutputHandler::new().print_success("Archive cleared");
    Ok(())
}

/// Send one message and print the exchange
pub async fn chat(api: &ApiClient, domain: Domain, message: &str) -> Result<()> {
    let output = OutputHandler::new();
    let outcome = api.chat(domain, message).await?;

    output.print_message(&outcome.user_message);
    output.print_message(&outcome.reply);
    if let Some(task) = &outcome.task {
        output.print_task_created(task);
    }
    Ok(())
}

pub async fn list_messages(api: &ApiClient, domain: Option<Domain>) -> Result<()> {
    let output = OutputHandler::new();
    output.print_header("Conversation");

    let messages = api.list_messages(domain).await?;
    if messages.is_empty() {
        output.print_info("No messages yet.");
    }
    for message in &messages {
        output.print_message(message);
    }
    Ok(())
}

pub fn show_config(config: &Config) -> Result<()> {
    let output = OutputHandler::new();
    output.print_header("Configuration");
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

pub fn set_config(config: &mut Config, kv: &str) -> Result<()> {
    let Some((key, value)) = kv.split_once('=') else {
        anyhow::bail!("Expected key=value, got '{}'", kv);
    };
    let key = key.trim();
    config.set(key, value.trim())?;
    config.save_to(&Config::config_path())?;
    OutputHandler::new().print_success(&format!(
        "Set {} = {}",
        key,
        config.get(key).unwrap_or_default()
    ));
    Ok(())
}
