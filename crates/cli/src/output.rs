//! Output formatting and terminal rendering

use colored::{ColoredString, Colorize};
use db::models::{ChatMessage, MessageRole, Priority, Task, TaskStatus};

use crate::api::DomainInfo;

/// Output handler for terminal display
#[derive(Default)]
pub struct OutputHandler;

impl OutputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Print the REPL banner
    pub fn print_banner(&self, domain: &DomainInfo, server: &str) {
        println!();
        println!("{}", "═".repeat(64).bright_cyan());
        println!("  {} {}", domain.icon, domain.name.bright_white().bold());
        println!("  {}", domain.description.dimmed());
        println!("  {} {}", "Server:".dimmed(), server);
        println!("{}", "═".repeat(64).bright_cyan());
        println!("  {}", "Type a request, or /help for commands".dimmed());
        println!();
    }

    /// Print a section header
    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", format!("▶ {}", text).bright_yellow().bold());
        println!("{}", "─".repeat(60).dimmed());
    }

    pub fn print_success(&self, text: &str) {
        println!("{} {}", "✓".bright_green(), text.bright_white());
    }

    pub fn print_error(&self, text: &str) {
        println!("{} {}", "✗".bright_red(), text.bright_red());
    }

    pub fn print_warning(&self, text: &str) {
        println!("{} {}", "⚠".bright_yellow(), text.yellow());
    }

    pub fn print_info(&self, text: &str) {
        println!("{} {}", "ℹ".bright_blue(), text);
    }

    pub fn print_domains(&self, domains: &[DomainInfo]) {
        for domain in domains {
            println!(
                "  {} {:<18} {}",
                domain.icon,
                domain.id.as_str().bright_white(),
                domain.description.dimmed()
            );
        }
        println!();
    }

    /// One chat turn.
    pub fn print_message(&self, message: &ChatMessage) {
        let time = message.timestamp.format("%H:%M:%S").to_string();
        match message.role {
            MessageRole::User => {
                println!("{} {} {}", time.dimmed(), "you".bright_blue().bold(), message.content)
            }
            MessageRole::Assistant => println!(
                "{} {} {}",
                time.dimmed(),
                "agent".bright_magenta().bold(),
                message.content
            ),
        }
    }

    pub fn print_task_created(&self, task: &Task) {
        println!(
            "{}{} {}",
            "Task Created: ".bright_green(),
            task.title.bright_white(),
            format!("({}, {} priority)", task.task_type, task.priority()).dimmed()
        );
        println!("  {} {}", "id:".dimmed(), task.id.dimmed());
    }

    /// Print tasks table
    pub fn print_tasks_table(&self, tasks: &[Task]) {
        println!();
        println!(
            "{}",
            format!(
                "{:<42} {:<16} {:<12} {:<10} {:<8} {}",
                "ID", "Domain", "Type", "Status", "Priority", "Title"
            )
            .bright_white()
            .bold()
        );
        println!("{}", "─".repeat(120).dimmed());

        for task in tasks {
            println!(
                "{:<42} {:<16} {:<12} {:<10} {:<8} {}",
                task.id.dimmed(),
                task.domain.as_str(),
                task.task_type.as_str(),
                status_colored(task.status),
                priority_colored(task.priority()),
                truncate(&task.title, 40).bright_white()
            );
        }
        println!();
    }

    pub fn print_task_detail(&self, task: &Task) {
        println!("  {} {}", "Title:".dimmed(), task.title.bright_white());
        println!("  {} {}", "Status:".dimmed(), status_colored(task.status));
        println!("  {} {}", "Description:".dimmed(), task.description);
        if let Some(recipient) = &task.details.recipient {
            println!("  {} {}", "Recipient:".dimmed(), recipient);
        }
        if let Some(date) = &task.details.scheduled_date {
            println!("  {} {}", "Scheduled:".dimmed(), date);
        }
        if let Some(quantity) = task.details.quantity.filter(|q| *q > 0) {
            println!("  {} {}", "Quantity:".dimmed(), quantity);
        }
    }
}

fn status_colored(status: TaskStatus) -> ColoredString {
    let text = status.as_str();
    match status {
        TaskStatus::Pending => text.bright_yellow(),
        TaskStatus::InReview => text.bright_blue(),
        TaskStatus::Approved => text.bright_cyan(),
        TaskStatus::Completed => text.bright_green(),
        TaskStatus::Rejected => text.dimmed(),
    }
}

fn priority_colored(priority: Priority) -> ColoredString {
    let text = priority.to_string();
    match priority {
        Priority::High => text.bright_red(),
        Priority::Medium => text.normal(),
        Priority::Low => text.dimmed(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
