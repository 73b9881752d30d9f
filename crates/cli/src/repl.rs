//! Interactive REPL for agentctl
//!
//! Each line is sent to the currently selected domain agent; lines starting
//! with `/` are local commands.

use anyhow::Result;
use colored::Colorize;
use db::models::{Domain, TaskFilter, TaskStatus};
use rustyline::{Editor, error::ReadlineError, history::DefaultHistory};

use crate::{api::ApiClient, output::OutputHandler};

/// Interactive chat loop against one domain at a time
pub struct AgentRepl {
    api: ApiClient,
    output: OutputHandler,
    editor: Editor<(), DefaultHistory>,
    domain: Domain,
}

impl AgentRepl {
    pub fn new(api: ApiClient, domain: Domain) -> Result<Self> {
        Ok(Self {
            api,
            output: OutputHandler::new(),
            editor: Editor::new()?,
            domain,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        if !self.api.health_check().await? {
            self.output.print_warning(&format!(
                "Server not reachable at {}; messages will fail until it is up.",
                self.api.base_url()
            ));
        } else {
            self.print_banner().await?;
        }

        loop {
            let prompt = self.build_prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_command(input).await {
                            Ok(true) => break,
                            Ok(false) => {}
                            Err(e) => self.output.print_error(&format!("Command error: {}", e)),
                        }
                    } else if let Err(e) = self.send(input).await {
                        self.output.print_error(&format!("Error: {}", e));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!();
                    self.output.print_info("Use /exit to quit.");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(e) => {
                    self.output.print_error(&format!("Input error: {}", e));
                    break;
                }
            }
        }

        Ok(())
    }

    fn build_prompt(&self) -> String {
        format!(
            "\n{} [{}] {} ",
            "agentctl".bright_green().bold(),
            self.domain.as_str().bright_cyan(),
            ">".bright_green()
        )
    }

    async fn print_banner(&self) -> Result<()> {
        let domains = self.api.list_domains().await?;
        if let Some(info) = domains.iter().find(|d| d.id == self.domain) {
            self.output.print_banner(info, self.api.base_url());
        }
        Ok(())
    }

    async fn send(&self, input: &str) -> Result<()> {
        let outcome = self.api.chat(self.domain, input).await?;
        self.output.print_message(&outcome.reply);
        if let Some(task) = &outcome.task {
            self.output.print_task_created(task);
        }
        Ok(())
    }

    /// Handle slash commands; `Ok(true)` ends the session.
    async fn handle_command(&mut self, input: &str) -> Result<bool> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = parts.first().copied().unwrap_or_default();

        match command {
            "/exit" | "/quit" | "/q" => return Ok(true),

            "/help" | "/h" | "/?" => self.print_help(),

            "/domain" => match parts.get(1) {
                Some(id) => {
                    self.domain = id.parse().map_err(anyhow::Error::msg)?;
                    self.print_banner().await?;
                }
                None => self
                    .output
                    .print_info(&format!("Current domain: {}", self.domain)),
            },

            "/tasks" | "/archived" => {
                let filter = TaskFilter {
                    domain: Some(self.domain),
                    ..TaskFilter::default()
                };
                let tasks = self.api.list_tasks(&filter, command == "/archived").await?;
                if tasks.is_empty() {
                    self.output.print_info("No tasks found.");
                } else {
                    self.output.print_tasks_table(&tasks);
                }
            }

            "/review" => {
                let (Some(id), Some(status)) = (parts.get(1), parts.get(2)) else {
                    anyhow::bail!("Usage: /review <task-id> <status>");
                };
                let status: TaskStatus = status.parse()?;
                let task = self.api.review_task(id, status).await?;
                self.output.print_success(&format!("{} is now {}", task.title, task.status));
                self.output.print_task_detail(&task);
            }

            "/archive" => {
                let Some(id) = parts.get(1) else {
                    anyhow::bail!("Usage: /archive <task-id>");
                };
                let task = self.api.archive_task(id).await?;
                self.output.print_success(&format!("Archived: {}", task.title));
            }

            "/clear" => {
                self.api.clear_messages().await?;
                self.output.print_success("Conversation cleared");
            }

            _ => {
                self.output
                    .print_warning(&format!("Unknown command: {}. Type /help for help.", command));
            }
        }

        Ok(false)
    }

    fn print_help(&self) {
        self.output.print_header("Commands");
        let rows = [
            ("/domain [id]", "Show or switch domain (gateway, risk-management, operations)"),
            ("/tasks", "List active tasks for this domain"),
            ("/archived", "List archived tasks for this domain"),
            ("/review <id> <status>", "Set status; rejected archives the task"),
            ("/archive <id>", "Archive a task"),
            ("/clear", "Clear the conversation"),
            ("/exit", "Leave the session"),
        ];
        for (cmd, help) in rows {
            println!("  {:<24} {}", cmd.bright_cyan(), help.dimmed());
        }
    }
}
