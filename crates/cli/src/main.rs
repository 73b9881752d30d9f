//! agentctl - terminal client for the domain agent server
//!
//! Chat with the gateway, risk-management and operations agents and review
//! the tasks they draft.

mod api;
mod commands;
mod config;
mod output;
mod repl;

use anyhow::Result;
use clap::{Parser, Subcommand};
use db::models::{Domain, TaskFilter, TaskStatus, TaskType};

/// agentctl - chat with domain agents and review their tasks
#[derive(Parser)]
#[command(name = "agentctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chat with domain agents and review the tasks they draft")]
#[command(long_about = r#"
agentctl talks to the agent server over HTTP.

Examples:
  agentctl                                   # Interactive chat in the default domain
  agentctl chat -d operations "reorder 50 filters"
  agentctl tasks --status pending            # Pending tasks across domains
  agentctl review task-1234 approved
"#)]
struct Cli {
    /// Server URL (defaults to server.url from the config file)
    #[arg(long, env = "AGENT_SERVER_URL")]
    server: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is reachable
    Status,

    /// List the agent domains
    Domains,

    /// List tasks
    Tasks {
        #[arg(short, long)]
        domain: Option<Domain>,

        /// pending, in-review, approved, completed, rejected
        #[arg(short, long)]
        status: Option<TaskStatus>,

        #[arg(short = 't', long = "type")]
        task_type: Option<TaskType>,

        /// Show the archive instead of active tasks
        #[arg(long)]
        archived: bool,
    },

    /// Set a task's status; rejected archives it
    Review { task_id: String, status: TaskStatus },

    /// Move a task to the archive
    Archive { task_id: String },

    /// Delete every archived task
    ClearArchive,

    /// Send a single message to an agent
    Chat {
        #[arg(short, long)]
        domain: Option<Domain>,

        message: String,
    },

    /// Show the conversation history
    Messages {
        #[arg(short, long)]
        domain: Option<Domain>,
    },

    /// Configuration management
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set a configuration value (key=value)
        #[arg(long)]
        set: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::logging::init(if cli.verbose { "debug" } else { "warn" });

    let mut config = config::Config::load()?;
    let server_url = cli.server.clone().unwrap_or_else(|| config.server.url.clone());
    tracing::debug!("Using server {}", server_url);

    let api = api::ApiClient::new(&server_url);

    match cli.command {
        Some(Commands::Status) => {
            commands::status(&api).await?;
        }
        Some(Commands::Domains) => {
            commands::list_domains(&api).await?;
        }
        Some(Commands::Tasks {
            domain,
            status,
            task_type,
            archived,
        }) => {
            let filter = TaskFilter {
                domain,
                status,
                task_type,
            };
            commands::list_tasks(&api, &filter, archived).await?;
        }
        Some(Commands::Review { task_id, status }) => {
            commands::review_task(&api, &task_id, status).await?;
        }
        Some(Commands::Archive { task_id }) => {
            commands::archive_task(&api, &task_id).await?;
        }
        Some(Commands::ClearArchive) => {
            commands::clear_archive(&api).await?;
        }
        Some(Commands::Chat { domain, message }) => {
            let domain = domain.unwrap_or(config.chat.default_domain);
            commands::chat(&api, domain, &message).await?;
        }
        Some(Commands::Messages { domain }) => {
            commands::list_messages(&api, domain).await?;
        }
        Some(Commands::Config { show, set }) => {
            if let (false, Some(kv)) = (show, set) {
                commands::set_config(&mut config, &kv)?;
            } else {
                commands::show_config(&config)?;
            }
        }
        None => {
            let mut repl = repl::AgentRepl::new(api, config.chat.default_domain)?;
            repl.run().await?;
        }
    }

    Ok(())
}
