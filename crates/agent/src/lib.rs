//! # Domain agents
//!
//! Turns chat utterances into reviewable tasks and assistant replies for the
//! gateway, risk-management and operations domains.

pub mod classifier;
pub mod config;
pub mod extract;
pub mod replies;
pub mod rules;
pub mod session;

use std::sync::Arc;

pub use classifier::{Classifier, Intent, KeywordClassifier, TaskIntent, TopicMatch};
pub use config::{AgentConfig, ReasoningConfig};
pub use replies::ReplyKind;
pub use rules::{AgentReply, ReasoningBackend, RulesEngine};
pub use session::{ChatSession, SendOutcome};

use db::{Store, StoreError};
use reasoning_client::ReasoningClient;

/// Main error types for agent operations
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;

/// Wire the rules engine and chat session for `config` on top of `store`.
pub fn initialize_agent(config: &AgentConfig, store: Store) -> ChatSession {
    tracing::info!("Initializing domain agents...");

    let mut engine = RulesEngine::new(store.clone());
    if config.reasoning.enabled {
        let client = ReasoningClient::new(&config.reasoning.url, config.reasoning.timeout());
        tracing::info!("Reasoning service enabled at {}", client.base_url());
        engine = engine.with_reasoning(Arc::new(client), config.reasoning.timeout());
    } else {
        tracing::info!("Reasoning service disabled; using canned replies only");
    }

    ChatSession::new(store, Arc::new(engine), config.thinking_delay())
}
