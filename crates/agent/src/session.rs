//! The send flow of a chat conversation.

use std::{sync::Arc, time::Duration};

use db::{
    Store,
    models::{ChatMessage, CreateChatMessage, Domain, Task},
};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{AgentError, Result, rules::{AgentReply, RulesEngine}};

/// Everything one send produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutcome {
    pub user_message: ChatMessage,
    pub reply: ChatMessage,
    /// Canned text, kept even when the reasoning service supplied the reply.
    pub immediate: String,
    pub task: Option<Task>,
}

/// Runs user messages through the rules engine one at a time.
pub struct ChatSession {
    store: Store,
    engine: Arc<RulesEngine>,
    thinking_delay: Duration,
    send_lock: Mutex<()>,
}

impl ChatSession {
    pub fn new(store: Store, engine: Arc<RulesEngine>, thinking_delay: Duration) -> Self {
        Self {
            store,
            engine,
            thinking_delay,
            send_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }

    /// Record the user's message, pause, draft a task if asked for, and
    /// record the assistant's reply.
    pub async fn send(&self, domain: Domain, text: &str) -> Result<SendOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::EmptyMessage);
        }

        let _guard = self.send_lock.lock().await;

        let user_message = self
            .store
            .save_message(CreateChatMessage::user(domain, text))
            .await?;

        if !self.thinking_delay.is_zero() {
            tokio::time::sleep(self.thinking_delay).await;
        }

        let task = self.engine.classify_and_create_task(domain, text).await?;
        let AgentReply {
            immediate,
            final_text,
            ..
        } = self.engine.compose_reply(domain, text).await;
        let content = final_text.unwrap_or_else(|| immediate.clone());

        let reply = self
            .store
            .save_message(CreateChatMessage::assistant(domain, content))
            .await?;

        Ok(SendOutcome {
            user_message,
            reply,
            immediate,
            task,
        })
    }

    /// Drop the conversation log. Tasks are kept.
    pub async fn reset(&self) -> Result<()> {
        self.store.clear_messages().await?;
        Ok(())
    }
}
