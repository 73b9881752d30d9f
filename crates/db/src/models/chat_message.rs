use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::Domain;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => f.write_str("user"),
            MessageRole::Assistant => f.write_str("assistant"),
        }
    }
}

/// One turn of a domain conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub domain: Domain,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatMessage {
    pub domain: Domain,
    pub role: MessageRole,
    pub content: String,
}

impl CreateChatMessage {
    pub fn user(domain: Domain, content: impl Into<String>) -> Self {
        Self {
            domain,
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(domain: Domain, content: impl Into<String>) -> Self {
        Self {
            domain,
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    pub fn into_message(self, id: String, timestamp: DateTime<Utc>) -> ChatMessage {
        ChatMessage {
            id,
            domain: self.domain,
            role: self.role,
            content: self.content,
            timestamp,
        }
    }
}
