pub mod error;
pub mod routes;

use std::sync::Arc;

use agent::{AgentConfig, ChatSession};
use db::Store;

/// Shared handler state: the store and the chat session writing to it.
#[derive(Clone)]
pub struct AppState {
    store: Store,
    session: Arc<ChatSession>,
}

impl AppState {
    pub fn new(store: Store, config: &AgentConfig) -> Self {
        let session = agent::initialize_agent(config, store.clone());
        Self::from_session(session)
    }

    pub fn from_session(session: ChatSession) -> Self {
        Self {
            store: session.store().clone(),
            session: Arc::new(session),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }
}
