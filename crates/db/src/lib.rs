//! Persistence for the multi-domain agent: the task, archive and chat
//! collections, kept as JSON arrays in a key-value backend.

use thiserror::Error;

pub mod events;
pub mod kv;
pub mod models;
pub mod store;

pub use events::StoreEvent;
pub use kv::{KeyValueBackend, MemoryBackend, SqliteBackend};
pub use store::Store;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
