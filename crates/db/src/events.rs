use serde::{Deserialize, Serialize};

use crate::models::{ChatMessage, Task, TaskStatus};

/// Change notifications published by the [`Store`](crate::Store) after every
/// successful mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StoreEvent {
    TaskAdded { task: Task },
    TaskStatusChanged { task_id: String, status: TaskStatus },
    /// The task left the active collection; it carries the archived copy.
    TaskArchived { task: Task },
    ArchiveCleared,
    MessageAdded { message: ChatMessage },
    MessagesCleared,
}

impl StoreEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::TaskAdded { .. } => "taskAdded",
            StoreEvent::TaskStatusChanged { .. } => "taskStatusChanged",
            StoreEvent::TaskArchived { .. } => "taskArchived",
            StoreEvent::ArchiveCleared => "archiveCleared",
            StoreEvent::MessageAdded { .. } => "messageAdded",
            StoreEvent::MessagesCleared => "messagesCleared",
        }
    }
}
