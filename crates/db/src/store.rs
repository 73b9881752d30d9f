use std::sync::Arc;

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::{Mutex, broadcast};
use uuid::Uuid;

use crate::{
    Result,
    events::StoreEvent,
    kv::{KeyValueBackend, MemoryBackend},
    models::{ChatMessage, CreateChatMessage, CreateTask, Domain, Task, TaskFilter, TaskStatus},
};

pub const TASKS_KEY: &str = "ai-agent-tasks";
pub const ARCHIVED_TASKS_KEY: &str = "ai-agent-archived-tasks";
pub const MESSAGES_KEY: &str = "ai-agent-messages";

const EVENT_CAPACITY: usize = 256;

/// Typed access to the task, archive and message collections.
///
/// Every mutation reads the whole collection, edits it in memory and writes it
/// back. Mutations of the two task collections share one lock (archiving
/// touches both), messages have their own. Cloning is cheap and clones share
/// the same backend, locks and event channel.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    backend: Arc<dyn KeyValueBackend>,
    task_lock: Mutex<()>,
    message_lock: Mutex<()>,
    events: broadcast::Sender<StoreEvent>,
}

impl Store {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(StoreInner {
                backend,
                task_lock: Mutex::new(()),
                message_lock: Mutex::new(()),
                events,
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.events.subscribe()
    }

    // ─── Tasks ───────────────────────────────────────────────────────────

    /// Assign an id and timestamp and insert the task at the head of the
    /// active collection.
    pub async fn add_task(&self, create: CreateTask) -> Result<Task> {
        let _guard = self.inner.task_lock.lock().await;

        let mut tasks: Vec<Task> = self.load_collection(TASKS_KEY).await?;
        let archived: Vec<Task> = self.load_collection(ARCHIVED_TASKS_KEY).await?;

        let mut id = new_id("task");
        while tasks.iter().chain(archived.iter()).any(|t| t.id == id) {
            id = new_id("task");
        }

        let task = create.into_task(id, Utc::now());
        tasks.insert(0, task.clone());
        self.write_collection(TASKS_KEY, &tasks).await?;

        tracing::debug!(task_id = %task.id, domain = %task.domain, "Task added");
        self.publish(StoreEvent::TaskAdded { task: task.clone() });
        Ok(task)
    }

    /// Set the status of an active task. Unknown ids are a no-op and yield
    /// `None`.
    pub async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> Result<Option<Task>> {
        let _guard = self.inner.task_lock.lock().await;

        let mut tasks: Vec<Task> = self.load_collection(TASKS_KEY).await?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) else {
            tracing::debug!(task_id, "Status update for unknown task ignored");
            return Ok(None);
        };
        task.status = status;
        let updated = task.clone();
        self.write_collection(TASKS_KEY, &tasks).await?;

        self.publish(StoreEvent::TaskStatusChanged {
            task_id: task_id.to_string(),
            status,
        });
        Ok(Some(updated))
    }

    /// Move an active task to the head of the archive with status `rejected`.
    /// Unknown ids (including already archived ones) are a no-op.
    pub async fn archive_task(&self, task_id: &str) -> Result<Option<Task>> {
        let _guard = self.inner.task_lock.lock().await;

        let mut tasks: Vec<Task> = self.load_collection(TASKS_KEY).await?;
        let Some(index) = tasks.iter().position(|t| t.id == task_id) else {
            tracing::debug!(task_id, "Archive of unknown task ignored");
            return Ok(None);
        };

        let mut task = tasks.remove(index);
        task.status = TaskStatus::Rejected;

        let mut archived: Vec<Task> = self.load_collection(ARCHIVED_TASKS_KEY).await?;
        archived.insert(0, task.clone());

        self.inner
            .backend
            .set_many(&[
                (TASKS_KEY, serde_json::to_string(&tasks)?),
                (ARCHIVED_TASKS_KEY, serde_json::to_string(&archived)?),
            ])
            .await?;

        tracing::info!(task_id, "Task archived");
        self.publish(StoreEvent::TaskArchived { task: task.clone() });
        Ok(Some(task))
    }

    /// Apply a reviewer decision: rejection archives the task, any other
    /// status is set in place.
    pub async fn review_task(&self, task_id: &str, status: TaskStatus) -> Result<Option<Task>> {
        match status {
            TaskStatus::Rejected => self.archive_task(task_id).await,
            other => self.update_task_status(task_id, other).await,
        }
    }

    /// Active tasks, most recent first.
    pub async fn get_tasks(&self) -> Vec<Task> {
        self.read_collection(TASKS_KEY).await
    }

    pub async fn get_tasks_filtered(&self, filter: &TaskFilter) -> Vec<Task> {
        self.get_tasks()
            .await
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect()
    }

    pub async fn get_task(&self, task_id: &str) -> Option<Task> {
        self.get_tasks().await.into_iter().find(|t| t.id == task_id)
    }

    pub async fn get_archived_tasks(&self) -> Vec<Task> {
        self.read_collection(ARCHIVED_TASKS_KEY).await
    }

    pub async fn get_archived_tasks_filtered(&self, filter: &TaskFilter) -> Vec<Task> {
        self.get_archived_tasks()
            .await
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect()
    }

    pub async fn clear_archived_tasks(&self) -> Result<()> {
        let _guard = self.inner.task_lock.lock().await;
        self.inner.backend.remove(ARCHIVED_TASKS_KEY).await?;
        self.publish(StoreEvent::ArchiveCleared);
        Ok(())
    }

    // ─── Messages ────────────────────────────────────────────────────────

    /// Append a message to the conversation log.
    pub async fn save_message(&self, create: CreateChatMessage) -> Result<ChatMessage> {
        let _guard = self.inner.message_lock.lock().await;

        let mut messages: Vec<ChatMessage> = self.load_collection(MESSAGES_KEY).await?;
        let message = create.into_message(new_id("msg"), Utc::now());
        messages.push(message.clone());
        self.write_collection(MESSAGES_KEY, &messages).await?;

        self.publish(StoreEvent::MessageAdded {
            message: message.clone(),
        });
        Ok(message)
    }

    /// Messages in chronological order, optionally limited to one domain.
    pub async fn get_messages(&self, domain: Option<Domain>) -> Vec<ChatMessage> {
        let messages: Vec<ChatMessage> = self.read_collection(MESSAGES_KEY).await;
        match domain {
            Some(domain) => messages.into_iter().filter(|m| m.domain == domain).collect(),
            None => messages,
        }
    }

    pub async fn clear_messages(&self) -> Result<()> {
        let _guard = self.inner.message_lock.lock().await;
        self.inner.backend.remove(MESSAGES_KEY).await?;
        self.publish(StoreEvent::MessagesCleared);
        Ok(())
    }

    // ─── Internals ───────────────────────────────────────────────────────

    /// Load a collection for display. Missing keys, backend failures and
    /// unparsable data all read as empty.
    async fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.load_collection(key).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Failed to read {} from store: {}", key, e);
                Vec::new()
            }
        }
    }

    /// Load a collection that is about to be rewritten. Backend failures
    /// propagate so the caller never overwrites data it could not see;
    /// unparsable data still reads as empty and bad records are skipped.
    async fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let Some(raw) = self.inner.backend.get(key).await? else {
            return Ok(Vec::new());
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("Discarding unparsable {} collection: {}", key, e);
                return Ok(Vec::new());
            }
        };

        Ok(values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("Skipping unreadable record in {}: {}", key, e);
                    None
                }
            })
            .collect())
    }

    async fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.inner.backend.set(key, &json).await
    }

    fn publish(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }
}

fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}
