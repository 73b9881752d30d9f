pub mod chat_message;
pub mod domain;
pub mod task;

pub use chat_message::{ChatMessage, CreateChatMessage, MessageRole};
pub use domain::{Domain, DomainConfig, domain_configs, get_domain_config};
pub use task::{
    AgentTrace, CreateTask, ParseStatusError, Priority, Task, TaskDetails, TaskFilter, TaskStatus,
    TaskType,
};
