use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::domain::Domain;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized task status: {0}")]
pub struct ParseStatusError(pub String);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    Email,
    Reschedule,
    Outreach,
    Reorder,
    Maintenance,
    FollowUp,
    Analysis,
}

impl TaskType {
    pub const ALL: [TaskType; 7] = [
        TaskType::Email,
        TaskType::Reschedule,
        TaskType::Outreach,
        TaskType::Reorder,
        TaskType::Maintenance,
        TaskType::FollowUp,
        TaskType::Analysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Email => "email",
            TaskType::Reschedule => "reschedule",
            TaskType::Outreach => "outreach",
            TaskType::Reorder => "reorder",
            TaskType::Maintenance => "maintenance",
            TaskType::FollowUp => "follow-up",
            TaskType::Analysis => "analysis",
        }
    }

    /// Capitalized form used in task titles.
    pub fn label(&self) -> &'static str {
        match self {
            TaskType::Email => "Email",
            TaskType::Reschedule => "Reschedule",
            TaskType::Outreach => "Outreach",
            TaskType::Reorder => "Reorder",
            TaskType::Maintenance => "Maintenance",
            TaskType::FollowUp => "Follow-up",
            TaskType::Analysis => "Analysis",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(TaskType::Email),
            "reschedule" => Ok(TaskType::Reschedule),
            "outreach" => Ok(TaskType::Outreach),
            "reorder" => Ok(TaskType::Reorder),
            "maintenance" => Ok(TaskType::Maintenance),
            "follow-up" | "followup" | "follow_up" => Ok(TaskType::FollowUp),
            "analysis" => Ok(TaskType::Analysis),
            other => Err(format!("Unknown task type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InReview,
    Approved,
    Completed,
    Rejected,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InReview => "in-review",
            TaskStatus::Approved => "approved",
            TaskStatus::Completed => "completed",
            TaskStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in-review" => Ok(TaskStatus::InReview),
            "approved" => Ok(TaskStatus::Approved),
            "completed" => Ok(TaskStatus::Completed),
            "rejected" => Ok(TaskStatus::Rejected),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("Unknown priority: {}", other)),
        }
    }
}

/// Fields extracted from the utterance that produced a task.
///
/// Keys the model does not know about are kept in `extra` so records written
/// by other producers survive a load/save cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Responses recorded while a request hopped between the gateway and the
/// downstream agents. Sparse: most tasks carry none of these.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentTrace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_gateway_response1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_gateway_response2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_risk_agent_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_op_agent_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_gateway_agent_response1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_gateway_agent_response2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_risk_agent_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_op_agent_response: Option<String>,
}

impl AgentTrace {
    pub fn is_empty(&self) -> bool {
        *self == AgentTrace::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "StoredTask")]
pub struct Task {
    pub id: String,
    pub domain: Domain,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub timestamp: DateTime<Utc>,
    pub details: TaskDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<AgentTrace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl Task {
    pub fn priority(&self) -> Priority {
        self.details.priority.unwrap_or_default()
    }
}

/// A task as handed to the store, before it receives an id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub domain: Domain,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub details: TaskDetails,
    #[serde(default)]
    pub trace: Option<AgentTrace>,
    #[serde(default)]
    pub account_id: Option<String>,
}

impl CreateTask {
    pub fn new(
        domain: Domain,
        task_type: TaskType,
        title: impl Into<String>,
        description: impl Into<String>,
        details: TaskDetails,
    ) -> Self {
        Self {
            domain,
            task_type,
            title: title.into(),
            description: description.into(),
            status: TaskStatus::Pending,
            details,
            trace: None,
            account_id: None,
        }
    }

    pub fn into_task(self, id: String, timestamp: DateTime<Utc>) -> Task {
        Task {
            id,
            domain: self.domain,
            task_type: self.task_type,
            title: self.title,
            description: self.description,
            status: self.status,
            timestamp,
            details: self.details,
            trace: self.trace.filter(|t| !t.is_empty()),
            account_id: self.account_id,
        }
    }
}

/// Narrowing applied by list views. Empty filter matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskFilter {
    #[serde(default)]
    pub domain: Option<Domain>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default, rename = "type")]
    pub task_type: Option<TaskType>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.domain.is_none_or(|d| d == task.domain)
            && self.status.is_none_or(|s| s == task.status)
            && self.task_type.is_none_or(|t| t == task.task_type)
    }
}

/// On-disk layout accepted when loading tasks.
///
/// Besides the canonical shape this takes the older layouts: numeric ids,
/// `priority` at the top level, flat lower-case trace keys and `accountid`,
/// as well as the retired sales/customer-service/maintenance domain names.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: serde_json::Value,
    domain: String,
    #[serde(rename = "type")]
    task_type: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: Option<String>,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    details: TaskDetails,
    #[serde(default)]
    trace: Option<AgentTrace>,
    #[serde(default, alias = "accountid")]
    account_id: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    readgatewayresponse1: Option<String>,
    #[serde(default)]
    readgatewayresponse2: Option<String>,
    #[serde(default)]
    readriskagentresponse: Option<String>,
    #[serde(default)]
    readopagentresponse: Option<String>,
    #[serde(default)]
    writegatewayagentresponse1: Option<String>,
    #[serde(default, alias = "writegatewayagentresponse2")]
    writegatewayresponse2: Option<String>,
    #[serde(default)]
    writeriskagentresponse: Option<String>,
    #[serde(default)]
    writeopagentresponse: Option<String>,
}

fn domain_from_stored(raw: &str) -> Result<Domain, String> {
    match raw.trim().to_lowercase().as_str() {
        "sales" => Ok(Domain::Gateway),
        "customer-service" => Ok(Domain::RiskManagement),
        "maintenance" => Ok(Domain::Operations),
        other => other.parse(),
    }
}

impl TryFrom<StoredTask> for Task {
    type Error = String;

    fn try_from(raw: StoredTask) -> Result<Self, Self::Error> {
        let id = match raw.id {
            serde_json::Value::String(s) if !s.is_empty() => s,
            serde_json::Value::Number(n) => n.to_string(),
            other => return Err(format!("Invalid task id: {}", other)),
        };
        let domain = domain_from_stored(&raw.domain)?;
        let task_type = raw.task_type.parse()?;
        let status = match raw.status {
            Some(s) => s.parse().map_err(|e: ParseStatusError| e.to_string())?,
            None => TaskStatus::Pending,
        };

        let mut details = raw.details;
        if details.priority.is_none() {
            details.priority = raw.priority.and_then(|p| p.parse().ok());
        }

        let mut trace = raw.trace.unwrap_or_default();
        let legacy = [
            (&mut trace.read_gateway_response1, raw.readgatewayresponse1),
            (&mut trace.read_gateway_response2, raw.readgatewayresponse2),
            (&mut trace.read_risk_agent_response, raw.readriskagentresponse),
            (&mut trace.read_op_agent_response, raw.readopagentresponse),
            (&mut trace.write_gateway_agent_response1, raw.writegatewayagentresponse1),
            (&mut trace.write_gateway_agent_response2, raw.writegatewayresponse2),
            (&mut trace.write_risk_agent_response, raw.writeriskagentresponse),
            (&mut trace.write_op_agent_response, raw.writeopagentresponse),
        ];
        for (slot, value) in legacy {
            if slot.is_none() {
                *slot = value.filter(|v| !v.is_empty());
            }
        }

        Ok(Task {
            id,
            domain,
            task_type,
            title: raw.title,
            description: raw.description,
            status,
            timestamp: raw.timestamp,
            details,
            trace: if trace.is_empty() { None } else { Some(trace) },
            account_id: raw.account_id.filter(|a| !a.is_empty()),
        })
    }
}
