//! API client for the agent server
//!
//! Every endpoint answers with the `ApiResponse` envelope; this client
//! unwraps it and turns `success: false` into an error.

use anyhow::{Context, Result};
use db::models::{ChatMessage, Domain, Task, TaskFilter, TaskStatus};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use utils::response::ApiResponse;

/// Domain metadata as served by `/api/domains`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInfo {
    pub id: Domain,
    pub name: String,
    pub description: String,
    pub icon: String,
}

/// Result of `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatOutcome {
    pub user_message: ChatMessage,
    pub reply: ChatMessage,
    pub immediate: String,
    pub task: Option<Task>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    domain: Domain,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct StatusRequest {
    status: TaskStatus,
}

/// API client for the agent server
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub async fn health_check(&self) -> Result<bool> {
        match self.client.get(self.url("/health")).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) => {
                tracing::debug!("Health check failed: {}", e);
                Ok(false)
            }
        }
    }

    // ============ Domains ============

    pub async fn list_domains(&self) -> Result<Vec<DomainInfo>> {
        self.send(self.client.get(self.url("/domains")), "fetch domains")
            .await
    }

    // ============ Tasks ============

    pub async fn list_tasks(&self, filter: &TaskFilter, archived: bool) -> Result<Vec<Task>> {
        let path = if archived { "/tasks/archived" } else { "/tasks" };
        let request = self.client.get(self.url(path)).query(&filter_query(filter));
        self.send(request, "fetch tasks").await
    }

    pub async fn review_task(&self, task_id: &str, status: TaskStatus) -> Result<Task> {
        let request = self
            .client
            .patch(self.url(&format!("/tasks/{}/status", task_id)))
            .json(&StatusRequest { status });
        self.send(request, "update task").await
    }

    pub async fn archive_task(&self, task_id: &str) -> Result<Task> {
        let request = self
            .client
            .post(self.url(&format!("/tasks/{}/archive", task_id)));
        self.send(request, "archive task").await
    }

    pub async fn clear_archive(&self) -> Result<()> {
        self.send_unit(self.client.delete(self.url("/tasks/archived")), "clear archive")
            .await
    }

    // ============ Chat ============

    pub async fn chat(&self, domain: Domain, message: &str) -> Result<ChatOutcome> {
        let request = self
            .client
            .post(self.url("/chat"))
            .json(&ChatRequest { domain, message });
        self.send(request, "send message").await
    }

    pub async fn list_messages(&self, domain: Option<Domain>) -> Result<Vec<ChatMessage>> {
        let mut request = self.client.get(self.url("/messages"));
        if let Some(domain) = domain {
            request = request.query(&[("domain", domain.as_str())]);
        }
        self.send(request, "fetch messages").await
    }

    pub async fn clear_messages(&self) -> Result<()> {
        self.send_unit(self.client.delete(self.url("/messages")), "clear messages")
            .await
    }

    // ============ Helpers ============

    async fn envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> Result<ApiResponse<T>> {
        let resp = request
            .send()
            .await
            .with_context(|| format!("Failed to {} (is the server running at {}?)", action, self.base_url))?;

        let status = resp.status();
        let text = resp.text().await?;
        let envelope: ApiResponse<T> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to {}: unexpected response ({})", action, status))?;

        if !envelope.success {
            anyhow::bail!(
                "Failed to {}: {}",
                action,
                envelope.message.as_deref().unwrap_or("unknown error")
            );
        }
        Ok(envelope)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> Result<T> {
        self.envelope::<T>(request, action)
            .await?
            .into_data()
            .with_context(|| format!("Failed to {}: response had no data", action))
    }

    async fn send_unit(&self, request: RequestBuilder, action: &str) -> Result<()> {
        self.envelope::<serde_json::Value>(request, action).await?;
        Ok(())
    }
}

fn filter_query(filter: &TaskFilter) -> Vec<(&'static str, &'static str)> {
    let mut query = Vec::new();
    if let Some(domain) = filter.domain {
        query.push(("domain", domain.as_str()));
    }
    if let Some(status) = filter.status {
        query.push(("status", status.as_str()));
    }
    if let Some(task_type) = filter.task_type {
        query.push(("type", task_type.as_str()));
    }
    query
}

#[cfg(test)]
mod tests {
    use db::models::TaskType;

    use super::*;

    #[test]
    fn filter_query_uses_wire_names() {
        let filter = TaskFilter {
            domain: Some(Domain::RiskManagement),
            status: Some(TaskStatus::InReview),
            task_type: Some(TaskType::FollowUp),
        };
        assert_eq!(
            filter_query(&filter),
            vec![("domain", "risk-management"), ("status", "in-review"), ("type", "follow-up")]
        );
        assert!(filter_query(&TaskFilter::default()).is_empty());
    }

    #[test]
    fn urls_are_rooted_at_api() {
        let api = ApiClient::new("http://localhost:3002/");
        assert_eq!(api.url("/tasks"), "http://localhost:3002/api/tasks");
    }
}
