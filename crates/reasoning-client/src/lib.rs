//! Reasoning Client - HTTP client for the external reasoning service
//!
//! The domain agents optionally forward a user utterance to this service and
//! use its answer in place of their canned reply. Every failure is reported
//! as a [`ReasoningClientError`] so callers can fall back.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

pub mod types;
pub use types::*;

pub const DEFAULT_REASONING_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const CHAT_PATH: &str = "/api/chat";
const HEALTH_PATH: &str = "/health";

/// Error types for reasoning client operations
#[derive(Debug, thiserror::Error)]
pub enum ReasoningClientError {
    #[error("Reasoning service not reachable at {0}")]
    NotReachable(String),
    #[error("Reasoning service timed out after {0:?}")]
    Timeout(Duration),
    #[error("Reasoning API error: {0}")]
    ApiError(String),
    #[error("Failed to parse reasoning response: {0}")]
    ParseError(String),
}

/// Client for the reasoning service chat endpoint
#[derive(Clone)]
pub struct ReasoningClient {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl ReasoningClient {
    /// Create a client; every request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check if the service is reachable
    pub async fn is_running(&self) -> bool {
        self.health_check().await.is_ok()
    }

    pub async fn health_check(&self) -> Result<HealthResponse, ReasoningClientError> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !resp.status().is_success() {
            return Err(ReasoningClientError::ApiError(format!(
                "health check returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| ReasoningClientError::ParseError(e.to_string()))
    }

    /// Send one message and return the service's answer text.
    pub async fn ask(&self, message: &str) -> Result<String, ReasoningClientError> {
        let url = format!("{}{}", self.base_url, CHAT_PATH);
        let req = ReasoningRequest {
            message: message.to_string(),
        };

        debug!("Forwarding {} chars to reasoning service", message.len());
        let resp = self
            .client
            .post(&url)
            .json(&req)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err: serde_json::Value = resp
                .json()
                .await
                .unwrap_or_else(|_| serde_json::json!({"error": "Unknown error"}));
            let detail = err["error"].as_str().unwrap_or("Unknown error");
            return Err(ReasoningClientError::ApiError(format!("{}: {}", status, detail)));
        }

        let body: ReasoningResponse = resp
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(body.response)
    }

    fn transport_error(&self, e: reqwest::Error) -> ReasoningClientError {
        if e.is_timeout() {
            ReasoningClientError::Timeout(self.timeout)
        } else if e.is_connect() {
            ReasoningClientError::NotReachable(self.base_url.clone())
        } else if e.is_decode() {
            ReasoningClientError::ParseError(e.to_string())
        } else {
            ReasoningClientError::ApiError(e.to_string())
        }
    }
}

/// Try to connect to the reasoning service, returning a client if successful
pub async fn try_connect_to_reasoning() -> Option<ReasoningClient> {
    let url = std::env::var("REASONING_SERVICE_URL")
        .unwrap_or_else(|_| DEFAULT_REASONING_URL.to_string());
    let client = ReasoningClient::new(&url, DEFAULT_TIMEOUT);

    match client.health_check().await {
        Ok(health) => {
            info!(
                "Connected to reasoning service at {} ({})",
                url,
                health.version.as_deref().unwrap_or("unknown version")
            );
            Some(client)
        }
        Err(e) => {
            warn!("Reasoning service not available at {}: {}", url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::{get, post}};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn ask_returns_response_field() {
        let app = Router::new().route(
            CHAT_PATH,
            post(|Json(req): Json<ReasoningRequest>| async move {
                Json(ReasoningResponse {
                    response: format!("echo: {}", req.message),
                })
            }),
        );
        let url = serve(app).await;

        let client = ReasoningClient::new(&format!("{}/", url), DEFAULT_TIMEOUT);
        let answer = client.ask("[operations] reorder please").await.unwrap();
        assert_eq!(answer, "echo: [operations] reorder please");
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let app = Router::new().route(
            CHAT_PATH,
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": "model offline"})),
                )
            }),
        );
        let url = serve(app).await;

        let err = ReasoningClient::new(&url, DEFAULT_TIMEOUT)
            .ask("hello")
            .await
            .unwrap_err();
        match err {
            ReasoningClientError::ApiError(msg) => assert!(msg.contains("model offline")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let app = Router::new().route(
            CHAT_PATH,
            post(|| async { Json(serde_json::json!({"answer": "wrong field"})) }),
        );
        let url = serve(app).await;

        let err = ReasoningClient::new(&url, DEFAULT_TIMEOUT)
            .ask("hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ReasoningClientError::ParseError(_)));
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let app = Router::new().route(
            CHAT_PATH,
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(ReasoningResponse {
                    response: "late".into(),
                })
            }),
        );
        let url = serve(app).await;

        let err = ReasoningClient::new(&url, Duration::from_millis(100))
            .ask("hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ReasoningClientError::Timeout(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_reported() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ReasoningClient::new(&format!("http://{}", addr), DEFAULT_TIMEOUT);
        assert!(!client.is_running().await);
        assert!(matches!(
            client.ask("hello").await.unwrap_err(),
            ReasoningClientError::NotReachable(_)
        ));
    }

    #[tokio::test]
    async fn health_check_parses_status() {
        let app = Router::new().route(
            HEALTH_PATH,
            get(|| async { Json(serde_json::json!({"status": "ok", "version": "1.2.0"})) }),
        );
        let url = serve(app).await;

        let health = ReasoningClient::new(&url, DEFAULT_TIMEOUT)
            .health_check()
            .await
            .unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.version.as_deref(), Some("1.2.0"));
    }
}
