use agent::SendOutcome;
use axum::{
    Json, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::post,
};
use db::models::Domain;
use serde::Deserialize;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub domain: String,
    pub message: String,
}

/// Run one user message through the agent for `domain`.
pub async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<ResponseJson<ApiResponse<SendOutcome>>, ApiError> {
    let domain: Domain = payload.domain.parse().map_err(ApiError::BadRequest)?;

    let outcome = state.session().send(domain, &payload.message).await?;
    if let Some(task) = &outcome.task {
        tracing::info!(task_id = %task.id, %domain, "Chat produced a task");
    }
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/chat", post(send_message))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use db::Store;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    async fn post_chat(store: &Store, body: Value) -> (StatusCode, Value) {
        let config = agent::AgentConfig {
            thinking_delay_ms: 0,
            ..Default::default()
        };
        let app = crate::routes::router(AppState::new(store.clone(), &config));
        let request = Request::post("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn chat_drafts_task_and_replies() {
        let store = Store::in_memory();
        let (status, body) = post_chat(
            &store,
            json!({
                "domain": "operations",
                "message": "Please reorder 50 units for Jane Smith by 12/25, this is urgent"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["task"]["type"], "reorder");
        assert_eq!(data["task"]["details"]["quantity"], 50);
        assert_eq!(data["task"]["details"]["priority"], "high");
        assert_eq!(data["reply"]["role"], "assistant");
        assert_eq!(data["reply"]["content"], data["immediate"]);
        assert_eq!(store.get_messages(None).await.len(), 2);
    }

    #[tokio::test]
    async fn chat_redirects_out_of_scope_requests() {
        let store = Store::in_memory();
        let (status, body) = post_chat(
            &store,
            json!({"domain": "risk-management", "message": "can you schedule a delivery"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["task"].is_null());
        assert!(
            body["data"]["reply"]["content"]
                .as_str()
                .unwrap()
                .contains("Operations agent")
        );
        assert!(store.get_tasks().await.is_empty());
    }

    #[tokio::test]
    async fn chat_rejects_bad_input() {
        let store = Store::in_memory();
        let (status, _) = post_chat(&store, json!({"domain": "operations", "message": "   "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_chat(&store, json!({"domain": "marketing", "message": "hi"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(store.get_messages(None).await.is_empty());
    }
}
