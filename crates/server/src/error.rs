use agent::AgentError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::{StoreError, models::ParseStatusError};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Not Found: {0}")]
    NotFound(String),
}

impl From<ParseStatusError> for ApiError {
    fn from(err: ParseStatusError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "StoreError"),
            ApiError::Agent(err) => match err {
                AgentError::EmptyMessage => (StatusCode::BAD_REQUEST, "EmptyMessage"),
                AgentError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "StoreError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "AgentError"),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
        };

        if status_code.is_server_error() {
            tracing::error!("{}: {}", error_type, self);
        }

        let error_message = match &self {
            ApiError::Agent(AgentError::EmptyMessage) => "Message must not be empty".to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::NotFound(msg) => msg.clone(),
            _ => format!("{}: {}", error_type, self),
        };
        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
