use axum::{
    Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{ChatMessage, Domain};
use serde::Deserialize;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, routes::parse_param};

#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub domain: Option<String>,
}

pub async fn get_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<ChatMessage>>>, ApiError> {
    let domain: Option<Domain> = parse_param("domain", query.domain.as_deref())?;
    let messages = state.store().get_messages(domain).await;
    Ok(ResponseJson(ApiResponse::success(messages)))
}

pub async fn clear_messages(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    state.session().reset().await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/messages", get(get_messages).delete(clear_messages))
}
