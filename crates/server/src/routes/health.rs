use axum::response::Json as ResponseJson;
use serde::Serialize;
use utils::response::ApiResponse;

#[derive(Debug, Serialize)]
pub struct HealthInfo {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> ResponseJson<ApiResponse<HealthInfo>> {
    ResponseJson(ApiResponse::success(HealthInfo {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
