use axum::{
    Router,
    extract::Path,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{Domain, DomainConfig, domain_configs};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

pub async fn list_domains() -> ResponseJson<ApiResponse<&'static [DomainConfig]>> {
    ResponseJson(ApiResponse::success(domain_configs()))
}

pub async fn get_domain(
    Path(domain_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<&'static DomainConfig>>, ApiError> {
    let domain: Domain = domain_id
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Domain '{}' not found", domain_id)))?;
    Ok(ResponseJson(ApiResponse::success(domain.config())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/domains", get(list_domains))
        .route("/domains/{domain_id}", get(get_domain))
}
