use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::AppState;

pub mod chat;
pub mod domains;
pub mod events;
pub mod health;
pub mod messages;
pub mod tasks;

pub fn router(state: AppState) -> Router {
    let base_routes = Router::new()
        .route("/health", get(health::health_check))
        .merge(domains::router())
        .merge(tasks::router())
        .merge(messages::router())
        .merge(chat::router())
        .merge(events::router())
        .with_state(state);

    Router::new()
        .nest("/api", base_routes)
        .layer(CorsLayer::permissive())
}

/// Parse an optional query parameter, mapping failures to a 400.
pub(crate) fn parse_param<T>(name: &str, value: Option<&str>) -> Result<Option<T>, crate::error::ApiError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| crate::error::ApiError::BadRequest(format!("Invalid {}: {}", name, e)))
        })
        .transpose()
}
