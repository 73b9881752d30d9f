use std::sync::Arc;

use agent::{AgentConfig, AgentError};
use db::{SqliteBackend, Store, StoreError};
use server::{AppState, routes};
use thiserror::Error;
use utils::assets::asset_dir;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Agent(#[from] AgentError),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Load environment variables from `.env` if present
    dotenv::dotenv().ok();

    utils::logging::init("info");

    utils::assets::ensure_asset_dir()?;
    tracing::info!("Using asset directory {}", asset_dir().display());

    let backend = SqliteBackend::open_default().await?;
    let store = Store::new(Arc::new(backend));

    // Every server start is a new conversation; tasks persist.
    store.clear_messages().await?;

    let config = AgentConfig::load_default()?;
    let app_router = routes::router(AppState::new(store, &config));

    let port = std::env::var("BACKEND_PORT")
        .or_else(|_| std::env::var("PORT"))
        .ok()
        .and_then(|s| s.trim().parse::<u16>().ok())
        .unwrap_or_else(|| {
            tracing::info!("No PORT environment variable set, using 3002");
            3002
        });

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    let actual_port = listener.local_addr()?.port();

    tracing::info!("Server running on http://{host}:{actual_port}");

    axum::serve(listener, app_router).await?;
    Ok(())
}
