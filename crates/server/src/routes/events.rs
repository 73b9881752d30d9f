use std::{convert::Infallible, time::Duration};

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use db::StoreEvent;
use futures::stream::{Stream, StreamExt};
use tokio_stream::wrappers::{BroadcastStream, errors::BroadcastStreamRecvError};

use crate::AppState;

/// Stream store change events via SSE. Each event is named after the change
/// (`taskAdded`, `taskArchived`, ...) and carries it as JSON.
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.store().subscribe()).map(|item| Ok(to_sse_event(item)));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    )
}

fn to_sse_event(item: Result<StoreEvent, BroadcastStreamRecvError>) -> Event {
    match item {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json) => Event::default().event(event.name()).data(json),
            Err(e) => {
                tracing::error!("Failed to serialize store event: {}", e);
                Event::default().comment("error")
            }
        },
        // Subscribers that fall behind should re-read everything.
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!("Event stream lagged, skipped {} events", skipped);
            Event::default().event("resync").data(skipped.to_string())
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/events", get(stream_events))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        response::IntoResponse,
    };
    use db::{
        Store,
        models::{CreateChatMessage, Domain},
    };
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn store_events_are_forwarded_in_order() {
        let store = Store::in_memory();
        let mut stream = BroadcastStream::new(store.subscribe());

        store
            .save_message(CreateChatMessage::user(Domain::Gateway, "hello"))
            .await
            .unwrap();
        store.clear_messages().await.unwrap();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.name(), "messageAdded");
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second, StoreEvent::MessagesCleared);
    }

    #[tokio::test]
    async fn lagged_subscriber_gets_resync_event() {
        let event = to_sse_event(Err(BroadcastStreamRecvError::Lagged(3)));
        let stream = futures::stream::iter(vec![Ok::<_, Infallible>(event)]);
        let response = Sse::new(stream).into_response();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("event: resync"));
        assert!(text.contains("data: 3"));
    }

    #[tokio::test]
    async fn store_event_is_named_and_serialized() {
        let event = to_sse_event(Ok(StoreEvent::ArchiveCleared));
        let stream = futures::stream::iter(vec![Ok::<_, Infallible>(event)]);
        let response = Sse::new(stream).into_response();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("event: archiveCleared"));
        assert!(text.contains("data: \"archiveCleared\""));
    }

    #[tokio::test]
    async fn events_endpoint_serves_event_stream() {
        let config = agent::AgentConfig {
            thinking_delay_ms: 0,
            ..Default::default()
        };
        let app = crate::routes::router(AppState::new(Store::in_memory(), &config));
        let request = Request::get("/api/events").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/event-stream"
        );
    }
}
