//! Public message wall handlers.

use std::convert::Infallible;

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures_util::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use validator::Validate;

use domain::models::{ChangeAction, Message, MessageEvent, SubmitMessageRequest};
use persistence::repositories::MessageRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_message_submitted;

/// List the approved wall, newest first.
///
/// GET /api/v1/messages
///
/// Served from the in-memory reconciled feed, not a per-request query.
pub async fn get_messages(State(state): State<AppState>) -> Json<Vec<Message>> {
    let feed = state.feed.read().await;
    Json(feed.messages().to_vec())
}

/// Submit a new wall message.
///
/// POST /api/v1/messages
///
/// The message is stored unapproved and stays off the public wall until a
/// moderator approves it. The created row is returned so the author sees
/// their pending submission.
pub async fn submit_message(
    State(state): State<AppState>,
    Json(request): Json<SubmitMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    request.validate()?;
    let (author_name, message) = request.normalized();

    let created = MessageRepository::new(state.pool.clone())
        .create(&author_name, &message)
        .await?;

    record_message_submitted();
    tracing::info!(message_id = created.id, "wall message submitted");

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Live change stream for the wall.
///
/// GET /api/v1/messages/stream
///
/// Server-sent events carrying the same change payloads the feed cache
/// consumes; clients reconcile their local copy with the same rules. A
/// `resync` event means changes may have been missed and the client must
/// refetch the feed snapshot.
pub async fn stream(State(state): State<AppState>) -> Response {
    let rx = state.bus.subscribe();
    let events = broadcast_to_sse(rx);

    Sse::new(events)
        .keep_alive(KeepAlive::new())
        .into_response()
}

fn broadcast_to_sse(
    rx: broadcast::Receiver<MessageEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(rx).filter_map(|msg| async move {
        match msg {
            Ok(MessageEvent::Change(change)) => {
                let event_name = match change.action {
                    ChangeAction::Insert => "insert",
                    ChangeAction::Update => "update",
                    ChangeAction::Delete => "delete",
                    ChangeAction::Unknown => return None,
                };
                let data = serde_json::to_string(&change).ok()?;
                Some(Ok(Event::default().event(event_name).data(data)))
            }
            Ok(MessageEvent::Resync) => Some(Ok(Event::default().event("resync").data("{}"))),
            // A lagged subscriber missed events; the client recovers by
            // refetching the feed snapshot, so skip rather than error.
            Err(_) => Some(Ok(Event::default().event("resync").data("{}"))),
        }
    })
}
