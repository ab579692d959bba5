//! LISTEN/NOTIFY bridge for message change events.
//!
//! A trigger on the messages table publishes every insert, update and
//! delete on the `message_changes` channel. The payload is deliberately
//! tiny, just the action and the row id, because NOTIFY payloads are
//! capped at 8000 bytes and a full row of guest text can exceed that.
//! This module holds the dedicated listening connection, refetches the
//! affected row for inserts and updates, and fans the enriched events out
//! on a broadcast channel; the feed cache and the SSE endpoint both
//! subscribe to the same sender.

use std::time::Duration;

use domain::models::{ChangeAction, MessageChange, MessageChangeNotice, MessageEvent};
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tokio::sync::broadcast;

use crate::repositories::MessageRepository;

/// Notification channel published by the messages trigger.
pub const MESSAGE_CHANGES_CHANNEL: &str = "message_changes";

/// Reconnect backoff after the listening connection drops.
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Bridges Postgres notifications onto a tokio broadcast channel.
pub struct MessageChangeListener {
    pool: PgPool,
    repository: MessageRepository,
    tx: broadcast::Sender<MessageEvent>,
}

impl MessageChangeListener {
    pub fn new(pool: PgPool, tx: broadcast::Sender<MessageEvent>) -> Self {
        let repository = MessageRepository::new(pool.clone());
        Self {
            pool,
            repository,
            tx,
        }
    }

    /// Runs the listen loop forever, reconnecting after connection loss.
    ///
    /// Every re-established session starts by broadcasting
    /// [`MessageEvent::Resync`]: notifications raised while the connection
    /// was down are gone for good, so subscribers must rebuild their state
    /// from the database before trusting increments again.
    pub async fn run(self) {
        let mut resync_on_ready = false;
        loop {
            match self.listen_once(resync_on_ready).await {
                Ok(()) => {
                    tracing::warn!("message change listener stream ended, reconnecting");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "message change listener failed, reconnecting");
                }
            }
            resync_on_ready = true;
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }

    async fn listen_once(&self, resync_on_ready: bool) -> Result<(), sqlx::Error> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(MESSAGE_CHANGES_CHANNEL).await?;
        tracing::info!(channel = MESSAGE_CHANGES_CHANNEL, "listening for message changes");

        if resync_on_ready {
            let _ = self.tx.send(MessageEvent::Resync);
        }

        loop {
            let notification = listener.recv().await?;
            match decode_payload(notification.payload()) {
                Ok(notice) => {
                    if let Some(change) = self.enrich(notice).await {
                        // Send only fails when there are no subscribers; the
                        // feed cache task holds a receiver for the process
                        // lifetime, so a failure here is just noise at
                        // startup.
                        let _ = self.tx.send(MessageEvent::Change(change));
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring malformed message change payload");
                }
            }
        }
    }

    /// Turns a bare notice into a broadcastable change, refetching the row
    /// for inserts and updates.
    ///
    /// A row that vanished between the notification and the refetch is
    /// reported with no message body; the reconciler treats that as a
    /// removal, and the delete notification that follows is idempotent.
    async fn enrich(&self, notice: MessageChangeNotice) -> Option<MessageChange> {
        match notice.action {
            ChangeAction::Delete => Some(MessageChange::delete(notice.id)),
            ChangeAction::Insert | ChangeAction::Update => {
                match self.repository.find_by_id(notice.id).await {
                    Ok(Some(entity)) => Some(MessageChange {
                        action: notice.action,
                        id: notice.id,
                        message: Some(entity.into()),
                    }),
                    Ok(None) => Some(MessageChange::vanished(notice.action, notice.id)),
                    Err(err) => {
                        tracing::warn!(
                            error = %err,
                            message_id = notice.id,
                            "failed to refetch changed message, dropping event"
                        );
                        None
                    }
                }
            }
            ChangeAction::Unknown => None,
        }
    }
}

fn decode_payload(payload: &str) -> Result<MessageChangeNotice, serde_json::Error> {
    serde_json::from_str(payload)
}
