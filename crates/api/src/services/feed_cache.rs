//! Background task keeping the in-memory wall feed consistent.
//!
//! The feed is seeded from the approved snapshot, then change events from
//! the bus are applied one at a time. Applying on a single task gives the
//! ordering guarantee the reconciler needs; readers share the feed behind
//! an async RwLock.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, RwLock};

use domain::models::MessageEvent;
use domain::services::feed::MessageFeed;
use persistence::repositories::MessageRepository;

/// Delay between retries when the seed query fails.
const RESEED_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Runs the feed cache task until the change bus closes.
pub async fn run(
    pool: PgPool,
    mut rx: broadcast::Receiver<MessageEvent>,
    feed: Arc<RwLock<MessageFeed>>,
) {
    let repository = MessageRepository::new(pool);

    seed(&repository, &feed).await;

    loop {
        match rx.recv().await {
            Ok(MessageEvent::Change(change)) => {
                let mut feed = feed.write().await;
                feed.apply(&change);
            }
            Ok(MessageEvent::Resync) => {
                // The listener lost its connection; any events raised while
                // it was down never reached the bus.
                tracing::warn!("change listener reconnected, reseeding wall feed");
                seed(&repository, &feed).await;
            }
            Err(RecvError::Lagged(skipped)) => {
                // Events were dropped; the incremental state can no longer
                // be trusted, so rebuild from the database.
                tracing::warn!(skipped, "feed cache lagged behind change bus, reseeding");
                seed(&repository, &feed).await;
            }
            Err(RecvError::Closed) => {
                tracing::info!("change bus closed, stopping feed cache");
                break;
            }
        }
    }
}

/// Replaces the feed contents with a fresh snapshot, retrying until the
/// query succeeds.
async fn seed(repository: &MessageRepository, feed: &Arc<RwLock<MessageFeed>>) {
    loop {
        match repository.get_approved().await {
            Ok(rows) => {
                let snapshot = MessageFeed::seed(rows.into_iter().map(Into::into).collect());
                let count = snapshot.len();
                *feed.write().await = snapshot;
                tracing::info!(messages = count, "wall feed seeded");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to seed wall feed, retrying");
                tokio::time::sleep(RESEED_RETRY_DELAY).await;
            }
        }
    }
}
