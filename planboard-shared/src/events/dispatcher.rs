/// Event dispatcher task
///
/// Drains the in-process event channel and publishes each event to its
/// Redis channel. Publish failures are logged and swallowed; the write that
/// raised the event already committed, so the only correct move is to keep
/// draining.

use tokio::sync::mpsc::UnboundedReceiver;

use super::PlanEvent;
use crate::redis::RedisClient;

/// Runs the dispatch loop until the sender side closes
///
/// Spawn this on its own task at startup:
///
/// ```no_run
/// use planboard_shared::events::{run_dispatcher, EventSender};
/// use planboard_shared::redis::{RedisClient, RedisConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let redis = RedisClient::new(RedisConfig::from_env()?).await?;
/// let (events, rx) = EventSender::new();
/// tokio::spawn(run_dispatcher(rx, redis));
/// # Ok(())
/// # }
/// ```
pub async fn run_dispatcher(mut rx: UnboundedReceiver<PlanEvent>, redis: RedisClient) {
    while let Some(event) = rx.recv().await {
        let channel = event.channel();
        let payload = event.payload();

        match redis.publish(&channel, &payload).await {
            Ok(receivers) => {
                tracing::debug!(%channel, receivers, "published event");
            }
            Err(e) => {
                tracing::warn!(%channel, error = %e, "failed to publish event");
            }
        }
    }

    tracing::info!("event dispatcher shutting down");
}
