use std::time::Duration;

use async_trait::async_trait;
use google_cloud_pubsub::client::Client;
use google_cloud_pubsub::subscription::{Subscription, SubscriptionConfig};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::relay::handler::{self, Outcome};
use crate::relay::message::InboundMessage;
use crate::utils::error::RelayError;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Administrative view of the subscription binding, split out so the
/// startup provisioning step can be exercised against a fake in tests.
#[async_trait]
pub trait SubscriptionAdmin: Send + Sync {
    /// Whether the subscription already exists.
    async fn exists(&self) -> Result<bool, RelayError>;

    /// Creates the subscription bound to the given fully-qualified topic.
    async fn create(&self, topic_path: &str) -> Result<(), RelayError>;
}

/// `SubscriptionAdmin` backed by Google Cloud Pub/Sub.
pub struct PubsubSubscriptionAdmin {
    subscription: Subscription,
}

impl PubsubSubscriptionAdmin {
    pub fn new(client: &Client, subscription_id: &str) -> Self {
        Self {
            subscription: client.subscription(subscription_id),
        }
    }

    /// Handle to the underlying subscription, for the receive loop.
    pub fn subscription(&self) -> Subscription {
        self.subscription.clone()
    }
}

#[async_trait]
impl SubscriptionAdmin for PubsubSubscriptionAdmin {
    async fn exists(&self) -> Result<bool, RelayError> {
        self.subscription
            .exists(None)
            .await
            .map_err(|e| RelayError::SubscriptionSetup(e.to_string()))
    }

    async fn create(&self, topic_path: &str) -> Result<(), RelayError> {
        self.subscription
            .create(topic_path, SubscriptionConfig::default(), None)
            .await
            .map_err(|e| RelayError::SubscriptionSetup(e.to_string()))
    }
}

/// Resolves the subscription binding at startup.
///
/// Idempotent: only a definitive "does not exist" answer triggers a create;
/// a second run is a no-op. A failed existence check is returned as an
/// error rather than being treated as absence, since a transient lookup
/// failure does not mean the subscription is missing.
///
/// Returns `true` when the subscription was created by this call.
pub async fn ensure_subscription(
    admin: &dyn SubscriptionAdmin,
    topic_path: &str,
) -> Result<bool, RelayError> {
    if admin.exists().await? {
        return Ok(false);
    }
    admin.create(topic_path).await?;
    info!(topic = %topic_path, "subscription created");
    Ok(true)
}

/// Runs the subscribe loop until cancelled.
///
/// Each delivery is dispatched to the message handler exactly once on
/// arrival, and acked or nacked based on its outcome. The blocking receive
/// session is supervised: on failure it restarts with bounded exponential
/// backoff instead of silently dying, and the backoff resets once a session
/// has stayed healthy past the cap.
pub async fn run_listener(subscription: Subscription, cancel: CancellationToken) {
    let mut backoff = INITIAL_BACKOFF;

    loop {
        let started = tokio::time::Instant::now();
        let session = subscription
            .receive(
                |message, _cancel| async move {
                    let inbound = InboundMessage {
                        id: message.message.message_id.clone(),
                        payload: message.message.data.clone().into(),
                        attributes: message.message.attributes.clone(),
                    };
                    match handler::handle(&inbound) {
                        Outcome::Ack => {
                            if let Err(e) = message.ack().await {
                                warn!(id = %inbound.id, error = %e, "failed to ack message");
                            }
                        }
                        Outcome::Nack(reason) => {
                            warn!(id = %inbound.id, %reason, "rejecting message");
                            if let Err(e) = message.nack().await {
                                warn!(id = %inbound.id, error = %e, "failed to nack message");
                            }
                        }
                    }
                },
                cancel.clone(),
                None,
            )
            .await;

        if cancel.is_cancelled() {
            break;
        }
        match session {
            Ok(()) => warn!("receive session ended; restarting"),
            Err(e) => error!(error = %e, backoff_secs = backoff.as_secs(), "receive session failed"),
        }
        if started.elapsed() >= MAX_BACKOFF {
            backoff = INITIAL_BACKOFF;
        }
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(backoff) => {}
        }
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }

    info!("subscriber stopped");
}
