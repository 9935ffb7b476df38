use async_trait::async_trait;
use google_cloud_googleapis::pubsub::v1::PubsubMessage;
use google_cloud_pubsub::client::Client;
use google_cloud_pubsub::publisher::Publisher as TopicPublisher;
use tokio::sync::Mutex;
use tracing::debug;

use crate::relay::message::OutboundMessage;
use crate::utils::error::RelayError;

/// The publish side of the relay.
///
/// One attempt per call; any transport or backend error is reported
/// synchronously to the caller, which decides whether to retry. On success
/// the broker has durably queued the message for at least one delivery to
/// each active subscription; no ordering relative to other publishes is
/// guaranteed.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Sends one message to the fixed destination topic and returns the
    /// broker-assigned message id.
    async fn publish(&self, message: OutboundMessage) -> Result<String, RelayError>;
}

/// `Publisher` backed by a Google Cloud Pub/Sub topic.
pub struct PubsubPublisher {
    // The SDK publisher wants &mut for shutdown; publish itself only
    // enqueues, so the lock is held briefly.
    inner: Mutex<TopicPublisher>,
    topic: String,
}

impl PubsubPublisher {
    /// Binds a publisher to the given fully-qualified topic path.
    pub fn new(client: &Client, topic_path: &str) -> Self {
        let topic = client.topic(topic_path);
        Self {
            inner: Mutex::new(topic.new_publisher(None)),
            topic: topic_path.to_string(),
        }
    }

    /// Flushes pending publishes and closes the underlying connection.
    pub async fn shutdown(&self) {
        self.inner.lock().await.shutdown().await;
    }
}

#[async_trait]
impl Publisher for PubsubPublisher {
    async fn publish(&self, message: OutboundMessage) -> Result<String, RelayError> {
        if message.payload.is_empty() {
            return Err(RelayError::Publish("payload must not be empty".to_string()));
        }

        let msg = PubsubMessage {
            data: message.payload.into(),
            attributes: message.attributes,
            ..Default::default()
        };

        let awaiter = { self.inner.lock().await.publish(msg).await };
        let message_id = awaiter
            .get()
            .await
            .map_err(|e| RelayError::Publish(e.to_string()))?;

        debug!(topic = %self.topic, message_id = %message_id, "published message");
        Ok(message_id)
    }
}
