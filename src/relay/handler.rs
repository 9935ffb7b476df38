use tracing::info;

use crate::relay::message::InboundMessage;

/// Resolution of a delivered message.
///
/// `Ack` permanently removes the message from the subscription's pending
/// set; `Nack` hands it back to the broker, which redelivers per its own
/// retry policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ack,
    Nack(String),
}

/// Processes one delivered message.
///
/// Interprets the payload as UTF-8 text, logs it together with its
/// attributes, and acknowledges. A payload that is not valid UTF-8 is
/// rejected so the broker redelivers it.
///
/// The logging side effect is idempotent; there is no exactly-once
/// guarantee, and a crash between the side effect and the ack means the
/// broker will deliver the message again.
pub fn handle(message: &InboundMessage) -> Outcome {
    match std::str::from_utf8(&message.payload) {
        Ok(text) => {
            info!(
                id = %message.id,
                attributes = ?message.attributes,
                "received message: {}",
                text
            );
            Outcome::Ack
        }
        Err(e) => Outcome::Nack(format!("payload is not valid UTF-8: {}", e)),
    }
}
