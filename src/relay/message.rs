use std::collections::HashMap;

/// A message on its way to the publish topic.
///
/// Created per publish request by the HTTP ingress; immutable after
/// creation, and ownership ends once handed to the publish client.
///
/// # Fields
///
/// - `payload` - The raw message bytes.
/// - `attributes` - A flat string-to-string attribute map. Keys are unique,
///   order is irrelevant, and nested values are never allowed here.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub payload: Vec<u8>,
    pub attributes: HashMap<String, String>,
}

impl OutboundMessage {
    /// Creates a text message with no attributes.
    pub fn text(body: &str) -> Self {
        Self {
            payload: body.as_bytes().to_vec(),
            attributes: HashMap::new(),
        }
    }

    /// Replaces the attribute map.
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }
}

/// A message delivered by the broker.
///
/// Observed read-only by the message handler; its lifecycle (redelivery,
/// expiry) is owned entirely by the broker. The payload holds the raw bytes
/// after the wire's base64 layer has been removed.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: String,
    pub payload: Vec<u8>,
    pub attributes: HashMap<String, String>,
}
