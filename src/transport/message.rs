use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON body of a publish request.
///
/// `attributes` is kept as raw JSON here so non-string values can be
/// dropped with a warning instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct PublishRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub attributes: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub success: bool,
    pub message_id: String,
}

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub success: bool,
    pub message: String,
    pub message_id: String,
}

/// Push-delivery envelope posted by the broker to the webhook endpoint.
#[derive(Debug, Deserialize)]
pub struct PushEnvelope {
    #[serde(default)]
    pub message: Option<PushMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PushMessage {
    /// Base64-encoded payload.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub attributes: Option<HashMap<String, String>>,
    #[serde(default, rename = "messageId")]
    pub message_id: Option<String>,
}

impl PushMessage {
    /// An envelope whose `message` carries no fields at all is treated the
    /// same as a missing one.
    pub fn is_empty(&self) -> bool {
        self.data.is_none() && self.attributes.is_none() && self.message_id.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    #[serde(rename = "messageId")]
    pub message_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}
