use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::relay::handler::{self, Outcome};
use crate::relay::message::{InboundMessage, OutboundMessage};
use crate::relay::publisher::Publisher;
use crate::storage::blob_store::{BlobStore, FileReference};
use crate::transport::message::{
    HealthResponse, HelloResponse, PublishRequest, PublishResponse, PushEnvelope, WebhookResponse,
};
use crate::utils::error::RelayError;

pub const SERVICE_NAME: &str = "Pub/Sub Service";

/// Attribute keys the relay may override on file-attached publishes.
const ATTR_CONTENT_TYPE: &str = "content_type";
const ATTR_MESSAGE_TYPE: &str = "message_type";

/// Service handles shared by every request.
///
/// Constructed once at startup and injected here so tests can substitute
/// fakes; there are no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub publisher: Arc<dyn Publisher>,
    pub blob_store: Arc<dyn BlobStore>,
}

/// An error response with the `{"detail": ...}` body shape.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        let status = match err {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/publish", post(publish))
        .route("/hello", post(hello))
        .route("/webhook", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the listener and serves until the token is cancelled.
pub async fn serve(
    addr: &str,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
    })
}

/// One publish request, shaped the same whether it arrived as multipart or
/// JSON.
#[derive(Debug, Default)]
struct PublishParts {
    message: Option<String>,
    attributes: Option<Value>,
    file: Option<FileUpload>,
}

#[derive(Debug)]
struct FileUpload {
    filename: String,
    content_type: String,
    content: Vec<u8>,
}

async fn publish(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<PublishResponse>, ApiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let parts = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        read_multipart(multipart).await?
    } else {
        let Json(body) = Json::<PublishRequest>::from_request(request, &())
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        PublishParts {
            message: body.message,
            attributes: body.attributes,
            file: None,
        }
    };

    let outbound = build_outbound(&state, parts).await?;
    let message_id = state.publisher.publish(outbound).await?;
    Ok(Json(PublishResponse {
        success: true,
        message_id,
    }))
}

async fn hello(State(state): State<AppState>) -> Result<Json<HelloResponse>, ApiError> {
    let greeting = "Hello, World!";
    let mut attributes = HashMap::new();
    attributes.insert("origin".to_string(), "pubrelay".to_string());
    attributes.insert("type".to_string(), "greeting".to_string());

    let outbound = OutboundMessage::text(greeting).with_attributes(attributes);
    let message_id = state.publisher.publish(outbound).await?;
    Ok(Json(HelloResponse {
        success: true,
        message: greeting.to_string(),
        message_id,
    }))
}

/// Push-delivery endpoint: the broker calls this directly, bypassing the
/// pull-based subscribe loop, so the decode-and-log step runs inline.
async fn webhook(
    Json(envelope): Json<PushEnvelope>,
) -> Result<Json<WebhookResponse>, ApiError> {
    let Some(message) = envelope.message.filter(|m| !m.is_empty()) else {
        return Err(ApiError::bad_request("Invalid Pub/Sub message format"));
    };

    let payload = BASE64
        .decode(message.data.as_deref().unwrap_or(""))
        .map_err(|e| RelayError::Decode(format!("invalid base64 payload: {}", e)))?;

    let inbound = InboundMessage {
        id: message.message_id.clone().unwrap_or_default(),
        payload,
        attributes: message.attributes.unwrap_or_default(),
    };

    match handler::handle(&inbound) {
        Outcome::Ack => Ok(Json(WebhookResponse {
            success: true,
            message_id: message.message_id,
        })),
        Outcome::Nack(reason) => Err(RelayError::Decode(reason).into()),
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<PublishParts, ApiError> {
    let mut parts = PublishParts::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("message") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?;
                parts.message = Some(text);
            }
            Some("attributes") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?;
                let value = serde_json::from_str(&raw).map_err(|e| {
                    ApiError::bad_request(format!("attributes is not valid JSON: {}", e))
                })?;
                parts.attributes = Some(value);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?
                    .to_vec();
                parts.file = Some(FileUpload {
                    filename,
                    content_type,
                    content,
                });
            }
            _ => {}
        }
    }

    Ok(parts)
}

/// Shapes one publish request into an outbound message.
///
/// A file attachment wins over a text message: its content goes to the blob
/// store and the payload becomes the file-reference JSON, with the reserved
/// attribute keys overriding whatever the caller supplied. Without a file,
/// the payload is the UTF-8 text; with neither, the request is rejected
/// before any backend call.
async fn build_outbound(state: &AppState, parts: PublishParts) -> Result<OutboundMessage, ApiError> {
    let mut attributes = parts
        .attributes
        .as_ref()
        .map(flatten_attributes)
        .transpose()?
        .unwrap_or_default();

    if let Some(file) = parts.file {
        let extension = FileReference::extension_of(&file.filename).map(str::to_owned);
        let blob = state
            .blob_store
            .store(file.content, &file.content_type, extension.as_deref())
            .await?;
        let reference = FileReference::new(&file.filename, &file.content_type, blob);
        let payload = serde_json::to_vec(&reference)
            .map_err(|e| ApiError::from(RelayError::Publish(e.to_string())))?;

        attributes.insert(ATTR_CONTENT_TYPE.to_string(), "application/json".to_string());
        attributes.insert(ATTR_MESSAGE_TYPE.to_string(), "file_reference".to_string());
        return Ok(OutboundMessage {
            payload,
            attributes,
        });
    }

    match parts.message {
        Some(message) if !message.is_empty() => Ok(OutboundMessage {
            payload: message.into_bytes(),
            attributes,
        }),
        _ => Err(RelayError::Validation(
            "Either message or file must be provided".to_string(),
        )
        .into()),
    }
}

/// Reduces a JSON attributes value to the flat string-to-string map the
/// broker accepts. Non-string values are dropped with a warning rather than
/// propagated.
fn flatten_attributes(value: &Value) -> Result<HashMap<String, String>, ApiError> {
    let Value::Object(map) = value else {
        return Err(ApiError::bad_request("attributes must be a JSON object"));
    };

    let mut attributes = HashMap::new();
    for (key, val) in map {
        match val {
            Value::String(s) => {
                attributes.insert(key.clone(), s.clone());
            }
            other => warn!(%key, "ignoring non-string attribute value: {}", other),
        }
    }
    Ok(attributes)
}
