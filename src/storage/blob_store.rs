use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use google_cloud_storage::client::Client;
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use google_cloud_storage::sign::{SignedURLMethod, SignedURLOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::utils::error::RelayError;

/// Result of storing a blob: where it lives and how to read it for a while.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// Storage locator in `gs://<bucket>/<key>` form.
    pub locator: String,
    /// Signed, time-bounded, credential-less read URL.
    pub access_url: String,
    /// When the read URL stops working.
    pub expires_at: DateTime<Utc>,
}

/// Gateway to the managed blob store.
///
/// A single upload attempt per call; errors surface to the caller. Keys are
/// generated fresh per upload, so concurrent stores never overwrite each
/// other and a failed upload leaves nothing to clean up.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(
        &self,
        content: Vec<u8>,
        content_type: &str,
        extension: Option<&str>,
    ) -> Result<StoredBlob, RelayError>;
}

/// Payload published in place of an attached file.
///
/// Serialized as JSON into the outgoing message; the receiver follows
/// `signed_url` until `url_expiry` or resolves `storage_path` itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReference {
    pub filename: String,
    pub content_type: String,
    pub storage_path: String,
    pub signed_url: String,
    pub url_expiry: DateTime<Utc>,
}

impl FileReference {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        blob: StoredBlob,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            storage_path: blob.locator,
            signed_url: blob.access_url,
            url_expiry: blob.expires_at,
        }
    }

    /// Extension of a filename, if it has a non-empty one.
    pub fn extension_of(filename: &str) -> Option<&str> {
        filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }
}

/// Generates a globally-unique object key, keeping the original extension
/// when one is given. An empty extension is tolerated (no suffix).
pub fn generate_object_key(extension: Option<&str>) -> String {
    let id = Uuid::new_v4();
    match extension {
        Some(ext) if !ext.is_empty() => format!("{}.{}", id, ext),
        _ => id.to_string(),
    }
}

/// `BlobStore` backed by a Google Cloud Storage bucket.
pub struct GcsBlobStore {
    client: Client,
    bucket: String,
    url_ttl: Duration,
}

impl GcsBlobStore {
    pub fn new(client: Client, bucket: impl Into<String>, url_ttl: Duration) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            url_ttl,
        }
    }
}

#[async_trait]
impl BlobStore for GcsBlobStore {
    async fn store(
        &self,
        content: Vec<u8>,
        content_type: &str,
        extension: Option<&str>,
    ) -> Result<StoredBlob, RelayError> {
        let key = generate_object_key(extension);

        let mut media = Media::new(key.clone());
        media.content_type = content_type.to_string().into();
        let request = UploadObjectRequest {
            bucket: self.bucket.clone(),
            ..Default::default()
        };
        self.client
            .upload_object(&request, content, &UploadType::Simple(media))
            .await
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        let access_url = self
            .client
            .signed_url(
                &self.bucket,
                &key,
                None,
                None,
                SignedURLOptions {
                    method: SignedURLMethod::GET,
                    expires: self.url_ttl,
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        let expires_at = Utc::now() + chrono::Duration::seconds(self.url_ttl.as_secs() as i64);
        let locator = format!("gs://{}/{}", self.bucket, key);
        debug!(%locator, "stored blob");

        Ok(StoredBlob {
            locator,
            access_url,
            expires_at,
        })
    }
}
