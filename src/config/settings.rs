use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the HTTP server, the Pub/Sub bindings, the blob
/// store, and logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub pubsub: PubsubSettings,
    pub storage: StorageSettings,
    pub log: LogSettings,
}

/// Configuration settings for the HTTP server.
///
/// Defines the host and port the server will bind to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Configuration settings for the Pub/Sub bindings.
///
/// Topic names may be given either as short names or as fully-qualified
/// `projects/<project>/topics/<name>` paths; the `*_path` accessors
/// normalize them.
#[derive(Debug, Deserialize, Clone)]
pub struct PubsubSettings {
    pub project_id: String,
    pub subscription_topic: String,
    pub publishing_topic: String,
    pub subscription_id: String,
}

/// Configuration settings for the blob store gateway.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub bucket: String,
    pub signed_url_ttl_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

impl PubsubSettings {
    /// Fully-qualified path of the topic this process publishes to.
    pub fn publishing_topic_path(&self) -> String {
        topic_path(&self.project_id, &self.publishing_topic)
    }

    /// Fully-qualified path of the topic the subscription is bound to.
    pub fn subscription_topic_path(&self) -> String {
        topic_path(&self.project_id, &self.subscription_topic)
    }
}

/// Normalizes a topic name to its fully-qualified form.
///
/// An already-qualified `projects/...` path is kept as-is; anything else is
/// reduced to its final segment and joined to the configured project.
pub fn topic_path(project_id: &str, topic: &str) -> String {
    if topic.starts_with("projects/") {
        topic.to_string()
    } else {
        let name = topic.rsplit('/').next().unwrap_or(topic);
        format!("projects/{}/topics/{}", project_id, name)
    }
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled
/// using defaults. The flat fields mirror the environment variable names
/// the service accepts (`PROJECT_ID`, `SUBSCRIPTION_TOPIC`,
/// `PUBLISHING_TOPIC`, `SUBSCRIPTION_ID`, `PORT`, `STORAGE_BUCKET`,
/// `LOG_LEVEL`) and take precedence over the sectioned values.
#[derive(Debug, Default, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub pubsub: Option<PartialPubsubSettings>,
    pub storage: Option<PartialStorageSettings>,
    pub log: Option<PartialLogSettings>,

    pub project_id: Option<String>,
    pub subscription_topic: Option<String>,
    pub publishing_topic: Option<String>,
    pub subscription_id: Option<String>,
    pub port: Option<u16>,
    pub storage_bucket: Option<String>,
    pub log_level: Option<String>,
}

/// Partial server settings.
#[derive(Debug, Default, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Partial Pub/Sub settings.
#[derive(Debug, Default, Deserialize)]
pub struct PartialPubsubSettings {
    pub project_id: Option<String>,
    pub subscription_topic: Option<String>,
    pub publishing_topic: Option<String>,
    pub subscription_id: Option<String>,
}

/// Partial blob store settings.
#[derive(Debug, Default, Deserialize)]
pub struct PartialStorageSettings {
    pub bucket: Option<String>,
    pub signed_url_ttl_secs: Option<u64>,
}

/// Partial logging settings.
#[derive(Debug, Default, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is
/// provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            pubsub: PubsubSettings {
                project_id: "local-project".to_string(),
                subscription_topic: "relay-input".to_string(),
                publishing_topic: "relay-output".to_string(),
                subscription_id: "pubrelay-subscription".to_string(),
            },
            storage: StorageSettings {
                bucket: "pubrelay-uploads".to_string(),
                signed_url_ttl_secs: 3600,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}
