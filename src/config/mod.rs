mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

use settings::Settings;

pub use settings::{
    LogSettings, PubsubSettings, ServerSettings, StorageSettings, topic_path,
};

#[cfg(test)]
mod tests;

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the server, pubsub, storage and
/// log configurations
///
/// The flat environment names (`PROJECT_ID`, `SUBSCRIPTION_TOPIC`,
/// `PUBLISHING_TOPIC`, `SUBSCRIPTION_ID`, `PORT`, `STORAGE_BUCKET`,
/// `LOG_LEVEL`) win over sectioned file values.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().try_parsing(true));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .port
                .or_else(|| partial.server.as_ref().and_then(|s| s.port))
                .unwrap_or(default.server.port),
        },
        pubsub: PubsubSettings {
            project_id: partial
                .project_id
                .clone()
                .or_else(|| partial.pubsub.as_ref().and_then(|p| p.project_id.clone()))
                .unwrap_or(default.pubsub.project_id),
            subscription_topic: partial
                .subscription_topic
                .clone()
                .or_else(|| {
                    partial
                        .pubsub
                        .as_ref()
                        .and_then(|p| p.subscription_topic.clone())
                })
                .unwrap_or(default.pubsub.subscription_topic),
            publishing_topic: partial
                .publishing_topic
                .clone()
                .or_else(|| {
                    partial
                        .pubsub
                        .as_ref()
                        .and_then(|p| p.publishing_topic.clone())
                })
                .unwrap_or(default.pubsub.publishing_topic),
            subscription_id: partial
                .subscription_id
                .clone()
                .or_else(|| {
                    partial
                        .pubsub
                        .as_ref()
                        .and_then(|p| p.subscription_id.clone())
                })
                .unwrap_or(default.pubsub.subscription_id),
        },
        storage: StorageSettings {
            bucket: partial
                .storage_bucket
                .clone()
                .or_else(|| partial.storage.as_ref().and_then(|s| s.bucket.clone()))
                .unwrap_or(default.storage.bucket),
            signed_url_ttl_secs: partial
                .storage
                .as_ref()
                .and_then(|s| s.signed_url_ttl_secs)
                .unwrap_or(default.storage.signed_url_ttl_secs),
        },
        log: LogSettings {
            level: partial
                .log_level
                .clone()
                .or_else(|| partial.log.as_ref().and_then(|l| l.level.clone()))
                .unwrap_or(default.log.level),
        },
    })
}
