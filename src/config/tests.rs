use serial_test::serial;

use super::load_config;
use super::settings::{Settings, topic_path};

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.pubsub.project_id, "local-project");
    assert_eq!(settings.pubsub.subscription_id, "pubrelay-subscription");
    assert_eq!(settings.storage.bucket, "pubrelay-uploads");
    assert_eq!(settings.storage.signed_url_ttl_secs, 3600);
    assert_eq!(settings.log.level, "info");
}

#[test]
fn test_topic_path_from_short_name() {
    assert_eq!(
        topic_path("proj-a", "events"),
        "projects/proj-a/topics/events"
    );
}

#[test]
fn test_topic_path_keeps_fully_qualified() {
    assert_eq!(
        topic_path("proj-a", "projects/proj-b/topics/events"),
        "projects/proj-b/topics/events"
    );
}

#[test]
fn test_topic_path_uses_last_segment() {
    // A partial path that is not fully qualified collapses to its last segment.
    assert_eq!(
        topic_path("proj-a", "topics/events"),
        "projects/proj-a/topics/events"
    );
}

#[test]
fn test_publishing_topic_path_is_normalized() {
    let mut settings = Settings::default();
    settings.pubsub.project_id = "proj-a".to_string();
    settings.pubsub.publishing_topic = "outgoing".to_string();
    assert_eq!(
        settings.pubsub.publishing_topic_path(),
        "projects/proj-a/topics/outgoing"
    );
}

#[test]
#[serial]
fn test_load_config_defaults_without_env() {
    temp_env::with_vars_unset(
        [
            "PROJECT_ID",
            "SUBSCRIPTION_TOPIC",
            "PUBLISHING_TOPIC",
            "SUBSCRIPTION_ID",
            "PORT",
            "STORAGE_BUCKET",
            "LOG_LEVEL",
        ],
        || {
            let settings = load_config().unwrap();
            assert_eq!(settings.server.port, 8080);
            assert_eq!(settings.pubsub.project_id, "local-project");
        },
    );
}

#[test]
#[serial]
fn test_load_config_env_overrides() {
    temp_env::with_vars(
        [
            ("PROJECT_ID", Some("proj-live")),
            ("SUBSCRIPTION_TOPIC", Some("incoming")),
            ("PUBLISHING_TOPIC", Some("projects/proj-live/topics/outgoing")),
            ("SUBSCRIPTION_ID", Some("relay-sub")),
            ("PORT", Some("9090")),
            ("STORAGE_BUCKET", Some("uploads-live")),
            ("LOG_LEVEL", Some("debug")),
        ],
        || {
            let settings = load_config().unwrap();
            assert_eq!(settings.server.port, 9090);
            assert_eq!(settings.pubsub.project_id, "proj-live");
            assert_eq!(
                settings.pubsub.subscription_topic_path(),
                "projects/proj-live/topics/incoming"
            );
            assert_eq!(
                settings.pubsub.publishing_topic_path(),
                "projects/proj-live/topics/outgoing"
            );
            assert_eq!(settings.pubsub.subscription_id, "relay-sub");
            assert_eq!(settings.storage.bucket, "uploads-live");
            assert_eq!(settings.log.level, "debug");
        },
    );
}
