use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use pubrelay::config::load_config;
use pubrelay::relay::publisher::PubsubPublisher;
use pubrelay::relay::subscriber::{self, PubsubSubscriptionAdmin};
use pubrelay::storage::blob_store::GcsBlobStore;
use pubrelay::transport::http::{self, AppState};
use pubrelay::utils::logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = load_config().expect("Failed to load configuration");
    logging::init(&config.log.level);

    let pubsub_config = google_cloud_pubsub::client::ClientConfig::default()
        .with_auth()
        .await
        .expect("Failed to resolve Pub/Sub credentials");
    let pubsub_client = google_cloud_pubsub::client::Client::new(pubsub_config)
        .await
        .expect("Failed to create Pub/Sub client");

    let storage_config = google_cloud_storage::client::ClientConfig::default()
        .with_auth()
        .await
        .expect("Failed to resolve storage credentials");
    let storage_client = google_cloud_storage::client::Client::new(storage_config);

    let publisher = Arc::new(PubsubPublisher::new(
        &pubsub_client,
        &config.pubsub.publishing_topic_path(),
    ));
    let blob_store = Arc::new(GcsBlobStore::new(
        storage_client,
        config.storage.bucket.clone(),
        Duration::from_secs(config.storage.signed_url_ttl_secs),
    ));

    let cancel = CancellationToken::new();

    // Resolve the subscription binding; a setup failure degrades the
    // process (HTTP stays up, no live delivery) instead of aborting it.
    let admin = PubsubSubscriptionAdmin::new(&pubsub_client, &config.pubsub.subscription_id);
    match subscriber::ensure_subscription(&admin, &config.pubsub.subscription_topic_path()).await {
        Ok(_created) => {
            info!(
                subscription = %config.pubsub.subscription_id,
                "listening for messages"
            );
            let subscription = admin.subscription();
            let listener_cancel = cancel.clone();
            tokio::spawn(async move {
                subscriber::run_listener(subscription, listener_cancel).await;
            });
        }
        Err(e) => {
            error!(
                error = %e,
                "subscription setup failed; continuing without live message delivery"
            );
        }
    }

    let state = AppState {
        publisher: publisher.clone(),
        blob_store,
    };
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            shutdown.cancel();
        }
    });

    if let Err(e) = http::serve(&addr, state, cancel.clone()).await {
        error!(error = %e, "HTTP server error");
    }

    // Stop accepting deliveries first, then close the publish side so
    // in-flight acknowledgments are not dropped.
    cancel.cancel();
    publisher.shutdown().await;
    info!("shutdown complete");
}
