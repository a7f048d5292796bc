//! gmtable entry point.

use std::error::Error;

use gmtable_app::config::AppConfig;
use gmtable_app::feed;
use gmtable_app::watch::Watchers;
use gmtable_core::record::Record;
use gmtable_hub::Hub;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting gmtable");

    let config = AppConfig::from_env()?;

    // Pumping starts only after the watchers are attached.
    let mut inbound = None;
    let hub: Hub<Record> = Hub::new(|publisher| inbound = Some(publisher));
    let Some(publisher) = inbound else {
        tracing::warn!("Hub did not invoke its publish bridge, no feed will run");
        return Ok(());
    };

    let watchers = Watchers::attach(&hub, &config.watch);
    tracing::info!(targets = watchers.len(), "Watchers attached");

    let source = feed::open(&config.feed).await?;
    let stats = feed::run(source, config.channel_capacity, &publisher).await?;
    tracing::info!(
        published = stats.published,
        skipped = stats.skipped,
        deliveries = stats.deliveries,
        "Feed exhausted"
    );

    watchers.detach();
    if !hub.is_idle() {
        tracing::warn!(keys = hub.indexed_keys(), "Subscriptions outlived shutdown");
    }

    Ok(())
}
