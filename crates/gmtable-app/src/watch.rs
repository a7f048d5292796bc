//! Logging watchers attached to configured `(tag, id)` pairs.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gmtable_core::identity::Identifiable;
use gmtable_core::record::Record;
use gmtable_events::handler;
use gmtable_hub::{Hub, Subscription};
use tracing::{debug, info};

use crate::config::WatchTarget;

/// One subscription per watch target, each logging what it receives.
#[derive(Debug)]
pub struct Watchers {
    subscriptions: Vec<Subscription<Record>>,
    deliveries: Arc<AtomicUsize>,
}

impl Watchers {
    /// Subscribes to every target and starts logging deliveries.
    ///
    /// Handlers are attached before this returns, so no payload published
    /// afterwards is missed.
    pub fn attach(hub: &Hub<Record>, targets: &[WatchTarget]) -> Self {
        let deliveries = Arc::new(AtomicUsize::new(0));
        let subscriptions = targets
            .iter()
            .map(|target| {
                let subscription = hub.subscribe(target.tag, target.id);
                let subscription_id = subscription.subscription_id();

                let counter = Arc::clone(&deliveries);
                subscription
                    .on_message()
                    .listen(&handler(move |record: &Record| {
                        counter.fetch_add(1, Ordering::Relaxed);
                        info!(
                            tag = %record.tag(),
                            id = record.id(),
                            subscription_id = %subscription_id,
                            "record delivered"
                        );
                    }));
                subscription
                    .on_unsubscribe()
                    .listen(&handler(move |_: &()| {
                        debug!(subscription_id = %subscription_id, "watch ended");
                    }));
                subscription
            })
            .collect();
        Self {
            subscriptions,
            deliveries,
        }
    }

    /// Number of watch subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns `true` if nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Total deliveries across all watchers so far.
    pub fn deliveries(&self) -> usize {
        self.deliveries.load(Ordering::Relaxed)
    }

    /// Unsubscribes every watcher.
    pub fn detach(self) {
        for subscription in &self.subscriptions {
            subscription.unsubscribe();
        }
    }
}
