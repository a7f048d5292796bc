//! The hub and its publish bridge.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use gmtable_core::identity::{Id, Identifiable};
use gmtable_events::RaisableTap;
use tracing::{debug, trace};

use crate::index::SubscriptionIndex;
use crate::subscription::{Registration, Subscription};

type Index<R> = SubscriptionIndex<(<R as Identifiable>::Tag, Id), Registration<R>>;

/// State owned by the hub and reached weakly by publishers and
/// subscriptions.
pub(crate) struct HubShared<R: Identifiable> {
    index: Mutex<Index<R>>,
}

impl<R: Identifiable> HubShared<R> {
    // Every index operation completes under the lock, so a poisoned lock
    // never exposes a half-applied mutation.
    fn index(&self) -> MutexGuard<'_, Index<R>> {
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes `registration` from `(tag, id)`. Tolerates an absent entry.
    pub(crate) fn unsubscribe(&self, tag: R::Tag, id: Id, registration: &Arc<Registration<R>>) {
        let removed = self.index().remove(&(tag, id), registration);
        if !removed {
            trace!(tag = %tag, id, "unsubscribe found no index entry");
        }
    }

    fn publish(&self, payload: &R) -> usize {
        let key = (payload.tag(), payload.id());
        // The lock is released before any handler runs, so handlers may
        // subscribe or unsubscribe freely.
        let Some(matching) = self.index().snapshot(&key) else {
            trace!(tag = %key.0, id = key.1, "no subscribers");
            return 0;
        };
        let delivered = matching.iter().filter(|r| r.deliver(payload)).count();
        trace!(tag = %key.0, id = key.1, delivered, "published");
        delivered
    }
}

/// Scoped publish/subscribe router.
///
/// Payloads arrive only through the [`Publisher`] handed to the bridge at
/// construction. Each payload is delivered to the subscriptions for its
/// `(tag, id)` pair, in subscription order, before `publish` returns.
/// No ordering is promised between payloads for different pairs.
pub struct Hub<R: Identifiable> {
    shared: Arc<HubShared<R>>,
}

impl<R: Identifiable> Hub<R> {
    /// Creates a hub and hands its publish callback to `bridge`.
    ///
    /// `bridge` runs exactly once, before `new` returns. The channel owner
    /// keeps the [`Publisher`] and calls it with every inbound payload.
    pub fn new<B>(bridge: B) -> Self
    where
        B: FnOnce(Publisher<R>),
    {
        let shared = Arc::new(HubShared {
            index: Mutex::new(SubscriptionIndex::new()),
        });
        bridge(Publisher {
            shared: Arc::downgrade(&shared),
        });
        Self { shared }
    }

    /// Subscribes to every payload routed to `(tag, id)`.
    ///
    /// The id is not checked against anything; subscribing to an entity
    /// that never publishes is legal and simply never delivers.
    ///
    /// Payloads are delivered to handlers listening on
    /// [`Subscription::on_message`] at the time of publish. A payload
    /// published between this call and the first `listen` is missed.
    pub fn subscribe(&self, tag: R::Tag, id: Id) -> Subscription<R> {
        let registration = Arc::new(Registration::new(tag, id, Arc::downgrade(&self.shared)));
        debug!(
            tag = %tag,
            id,
            subscription_id = %registration.subscription_id,
            "subscribed"
        );
        self.shared
            .index()
            .insert((tag, id), Arc::clone(&registration));
        Subscription::new(registration)
    }

    /// Number of live subscriptions for `(tag, id)`.
    pub fn subscriber_count(&self, tag: R::Tag, id: Id) -> usize {
        self.shared.index().count(&(tag, id))
    }

    /// Number of `(tag, id)` pairs with at least one live subscription.
    pub fn indexed_keys(&self) -> usize {
        self.shared.index().key_count()
    }

    /// Returns `true` when no subscription is live.
    pub fn is_idle(&self) -> bool {
        self.indexed_keys() == 0
    }
}

impl<R: Identifiable> fmt::Debug for Hub<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("indexed_keys", &self.indexed_keys())
            .finish()
    }
}

/// The hub's inbound callback, handed to the publish bridge.
///
/// Holds the hub weakly: once the hub is dropped, publishing does nothing.
pub struct Publisher<R: Identifiable> {
    shared: Weak<HubShared<R>>,
}

impl<R: Identifiable> Publisher<R> {
    /// Routes `payload` to the subscriptions for its `(tag, id)` pair.
    ///
    /// Returns the number of subscriptions it was delivered to.
    pub fn publish(&self, payload: &R) -> usize {
        self.shared
            .upgrade()
            .map_or(0, |shared| shared.publish(payload))
    }

    /// Returns `true` while the hub is alive.
    pub fn is_connected(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl<R: Identifiable> Clone for Publisher<R> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<R: Identifiable> fmt::Debug for Publisher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl<R: Identifiable> RaisableTap<R> for Publisher<R> {
    fn raise(&self, payload: &R) {
        self.publish(payload);
    }
}
