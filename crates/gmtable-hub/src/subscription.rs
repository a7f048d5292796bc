//! Subscription handles.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use gmtable_core::identity::{Id, Identifiable};
use gmtable_events::{ListenableTap, RaisableTap, Tap};
use tracing::debug;
use uuid::Uuid;

use crate::hub::HubShared;

/// The state shared between a [`Subscription`] handle and the hub index.
pub(crate) struct Registration<R: Identifiable> {
    pub(crate) subscription_id: Uuid,
    pub(crate) tag: R::Tag,
    pub(crate) id: Id,
    active: AtomicBool,
    on_message: Tap<R>,
    on_unsubscribe: Tap<()>,
    // Navigation only: removal goes through the hub, never the index directly.
    hub: Weak<HubShared<R>>,
}

impl<R: Identifiable> Registration<R> {
    pub(crate) fn new(tag: R::Tag, id: Id, hub: Weak<HubShared<R>>) -> Self {
        Self {
            subscription_id: Uuid::new_v4(),
            tag,
            id,
            active: AtomicBool::new(true),
            on_message: Tap::new(),
            on_unsubscribe: Tap::new(),
            hub,
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Raises `payload` on the message tap unless this registration has
    /// been unsubscribed. Returns whether the payload was delivered.
    pub(crate) fn deliver(&self, payload: &R) -> bool {
        if !self.is_active() {
            return false;
        }
        self.on_message.raise(payload);
        true
    }
}

/// A registration for every payload the hub routes to one `(tag, id)` pair.
///
/// Clones refer to the same registration. Dropping a handle does not
/// unsubscribe; call [`Subscription::unsubscribe`].
///
/// Lifecycle: `Active` until the first `unsubscribe`, then `Unsubscribed`
/// for good.
pub struct Subscription<R: Identifiable> {
    registration: Arc<Registration<R>>,
}

impl<R: Identifiable> Subscription<R> {
    pub(crate) fn new(registration: Arc<Registration<R>>) -> Self {
        Self { registration }
    }

    /// The tag this subscription is scoped to.
    pub fn tag(&self) -> R::Tag {
        self.registration.tag
    }

    /// The id this subscription is scoped to.
    pub fn id(&self) -> Id {
        self.registration.id
    }

    /// Unique identifier of this registration, for diagnostics.
    pub fn subscription_id(&self) -> Uuid {
        self.registration.subscription_id
    }

    /// Returns `true` until [`Self::unsubscribe`] is first called.
    pub fn is_active(&self) -> bool {
        self.registration.is_active()
    }

    /// Delivered payloads.
    pub fn on_message(&self) -> &dyn ListenableTap<R> {
        &self.registration.on_message
    }

    /// Raised once, when this subscription is unsubscribed.
    pub fn on_unsubscribe(&self) -> &dyn ListenableTap<()> {
        &self.registration.on_unsubscribe
    }

    /// Removes this subscription from its hub and raises
    /// [`Self::on_unsubscribe`].
    ///
    /// Only the first call has any effect. If the hub has already been
    /// dropped the index removal is skipped but the notification still
    /// fires.
    pub fn unsubscribe(&self) {
        let registration = &self.registration;
        if !registration.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(hub) = registration.hub.upgrade() {
            hub.unsubscribe(registration.tag, registration.id, registration);
        }
        debug!(
            tag = %registration.tag,
            id = registration.id,
            subscription_id = %registration.subscription_id,
            "unsubscribed"
        );
        registration.on_unsubscribe.raise(&());
    }
}

impl<R: Identifiable> Clone for Subscription<R> {
    fn clone(&self) -> Self {
        Self {
            registration: Arc::clone(&self.registration),
        }
    }
}

impl<R: Identifiable> fmt::Debug for Subscription<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("subscription_id", &self.registration.subscription_id)
            .field("tag", &self.registration.tag)
            .field("id", &self.registration.id)
            .field("active", &self.is_active())
            .finish()
    }
}
