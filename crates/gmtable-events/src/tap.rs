//! Event tap abstraction.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A shared event handler.
///
/// Handler identity is the identity of the `Arc` allocation: clones of one
/// handler are the same handler, two separately created handlers are not,
/// even if they wrap identical closures.
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Wraps a closure as a [`Handler`].
#[must_use]
pub fn handler<T, F>(f: F) -> Handler<T>
where
    F: Fn(&T) + Send + Sync + 'static,
{
    Arc::new(f)
}

fn same_handler<T>(a: &Handler<T>, b: &Handler<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// A tap that handlers can be added to and removed from, but that cannot be
/// raised through.
pub trait ListenableTap<T> {
    /// Registers `handler` for future raises. Registering a handler that is
    /// already present has no effect.
    fn listen(&self, handler: &Handler<T>);

    /// Unregisters `handler`. Removing an absent handler has no effect.
    fn remove(&self, handler: &Handler<T>);
}

/// A tap that can be raised, but whose handlers cannot be changed.
pub trait RaisableTap<T> {
    /// Invokes the registered handlers with `payload`.
    fn raise(&self, payload: &T);
}

/// A tap that can be both listened to and raised.
pub trait EventTap<T>: ListenableTap<T> + RaisableTap<T> {}

impl<T, X> EventTap<T> for X where X: ListenableTap<T> + RaisableTap<T> + ?Sized {}

impl<T, X: ListenableTap<T> + ?Sized> ListenableTap<T> for &X {
    fn listen(&self, handler: &Handler<T>) {
        (**self).listen(handler);
    }

    fn remove(&self, handler: &Handler<T>) {
        (**self).remove(handler);
    }
}

impl<T, X: RaisableTap<T> + ?Sized> RaisableTap<T> for &X {
    fn raise(&self, payload: &T) {
        (**self).raise(payload);
    }
}

impl<T, X: ListenableTap<T> + ?Sized> ListenableTap<T> for Arc<X> {
    fn listen(&self, handler: &Handler<T>) {
        (**self).listen(handler);
    }

    fn remove(&self, handler: &Handler<T>) {
        (**self).remove(handler);
    }
}

impl<T, X: RaisableTap<T> + ?Sized> RaisableTap<T> for Arc<X> {
    fn raise(&self, payload: &T) {
        (**self).raise(payload);
    }
}

/// The concrete event tap.
///
/// Handlers run in registration order. `raise` works on a snapshot of the
/// handler list taken when it starts: handlers added during a raise are
/// first invoked by the next raise, and handlers removed during a raise are
/// still invoked by the current one. No lock is held while handlers run, so
/// a handler may listen, remove or raise on the same tap.
pub struct Tap<T> {
    handlers: Mutex<Vec<Handler<T>>>,
}

impl<T> Tap<T> {
    /// Creates a tap with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers().len()
    }

    /// Returns `true` if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers().is_empty()
    }

    // The list is never left half-updated, so a poisoned lock is still usable.
    fn handlers(&self) -> MutexGuard<'_, Vec<Handler<T>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for Tap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Tap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tap")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

impl<T> ListenableTap<T> for Tap<T> {
    fn listen(&self, handler: &Handler<T>) {
        let mut handlers = self.handlers();
        if !handlers.iter().any(|h| same_handler(h, handler)) {
            handlers.push(Arc::clone(handler));
        }
    }

    fn remove(&self, handler: &Handler<T>) {
        self.handlers().retain(|h| !same_handler(h, handler));
    }
}

impl<T> RaisableTap<T> for Tap<T> {
    fn raise(&self, payload: &T) {
        let snapshot = self.handlers().clone();
        tracing::trace!(handlers = snapshot.len(), "raising tap");
        for h in &snapshot {
            h(payload);
        }
    }
}

/// A tap that accepts every call and does nothing.
///
/// Useful as a default collaborator where no channel is wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTap;

impl<T> ListenableTap<T> for NullTap {
    fn listen(&self, _handler: &Handler<T>) {}

    fn remove(&self, _handler: &Handler<T>) {}
}

impl<T> RaisableTap<T> for NullTap {
    fn raise(&self, _payload: &T) {}
}
