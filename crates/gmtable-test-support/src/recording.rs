//! Recording handler that captures every payload it is invoked with.

use std::sync::{Arc, Mutex};

use gmtable_events::{Handler, handler};

/// A handler that records a clone of every payload it receives.
///
/// Register it with `tap.listen(recorder.handler())`; the recorder and the
/// registered handler share one log.
pub struct RecordingHandler<T> {
    received: Arc<Mutex<Vec<T>>>,
    handler: Handler<T>,
}

impl<T: Clone + Send + 'static> RecordingHandler<T> {
    /// Creates a recorder with an empty log.
    #[must_use]
    pub fn new() -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let handler = handler(move |payload: &T| sink.lock().unwrap().push(payload.clone()));
        Self { received, handler }
    }

    /// The handler to register on a tap. Every call returns the same handler.
    pub fn handler(&self) -> &Handler<T> {
        &self.handler
    }

    /// Returns a snapshot of all payloads received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn received(&self) -> Vec<T> {
        self.received.lock().unwrap().clone()
    }

    /// Returns the number of payloads received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

impl<T: Clone + Send + 'static> Default for RecordingHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}
