//! Manual publish bridge for driving the hub's inbound channel from a test.

use gmtable_core::identity::Identifiable;
use gmtable_hub::{Hub, Publisher};

/// A publish bridge whose channel is the test itself.
#[derive(Debug)]
pub struct ManualBridge<R: Identifiable> {
    publisher: Publisher<R>,
}

impl<R: Identifiable> ManualBridge<R> {
    /// Creates a hub wired to a manual bridge.
    ///
    /// # Panics
    ///
    /// Panics if the hub does not invoke its bridge during construction.
    #[must_use]
    pub fn connect() -> (Hub<R>, Self) {
        let mut captured = None;
        let hub = Hub::new(|publisher| captured = Some(publisher));
        let publisher = captured.expect("Hub::new must invoke the publish bridge");
        (hub, Self { publisher })
    }

    /// Pushes `payload` into the hub. Returns the number of deliveries.
    pub fn publish(&self, payload: &R) -> usize {
        self.publisher.publish(payload)
    }

    /// The captured publisher, for wiring into other channels.
    pub fn publisher(&self) -> &Publisher<R> {
        &self.publisher
    }
}
