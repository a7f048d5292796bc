//! Shared test doubles and fixtures for the gmtable scenario tracker.

mod bridge;
mod fixtures;
mod recording;

pub use bridge::ManualBridge;
pub use fixtures::{act, gmc, scenario, scene};
pub use recording::RecordingHandler;
