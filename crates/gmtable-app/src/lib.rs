//! gmtable App: bootstrap for the scenario tracker.
//!
//! Loads configuration, runs a background worker that reads records from a
//! feed, pumps them into the hub through its publish bridge, and attaches
//! logging watchers to the configured `(tag, id)` pairs.

pub mod config;
pub mod error;
pub mod feed;
pub mod watch;
