//! gmtable Hub: scoped publish/subscribe routing.
//!
//! A [`Hub`] receives every inbound payload through one publish bridge wired
//! at construction, and delivers each payload only to the subscriptions made
//! for the payload's `(tag, id)` pair.
//!
//! ```text
//!   external channel ──► Publisher ──► Hub index ──► Subscription::on_message
//!                        (bridge)     (tag, id)
//! ```

mod hub;
mod index;
mod subscription;

pub use hub::{Hub, Publisher};
pub use subscription::Subscription;
