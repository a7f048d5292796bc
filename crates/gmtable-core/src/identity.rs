//! Identity contract for routed payloads.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Opaque entity identifier, unique within a tag.
pub type Id = u64;

/// Trait for payloads that are identified by value rather than by reference.
///
/// A payload carries an immutable type tag drawn from a closed set and an id
/// that is unique within that tag. Nothing else about the payload is
/// inspected by the hub.
pub trait Identifiable: Send + Sync + 'static {
    /// The closed set of tags this payload family is drawn from.
    type Tag: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static;

    /// Returns the type tag.
    fn tag(&self) -> Self::Tag;

    /// Returns the id, unique within [`Self::tag`].
    fn id(&self) -> Id;
}
