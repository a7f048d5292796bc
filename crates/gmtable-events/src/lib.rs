//! gmtable Events: in-process event taps.
//!
//! A tap is the smallest observer primitive in the workspace: handlers are
//! registered and removed, and `raise` synchronously invokes every handler
//! registered at the moment of the call.
//!
//! Two restricted capabilities exist. [`ListenableTap`] can only register
//! and remove handlers, [`RaisableTap`] can only raise. A full [`EventTap`]
//! is anything providing both, so handing a consumer `&dyn ListenableTap<T>`
//! attenuates what it can do with the underlying tap.

pub mod combinators;
pub mod tap;

pub use combinators::{forward, map};
pub use tap::{EventTap, Handler, ListenableTap, NullTap, RaisableTap, Tap, handler};
