//! gmtable Core: identity contract and record schema.
//!
//! This crate defines the `Identifiable` contract that the hub routes on and
//! the closed set of record kinds a scenario is built from. It contains no
//! dispatch or infrastructure code.

pub mod error;
pub mod identity;
pub mod record;

pub use error::RecordError;
pub use identity::{Id, Identifiable};
pub use record::{
    Act, GmcInstance, GmcPoolDefinition, GmcPrototype, GmcValue, Record, RecordTag, Scenario,
    Scene, Scope, ValueKind,
};
