//! Rill Dataflow - incremental multiset views with edge-triggered delta
//! propagation.
//!
//! A base `Multiset` is an in-memory bag of records mutated through
//! `insert`/`delete`/`update`. Derived views - filter, map/select/scalar,
//! n-ary intersection and union, difference, distinct - subscribe to their
//! parents' insert/delete events and keep a live cache current without ever
//! rescanning the whole dataset, re-firing their own events transitively.
//! Scalar aggregates (count, sum, mean, min, max) track a single live value
//! the same way.
//!
//! Propagation is single-threaded and synchronous: a mutation call returns
//! only after every transitively dependent view has settled. Views are
//! read-only; direct mutation is rejected with `Error::ReadOnlyView`.
//!
//! # Example
//!
//! ```rust
//! use rill_dataflow::{Multiset, Value};
//!
//! let base = Multiset::new(vec![
//!     Value::object([("name", Value::from("sphinx")), ("eyes", Value::from(2))]),
//!     Value::object([("name", Value::from("hydra")), ("eyes", Value::from(18))]),
//! ]);
//!
//! let many_eyed = base.filter(|m| {
//!     m.get("eyes").and_then(|v| v.as_i64()).map(|n| n > 2).unwrap_or(false)
//! });
//! assert_eq!(many_eyed.len(), 1);
//!
//! base.insert(Value::object([
//!     ("name", Value::from("argus")),
//!     ("eyes", Value::from(100)),
//! ])).unwrap();
//! assert_eq!(many_eyed.len(), 2);
//! ```

#![no_std]

extern crate alloc;

mod aggregate;
mod bag;
mod handle;
mod node;
mod operators;

pub use aggregate::{Count, Max, Mean, Min, Sum};
pub use bag::Bag;
pub use handle::{and, difference, or, Multiset};
pub use node::{MapperFn, PredicateFn};

// Re-export commonly used types from dependencies
pub use rill_core::{EquivRef, Equivalence, Error, Result, Structural, Value};
pub use rill_reactive::{EventKind, SubscriptionId};
