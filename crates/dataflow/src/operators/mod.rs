//! Per-operator maintenance rules.
//!
//! Each module holds the construction seed and the event rules for one view
//! kind. The rules are pure over the view's own state: they mutate pending
//! queues and report an `Outcome` for the view's cache, which the node layer
//! applies and re-fires.

pub(crate) mod boolean;
pub(crate) mod distinct;
pub(crate) mod filter;
pub(crate) mod map;
