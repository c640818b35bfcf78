//! Rill Reactive - event subscription machinery for the rill multiset engine.
//!
//! Every multiset exposes the same observation surface: `insert` and `delete`
//! events carrying one record each, and a coalesced `changed` signal fired
//! once after any mutation. This crate provides the subscription bookkeeping
//! behind that surface.
//!
//! # Core Concepts
//!
//! - `EventKind`: the three observable events (Insert, Delete, Changed)
//! - `Subscription`: one registered callback with a stable id
//! - `SubscriptionManager`: ordered dispatch and id-based removal
//!
//! Dispatch is synchronous and runs callbacks in subscription order; removing
//! a subscription from inside a running dispatch is not supported.

#![no_std]

extern crate alloc;

pub mod subscription;

pub use subscription::{
    EventKind, RecordCallback, SignalCallback, Subscription, SubscriptionId, SubscriptionManager,
};
