//! Dataflow node definitions and propagation.
//!
//! Every multiset, base or derived, is a `Node`: a cache `Bag`, an operator
//! tag, strong handles to its parents and weak port-tagged edges to its
//! children. Propagation is direct synchronous recursion: a mutation call on
//! a base multiset returns only after every transitively dependent view has
//! settled and fired its own events.
//!
//! Ownership runs opposite to event flow. A view keeps its whole lineage
//! alive through the strong parent handles; a parent only routes events
//! through `Weak` child edges, pruned lazily when an upgrade fails.

use crate::bag::Bag;
use crate::handle::Multiset;
use crate::operators::{boolean, distinct, filter, map};
use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use rill_core::{EquivRef, Value};
use rill_reactive::SubscriptionManager;

/// Predicate for filtering records.
pub type PredicateFn = Box<dyn Fn(&Value) -> bool>;

/// Mapper function for transforming records.
pub type MapperFn = Box<dyn Fn(&Value) -> Value>;

/// The closed set of operator kinds.
///
/// Only `Base` accepts external insert/delete calls; every other variant is
/// a read-only view maintained by propagation.
pub(crate) enum Operator {
    /// Externally mutable source multiset
    Base,
    /// One-parent restriction by predicate
    Filter { predicate: PredicateFn },
    /// One-parent image under a transform (duplicates preserved)
    Map { mapper: MapperFn },
    /// N-ary intersection, sink multiplicity = min across sources
    And { pending: Vec<Bag> },
    /// N-ary union, sink multiplicity = max across sources
    Or { pending: Vec<Bag> },
    /// Asymmetric difference clamped at zero, port 0 minus port 1
    Not { pending: Bag },
    /// First-seen copy of each distinct record
    Distinct,
}

impl Operator {
    /// Returns true for the externally mutable base variant.
    pub(crate) fn is_base(&self) -> bool {
        matches!(self, Operator::Base)
    }

    /// Operator name for error reporting.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Operator::Base => "base",
            Operator::Filter { .. } => "filter",
            Operator::Map { .. } => "map",
            Operator::And { .. } => "and",
            Operator::Or { .. } => "or",
            Operator::Not { .. } => "not",
            Operator::Distinct => "distinct",
        }
    }
}

/// What a parent event obliges a view to do to its own cache.
pub(crate) enum Outcome {
    /// Append one copy and fire insert + changed.
    Insert(Value),
    /// Remove one copy and fire delete + changed.
    Delete(Value),
}

/// A weak edge from a parent to one subscribing view.
///
/// `port` is the index of the parent in the child's source list, so n-ary
/// combinators know which of their pending queues the event concerns.
pub(crate) struct ChildEdge {
    pub node: Weak<RefCell<Node>>,
    pub port: usize,
}

/// One multiset in the dataflow graph.
pub(crate) struct Node {
    pub cache: Bag,
    pub op: Operator,
    /// Strong handles: a view owns its lineage
    pub parents: Vec<Multiset>,
    /// Weak back-references, pruned lazily during dispatch
    pub children: Vec<ChildEdge>,
    pub subs: SubscriptionManager,
    pub eq: EquivRef,
}

impl Node {
    pub(crate) fn new(op: Operator, cache: Bag, parents: Vec<Multiset>) -> Self {
        let eq = cache.equivalence().clone();
        Self {
            cache,
            op,
            parents,
            children: Vec::new(),
            subs: SubscriptionManager::new(),
            eq,
        }
    }

    /// Upgrades the child edges, dropping the ones whose view is gone.
    fn live_children(&mut self) -> Vec<(Rc<RefCell<Node>>, usize)> {
        let mut live = Vec::with_capacity(self.children.len());
        self.children.retain(|edge| match edge.node.upgrade() {
            Some(node) => {
                live.push((node, edge.port));
                true
            }
            None => false,
        });
        live
    }

    /// Reacts to one parent's insert event on the given port.
    fn on_parent_insert(&mut self, port: usize, record: &Value) -> Option<Outcome> {
        match &mut self.op {
            Operator::Base => None,
            Operator::Filter { predicate } => filter::on_insert(predicate, record),
            Operator::Map { mapper } => map::on_insert(mapper, record),
            Operator::And { pending } => boolean::and_insert(pending, port, record),
            Operator::Or { pending } => boolean::or_insert(pending, port, record),
            Operator::Not { pending } => {
                boolean::not_shift(pending, &self.cache, record, port == 0)
            }
            Operator::Distinct => distinct::on_insert(&self.cache, record),
        }
    }

    /// Reacts to one parent's delete event on the given port.
    fn on_parent_delete(&mut self, port: usize, record: &Value) -> Option<Outcome> {
        match &mut self.op {
            Operator::Base => None,
            Operator::Filter { predicate } => filter::on_delete(predicate, record),
            Operator::Map { mapper } => map::on_delete(mapper, record),
            Operator::And { pending } => boolean::and_delete(pending, port, record),
            Operator::Or { pending } => boolean::or_delete(pending, port, record),
            Operator::Not { pending } => {
                boolean::not_shift(pending, &self.cache, record, port != 0)
            }
            // Incremental deletion through distinct is unsupported: the one
            // surviving copy of a duplicated record cannot be attributed
            // without per-record occurrence counts.
            Operator::Distinct => None,
        }
    }
}

/// Appends one copy to the node's cache and fires insert, then changed.
pub(crate) fn apply_insert(node: &Rc<RefCell<Node>>, record: Value) {
    node.borrow_mut().cache.push(record.clone());
    dispatch_insert(node, &record);
    dispatch_changed(node);
}

/// Removes one copy from the node's cache; fires delete, then changed.
///
/// Silent no-op when no structurally-equal copy exists.
pub(crate) fn apply_delete(node: &Rc<RefCell<Node>>, record: &Value) -> bool {
    let removed = node.borrow_mut().cache.remove_one(record);
    if removed {
        dispatch_delete(node, record);
        dispatch_changed(node);
    }
    removed
}

fn dispatch_insert(node: &Rc<RefCell<Node>>, record: &Value) {
    let children = node.borrow_mut().live_children();
    for (child, port) in children {
        let outcome = child.borrow_mut().on_parent_insert(port, record);
        settle(&child, outcome);
    }
    node.borrow().subs.notify_insert(record);
}

fn dispatch_delete(node: &Rc<RefCell<Node>>, record: &Value) {
    let children = node.borrow_mut().live_children();
    for (child, port) in children {
        let outcome = child.borrow_mut().on_parent_delete(port, record);
        settle(&child, outcome);
    }
    node.borrow().subs.notify_delete(record);
}

fn dispatch_changed(node: &Rc<RefCell<Node>>) {
    node.borrow().subs.notify_changed();
}

fn settle(child: &Rc<RefCell<Node>>, outcome: Option<Outcome>) {
    match outcome {
        Some(Outcome::Insert(record)) => apply_insert(child, record),
        Some(Outcome::Delete(record)) => {
            apply_delete(child, &record);
        }
        None => {}
    }
}
