//! The public multiset handle and operator factories.
//!
//! A `Multiset` is a cheap cloneable handle (`Rc`) to one node of the
//! dataflow graph. Base multisets are built with `Multiset::new` and mutated
//! with `insert`/`delete`/`update`; every factory method returns a read-only
//! derived view that keeps itself current by propagation.
//!
//! A view strongly owns its parents through the handle, so keeping any
//! handle to a view keeps its whole lineage alive. Parents only know their
//! subscribers through weak edges: dropping the last handle to a view frees
//! it, and its parent prunes the dead edge on the next dispatch.

use crate::aggregate::{Count, Max, Mean, Min, Sum};
use crate::bag::Bag;
use crate::node::{apply_delete, apply_insert, ChildEdge, MapperFn, Node, Operator, PredicateFn};
use crate::operators::{boolean, distinct, filter, map};
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use rill_core::{EquivRef, Error, Result, Structural, Value};
use rill_reactive::SubscriptionId;

/// A handle to one multiset in the dataflow graph.
#[derive(Clone)]
pub struct Multiset {
    pub(crate) inner: Rc<RefCell<Node>>,
}

impl Multiset {
    /// Creates a base multiset seeded with the given records, using deep
    /// structural equality.
    pub fn new(seed: Vec<Value>) -> Self {
        Self::with_equivalence(seed, Structural::shared())
    }

    /// Creates a base multiset with an explicit equality strategy.
    ///
    /// Derived views inherit the strategy of their (first) parent.
    pub fn with_equivalence(seed: Vec<Value>, eq: EquivRef) -> Self {
        let cache = Bag::from_records(seed, eq);
        let node = Node::new(Operator::Base, cache, Vec::new());
        Self {
            inner: Rc::new(RefCell::new(node)),
        }
    }

    fn reject_if_derived(&self) -> Result<()> {
        let node = self.inner.borrow();
        if node.op.is_base() {
            Ok(())
        } else {
            Err(Error::ReadOnlyView {
                operator: node.op.name(),
            })
        }
    }

    /// Appends one copy of a record; fires insert, then changed.
    ///
    /// Rejected with `Error::ReadOnlyView` on derived views.
    pub fn insert(&self, record: Value) -> Result<()> {
        self.reject_if_derived()?;
        apply_insert(&self.inner, record);
        Ok(())
    }

    /// Removes exactly one copy structurally equal to `record`, if present;
    /// fires delete, then changed. Silent no-op (no events) when absent.
    ///
    /// Rejected with `Error::ReadOnlyView` on derived views.
    pub fn delete(&self, record: &Value) -> Result<()> {
        self.reject_if_derived()?;
        apply_delete(&self.inner, record);
        Ok(())
    }

    /// Convenience for delete-then-insert. Not atomic: observers see a
    /// delete event followed by an insert event, never a combined update.
    pub fn update(&self, old: &Value, new: Value) -> Result<()> {
        self.delete(old)?;
        self.insert(new)
    }

    /// Returns the number of records, counting copies.
    pub fn len(&self) -> usize {
        self.inner.borrow().cache.len()
    }

    /// Returns true if the multiset holds no records.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().cache.is_empty()
    }

    /// Returns the multiplicity of `record`.
    pub fn multiplicity(&self, record: &Value) -> usize {
        self.inner.borrow().cache.multiplicity(record)
    }

    /// Clones the current contents out as a snapshot. No iteration order is
    /// guaranteed.
    pub fn contents(&self) -> Vec<Value> {
        self.inner.borrow().cache.to_vec()
    }

    /// Returns the equality strategy of this multiset.
    pub fn equivalence(&self) -> EquivRef {
        self.inner.borrow().eq.clone()
    }

    /// Subscribes to insert events.
    pub fn on_insert<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Value) + 'static,
    {
        self.inner.borrow_mut().subs.on_insert(callback)
    }

    /// Subscribes to delete events.
    pub fn on_delete<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Value) + 'static,
    {
        self.inner.borrow_mut().subs.on_delete(callback)
    }

    /// Subscribes to the coalesced changed signal.
    pub fn on_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + 'static,
    {
        self.inner.borrow_mut().subs.on_changed(callback)
    }

    /// Removes a subscription by id.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.borrow_mut().subs.unsubscribe(id)
    }

    // --- derived views ---

    /// Restriction of this multiset by a predicate.
    pub fn filter<F>(&self, predicate: F) -> Multiset
    where
        F: Fn(&Value) -> bool + 'static,
    {
        let predicate: PredicateFn = Box::new(predicate);
        let eq = self.equivalence();
        let cache = filter::seed(self, &predicate, &eq);
        derive(Operator::Filter { predicate }, cache, alloc::vec![self.clone()])
    }

    /// Image of this multiset under a transform; duplicates preserved.
    pub fn map<F>(&self, mapper: F) -> Multiset
    where
        F: Fn(&Value) -> Value + 'static,
    {
        let mapper: MapperFn = Box::new(mapper);
        let eq = self.equivalence();
        let cache = map::seed(self, &mapper, &eq);
        derive(Operator::Map { mapper }, cache, alloc::vec![self.clone()])
    }

    /// Projection of each record onto the named fields.
    pub fn select(&self, fields: &[&str]) -> Multiset {
        let mapper = map::project_fields(fields);
        let eq = self.equivalence();
        let cache = map::seed(self, &mapper, &eq);
        derive(Operator::Map { mapper }, cache, alloc::vec![self.clone()])
    }

    /// Extraction of a single field from each record, Null when absent.
    pub fn scalar(&self, field: &str) -> Multiset {
        let mapper = map::extract_field(field);
        let eq = self.equivalence();
        let cache = map::seed(self, &mapper, &eq);
        derive(Operator::Map { mapper }, cache, alloc::vec![self.clone()])
    }

    /// First-seen copy of each distinct record. Parent deletes are not
    /// propagated (incremental deletion through distinct is unsupported).
    pub fn distinct(&self) -> Multiset {
        let eq = self.equivalence();
        let cache = distinct::seed(self, &eq);
        derive(Operator::Distinct, cache, alloc::vec![self.clone()])
    }

    /// Binary intersection convenience; see [`and`].
    pub fn and(&self, other: &Multiset) -> Multiset {
        and(&[self.clone(), other.clone()])
    }

    /// Binary union convenience; see [`or`].
    pub fn or(&self, other: &Multiset) -> Multiset {
        or(&[self.clone(), other.clone()])
    }

    /// Difference convenience; see [`difference`].
    pub fn not(&self, other: &Multiset) -> Multiset {
        difference(self, other)
    }

    // --- scalar aggregates ---

    /// Live record count.
    pub fn count(&self) -> Count {
        Count::new(self)
    }

    /// Live numeric sum; not-a-number while any non-numeric record is
    /// present.
    pub fn sum(&self) -> Sum {
        Sum::new(self)
    }

    /// Live arithmetic mean, recomputed on the coalesced changed signal.
    pub fn mean(&self) -> Mean {
        Mean::new(self)
    }

    /// Live numeric minimum.
    pub fn min(&self) -> Min {
        Min::new(self)
    }

    /// Live numeric maximum.
    pub fn max(&self) -> Max {
        Max::new(self)
    }
}

/// N-ary intersection: sink multiplicity is the minimum across sources.
///
/// Zero sources is legal and yields the (permanently) empty multiset.
pub fn and(sources: &[Multiset]) -> Multiset {
    let eq = shared_equivalence(sources);
    let (cache, pending) = boolean::matching_scan(sources, &eq, boolean::ScanMode::Intersect);
    derive(Operator::And { pending }, cache, sources.to_vec())
}

/// N-ary union: sink multiplicity is the maximum across sources.
pub fn or(sources: &[Multiset]) -> Multiset {
    let eq = shared_equivalence(sources);
    let (cache, pending) = boolean::matching_scan(sources, &eq, boolean::ScanMode::Union);
    derive(Operator::Or { pending }, cache, sources.to_vec())
}

/// Asymmetric difference `positive \ negative`, clamped at zero.
pub fn difference(positive: &Multiset, negative: &Multiset) -> Multiset {
    let eq = positive.equivalence();
    let (cache, pending) = boolean::not_seed(positive, negative, &eq);
    derive(
        Operator::Not { pending },
        cache,
        alloc::vec![positive.clone(), negative.clone()],
    )
}

fn shared_equivalence(sources: &[Multiset]) -> EquivRef {
    sources
        .first()
        .map(Multiset::equivalence)
        .unwrap_or_else(Structural::shared)
}

/// Wraps a derived node and registers it on each parent's child table.
fn derive(op: Operator, cache: Bag, parents: Vec<Multiset>) -> Multiset {
    let node = Rc::new(RefCell::new(Node::new(op, cache, parents)));
    let weak = Rc::downgrade(&node);
    let parent_handles = node.borrow().parents.clone();
    for (port, parent) in parent_handles.iter().enumerate() {
        parent.inner.borrow_mut().children.push(ChildEdge {
            node: weak.clone(),
            port,
        });
    }
    Multiset { inner: node }
}
