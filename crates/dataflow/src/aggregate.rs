//! Scalar aggregates: live numeric values maintained over a parent multiset.
//!
//! Aggregates are not multisets; each is a single value plus the
//! subscriptions keeping it current. Dropping an aggregate unregisters its
//! subscriptions from the parent. Each aggregate holds a strong handle to
//! its parent, so it stays live as long as the aggregate does.
//!
//! Count and Sum update per insert/delete event. Mean recomputes from its
//! internal sum and count on the parent's coalesced changed signal, so a
//! reader never observes a half-updated sum/count pair. Min and Max take the
//! insert fast path and rescan the parent cache when the record holding the
//! extremum is deleted.

use crate::bag::Bag;
use crate::handle::Multiset;
use alloc::rc::Rc;
use core::cell::Cell;
use rill_core::Value;
use rill_reactive::SubscriptionId;

/// Live record count of a multiset.
pub struct Count {
    pub(crate) value: Rc<Cell<i64>>,
    parent: Multiset,
    inserts: SubscriptionId,
    deletes: SubscriptionId,
}

impl Count {
    pub(crate) fn new(parent: &Multiset) -> Self {
        let value = Rc::new(Cell::new(parent.len() as i64));

        let v = value.clone();
        let inserts = parent.on_insert(move |_| v.set(v.get() + 1));
        let v = value.clone();
        let deletes = parent.on_delete(move |_| v.set(v.get() - 1));

        Self {
            value,
            parent: parent.clone(),
            inserts,
            deletes,
        }
    }

    /// Returns the current count.
    #[inline]
    pub fn value(&self) -> i64 {
        self.value.get()
    }
}

impl Drop for Count {
    fn drop(&mut self) {
        self.parent.unsubscribe(self.inserts);
        self.parent.unsubscribe(self.deletes);
    }
}

/// Shared accumulator behind `Sum`.
///
/// A raw NaN accumulator could never recover once poisoned (NaN - NaN is
/// still NaN), so the numeric total and the count of non-numeric members are
/// tracked separately; the sum reads as NaN exactly while the count is
/// positive.
pub(crate) struct SumCell {
    total: Cell<f64>,
    non_numeric: Cell<usize>,
}

impl SumCell {
    fn new() -> Self {
        Self {
            total: Cell::new(0.0),
            non_numeric: Cell::new(0),
        }
    }

    fn observe(&self, record: &Value) {
        match record.as_number() {
            Some(x) => self.total.set(self.total.get() + x),
            None => self.non_numeric.set(self.non_numeric.get() + 1),
        }
    }

    fn retract(&self, record: &Value) {
        match record.as_number() {
            Some(x) => self.total.set(self.total.get() - x),
            None => self.non_numeric.set(self.non_numeric.get() - 1),
        }
    }

    pub(crate) fn value(&self) -> f64 {
        if self.non_numeric.get() > 0 {
            f64::NAN
        } else {
            self.total.get()
        }
    }
}

/// Live numeric sum of a multiset.
///
/// Non-numeric records poison the sum to not-a-number; it recovers once
/// compensating deletes remove them.
pub struct Sum {
    pub(crate) cell: Rc<SumCell>,
    parent: Multiset,
    inserts: SubscriptionId,
    deletes: SubscriptionId,
}

impl Sum {
    pub(crate) fn new(parent: &Multiset) -> Self {
        let cell = Rc::new(SumCell::new());
        for record in parent.contents() {
            cell.observe(&record);
        }

        let c = cell.clone();
        let inserts = parent.on_insert(move |record| c.observe(record));
        let c = cell.clone();
        let deletes = parent.on_delete(move |record| c.retract(record));

        Self {
            cell,
            parent: parent.clone(),
            inserts,
            deletes,
        }
    }

    /// Returns the current sum, NaN while any non-numeric record is present.
    #[inline]
    pub fn value(&self) -> f64 {
        self.cell.value()
    }
}

impl Drop for Sum {
    fn drop(&mut self) {
        self.parent.unsubscribe(self.inserts);
        self.parent.unsubscribe(self.deletes);
    }
}

/// Live arithmetic mean of a multiset.
///
/// Derived from an internal sum and count of the same parent. The cached
/// value refreshes on the parent's changed signal, after the whole
/// insert/delete phase has settled; readers inside an insert or delete
/// handler observe the mean of the previous settled state, never an
/// intermediate.
pub struct Mean {
    value: Rc<Cell<f64>>,
    sum: Sum,
    count: Count,
    parent: Multiset,
    changed: SubscriptionId,
}

impl Mean {
    pub(crate) fn new(parent: &Multiset) -> Self {
        let sum = Sum::new(parent);
        let count = Count::new(parent);
        let value = Rc::new(Cell::new(mean_of(sum.value(), count.value())));

        let s = sum.cell.clone();
        let c = count.value.clone();
        let v = value.clone();
        let changed = parent.on_changed(move || v.set(mean_of(s.value(), c.get())));

        Self {
            value,
            sum,
            count,
            parent: parent.clone(),
            changed,
        }
    }

    /// Returns the mean as of the last settled mutation; NaN when the
    /// parent is empty or its sum is poisoned.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value.get()
    }

    /// Returns the underlying live sum.
    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum.value()
    }

    /// Returns the underlying live count.
    #[inline]
    pub fn count(&self) -> i64 {
        self.count.value()
    }
}

impl Drop for Mean {
    fn drop(&mut self) {
        self.parent.unsubscribe(self.changed);
    }
}

fn mean_of(sum: f64, count: i64) -> f64 {
    sum / count as f64
}

fn extreme_of(cache: &Bag, is_better: fn(f64, f64) -> bool) -> Option<f64> {
    let mut best = None;
    for record in cache.iter() {
        if let Some(x) = record.as_number() {
            best = match best {
                None => Some(x),
                Some(b) if is_better(x, b) => Some(x),
                other => other,
            };
        }
    }
    best
}

fn extremum(parent: &Multiset, is_better: fn(f64, f64) -> bool) -> Extremum {
    let value = Rc::new(Cell::new(extreme_of(&parent.inner.borrow().cache, is_better)));

    let v = value.clone();
    let inserts = parent.on_insert(move |record| {
        if let Some(x) = record.as_number() {
            match v.get() {
                None => v.set(Some(x)),
                Some(b) if is_better(x, b) => v.set(Some(x)),
                _ => {}
            }
        }
    });

    // Deleting the record that holds the extremum forces a rescan of the
    // parent cache; any other delete leaves the value intact. Bit equality
    // here, so a NaN extremum is still recognized as the departing record.
    // Weak here, or the callback would keep its own parent alive forever.
    let weak = Rc::downgrade(&parent.inner);
    let v = value.clone();
    let deletes = parent.on_delete(move |record| {
        let gone = match record.as_number() {
            Some(x) => x,
            None => return,
        };
        let current = match v.get() {
            Some(b) => b,
            None => return,
        };
        if gone.total_cmp(&current).is_eq() {
            if let Some(node) = weak.upgrade() {
                v.set(extreme_of(&node.borrow().cache, is_better));
            }
        }
    });

    Extremum {
        value,
        parent: parent.clone(),
        inserts,
        deletes,
    }
}

struct Extremum {
    value: Rc<Cell<Option<f64>>>,
    parent: Multiset,
    inserts: SubscriptionId,
    deletes: SubscriptionId,
}

impl Drop for Extremum {
    fn drop(&mut self) {
        self.parent.unsubscribe(self.inserts);
        self.parent.unsubscribe(self.deletes);
    }
}

/// Live numeric minimum of a multiset; None when no numeric record exists.
///
/// Records compare under the IEEE total order, so a NaN record sorts past
/// the infinities instead of wedging the comparison.
pub struct Min(Extremum);

impl Min {
    pub(crate) fn new(parent: &Multiset) -> Self {
        Min(extremum(parent, |x, b| x.total_cmp(&b).is_lt()))
    }

    /// Returns the current minimum.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.0.value.get()
    }
}

/// Live numeric maximum of a multiset; None when no numeric record exists.
///
/// Records compare under the IEEE total order, so a NaN record sorts past
/// the infinities instead of wedging the comparison.
pub struct Max(Extremum);

impl Max {
    pub(crate) fn new(parent: &Multiset) -> Self {
        Max(extremum(parent, |x, b| x.total_cmp(&b).is_gt()))
    }

    /// Returns the current maximum.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.0.value.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::RefCell;

    fn ints(ns: &[i64]) -> vec::Vec<Value> {
        ns.iter().map(|n| Value::from(*n)).collect()
    }

    #[test]
    fn test_count_tracks_parent() {
        let base = Multiset::new(ints(&[1, 2, 3]));
        let count = base.count();
        assert_eq!(count.value(), 3);

        base.insert(Value::from(4)).unwrap();
        assert_eq!(count.value(), 4);

        base.delete(&Value::from(1)).unwrap();
        base.delete(&Value::from(99)).unwrap(); // absent, no event
        assert_eq!(count.value(), 3);
    }

    #[test]
    fn test_sum_tracks_parent() {
        let base = Multiset::new(ints(&[1, 2, 3]));
        let sum = base.sum();
        assert_eq!(sum.value(), 6.0);

        base.insert(Value::from(2.5)).unwrap();
        assert_eq!(sum.value(), 8.5);

        base.delete(&Value::from(2)).unwrap();
        assert_eq!(sum.value(), 6.5);
    }

    #[test]
    fn test_sum_poison_and_recovery() {
        let base = Multiset::new(ints(&[1, 2]));
        let sum = base.sum();

        base.insert(Value::from("not a number")).unwrap();
        assert!(sum.value().is_nan());

        // Numeric churn while poisoned still tracks underneath.
        base.insert(Value::from(10)).unwrap();
        assert!(sum.value().is_nan());

        base.delete(&Value::from("not a number")).unwrap();
        assert_eq!(sum.value(), 13.0);
    }

    #[test]
    fn test_mean() {
        let base = Multiset::new(ints(&[2, 4]));
        let mean = base.mean();
        assert_eq!(mean.value(), 3.0);

        base.insert(Value::from(9)).unwrap();
        assert_eq!(mean.value(), 5.0);
        assert_eq!(mean.sum(), 15.0);
        assert_eq!(mean.count(), 3);

        base.delete(&Value::from(9)).unwrap();
        base.delete(&Value::from(4)).unwrap();
        assert_eq!(mean.value(), 2.0);
    }

    #[test]
    fn test_mean_of_empty_is_nan() {
        let base = Multiset::new(vec![]);
        let mean = base.mean();
        assert!(mean.value().is_nan());

        base.insert(Value::from(5)).unwrap();
        assert_eq!(mean.value(), 5.0);

        base.delete(&Value::from(5)).unwrap();
        assert!(mean.value().is_nan());
    }

    #[test]
    fn test_mean_never_observed_half_updated() {
        // A handler running in the insert phase must see the mean of the
        // previous settled state: old sum with old count, never new sum
        // with old count or the reverse.
        let base = Multiset::new(ints(&[2, 4]));
        let mean = Rc::new(base.mean());
        let observed = Rc::new(RefCell::new(vec::Vec::new()));

        let m = mean.clone();
        let o = observed.clone();
        base.on_insert(move |_| o.borrow_mut().push(m.value()));

        base.insert(Value::from(9)).unwrap();

        assert_eq!(*observed.borrow(), vec![3.0]); // (2+4)/2, fully old
        assert_eq!(mean.value(), 5.0); // settled after the call returned
    }

    #[test]
    fn test_min_max_insert_fast_path() {
        let base = Multiset::new(ints(&[3, 7]));
        let min = base.min();
        let max = base.max();
        assert_eq!(min.value(), Some(3.0));
        assert_eq!(max.value(), Some(7.0));

        base.insert(Value::from(1)).unwrap();
        base.insert(Value::from(9)).unwrap();
        assert_eq!(min.value(), Some(1.0));
        assert_eq!(max.value(), Some(9.0));
    }

    #[test]
    fn test_min_max_rescan_on_extremum_delete() {
        let base = Multiset::new(ints(&[3, 7, 5]));
        let min = base.min();
        let max = base.max();

        base.delete(&Value::from(3)).unwrap();
        assert_eq!(min.value(), Some(5.0));

        base.delete(&Value::from(7)).unwrap();
        assert_eq!(max.value(), Some(5.0));

        base.delete(&Value::from(5)).unwrap();
        assert_eq!(min.value(), None);
        assert_eq!(max.value(), None);
    }

    #[test]
    fn test_min_max_recover_after_nan_record_leaves() {
        // NaN is a legal record; total-order comparison keeps it from
        // wedging either aggregate once it departs.
        let base = Multiset::new(vec![Value::from(f64::NAN)]);
        let min = base.min();
        let max = base.max();
        assert!(min.value().is_some_and(f64::is_nan));

        base.insert(Value::from(5.0)).unwrap();
        assert_eq!(min.value(), Some(5.0));
        assert!(max.value().is_some_and(f64::is_nan));

        base.delete(&Value::from(f64::NAN)).unwrap();
        assert_eq!(min.value(), Some(5.0));
        assert_eq!(max.value(), Some(5.0));
    }

    #[test]
    fn test_min_of_only_nan_record_empties_on_delete() {
        let base = Multiset::new(vec![Value::from(f64::NAN)]);
        let min = base.min();

        base.delete(&Value::from(f64::NAN)).unwrap();
        assert_eq!(min.value(), None);
    }

    #[test]
    fn test_min_ignores_non_numeric_records() {
        let base = Multiset::new(vec![Value::from("g"), Value::from(4)]);
        let min = base.min();
        assert_eq!(min.value(), Some(4.0));

        base.delete(&Value::from("g")).unwrap();
        assert_eq!(min.value(), Some(4.0));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let base = Multiset::new(ints(&[1]));
        {
            let _count = base.count();
            let _sum = base.sum();
            assert_eq!(base.inner.borrow().subs.len(), 4);
        }
        assert_eq!(base.inner.borrow().subs.len(), 0);
        base.insert(Value::from(2)).unwrap();
    }
}
