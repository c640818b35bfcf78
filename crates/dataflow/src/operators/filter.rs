//! Filter (where) view: a multiset restriction by predicate.
//!
//! The view holds `{ e in parent : pred(e) }` with parent multiplicities
//! preserved. A parent delete of a matching record always finds a copy here:
//! the record could only have been counted while the predicate held.

use crate::bag::Bag;
use crate::handle::Multiset;
use crate::node::{Outcome, PredicateFn};
use rill_core::{EquivRef, Value};

/// Filters the parent's current contents into the initial cache.
pub(crate) fn seed(parent: &Multiset, predicate: &PredicateFn, eq: &EquivRef) -> Bag {
    let records = parent
        .contents()
        .into_iter()
        .filter(|e| predicate(e))
        .collect();
    Bag::from_records(records, eq.clone())
}

pub(crate) fn on_insert(predicate: &PredicateFn, record: &Value) -> Option<Outcome> {
    if predicate(record) {
        Some(Outcome::Insert(record.clone()))
    } else {
        None
    }
}

pub(crate) fn on_delete(predicate: &PredicateFn, record: &Value) -> Option<Outcome> {
    if predicate(record) {
        Some(Outcome::Delete(record.clone()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;

    fn even() -> PredicateFn {
        Box::new(|v: &Value| v.as_i64().map(|n| n % 2 == 0).unwrap_or(false))
    }

    #[test]
    fn test_insert_respects_predicate() {
        let pred = even();
        assert!(matches!(
            on_insert(&pred, &Value::from(4)),
            Some(Outcome::Insert(_))
        ));
        assert!(on_insert(&pred, &Value::from(3)).is_none());
    }

    #[test]
    fn test_delete_respects_predicate() {
        let pred = even();
        assert!(matches!(
            on_delete(&pred, &Value::from(4)),
            Some(Outcome::Delete(_))
        ));
        assert!(on_delete(&pred, &Value::from(3)).is_none());
    }
}
