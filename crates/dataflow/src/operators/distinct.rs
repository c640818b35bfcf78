//! Distinct view: the first-seen copy of each distinct record.
//!
//! Insertion-only maintenance. Deleting through distinct is not supported
//! incrementally: without per-record occurrence counts the view cannot tell
//! whether the deleted parent copy was the one it kept. Parent deletes are
//! ignored, a declared limitation of the design.

use crate::bag::Bag;
use crate::handle::Multiset;
use crate::node::Outcome;
use rill_core::{EquivRef, Value};

/// Deduplicates the parent's current contents.
pub(crate) fn seed(parent: &Multiset, eq: &EquivRef) -> Bag {
    let mut bag = Bag::new(eq.clone());
    for record in parent.contents() {
        if !bag.contains(&record) {
            bag.push(record);
        }
    }
    bag
}

pub(crate) fn on_insert(cache: &Bag, record: &Value) -> Option<Outcome> {
    if cache.contains(record) {
        None
    } else {
        Some(Outcome::Insert(record.clone()))
    }
}
