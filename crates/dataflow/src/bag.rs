//! Equivalence-aware multiset storage.
//!
//! A `Bag` is the storage behind every multiset cache and every pending
//! queue: an unordered vector of records searched under the pluggable
//! equality strategy. Membership is a count, not a boolean, and `remove_one`
//! takes out exactly one copy.
//!
//! Lookups are linear scans. The contract promises no better than O(n), and
//! pluggable equality rules out hashing.

use alloc::vec::Vec;
use core::fmt;
use rill_core::{EquivRef, Value};

/// An unordered bag of records with count-based membership.
#[derive(Clone)]
pub struct Bag {
    items: Vec<Value>,
    eq: EquivRef,
}

impl Bag {
    /// Creates an empty bag using the given equality strategy.
    pub fn new(eq: EquivRef) -> Self {
        Self { items: Vec::new(), eq }
    }

    /// Creates a bag seeded with the given records.
    pub fn from_records(items: Vec<Value>, eq: EquivRef) -> Self {
        Self { items, eq }
    }

    /// Returns the equality strategy this bag searches under.
    #[inline]
    pub fn equivalence(&self) -> &EquivRef {
        &self.eq
    }

    /// Returns the number of records (counting copies).
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the bag holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends one copy of a record.
    pub fn push(&mut self, record: Value) {
        self.items.push(record);
    }

    /// Returns the position of the first copy equal to `record`, if any.
    pub fn position(&self, record: &Value) -> Option<usize> {
        self.items.iter().position(|e| self.eq.eq(e, record))
    }

    /// Returns true if at least one copy equal to `record` is present.
    #[inline]
    pub fn contains(&self, record: &Value) -> bool {
        self.position(record).is_some()
    }

    /// Returns the multiplicity of `record`: how many copies are present.
    pub fn multiplicity(&self, record: &Value) -> usize {
        self.items.iter().filter(|e| self.eq.eq(e, record)).count()
    }

    /// Removes exactly one copy equal to `record`.
    ///
    /// Returns true if a copy was found and removed.
    pub fn remove_one(&mut self, record: &Value) -> bool {
        match self.position(record) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Iterates over the records.
    pub fn iter(&self) -> core::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Clones the records out as a Vec snapshot.
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.clone()
    }
}

impl fmt::Debug for Bag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}
