//! Boolean combinators over multisets: intersection, union, difference.
//!
//! All three maintain per-source pending queues of surplus (And) or
//! shortfall (Or) copies so that duplicate counts never desynchronize the
//! sink from its defining multiplicity:
//!
//! - And: `sink[e] = min(source_i[e])`, `pending[i][e] = source_i[e] - sink[e]`
//! - Or:  `sink[e] = max(source_i[e])`, `pending[i][e] = sink[e] - source_i[e]`
//! - Not: `sink[e] = max(pos[e] - neg[e], 0)`, with one queue absorbing the
//!   clamped remainder: `pos[e] - neg[e] = sink[e] - pending[e]`
//!
//! Pending queues are bags, so every count is non-negative by construction.

use crate::bag::Bag;
use crate::handle::Multiset;
use crate::node::Outcome;
use alloc::vec;
use alloc::vec::Vec;
use rill_core::{EquivRef, Value};

/// Which multiplicity the construction scan maintains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScanMode {
    /// Emit a record only when every source yielded a copy.
    Intersect,
    /// Emit every candidate; queue the shortfall of sources that lacked it.
    Union,
}

/// N-way matching scan over source snapshots, producing the initial sink
/// cache and pending queues.
///
/// Pairing is deterministic: sources are walked in index order and their
/// records in insertion order; each candidate consumes the first
/// structurally-equal copy from every other source, lowest index first.
pub(crate) fn matching_scan(
    sources: &[Multiset],
    eq: &EquivRef,
    mode: ScanMode,
) -> (Bag, Vec<Bag>) {
    let n = sources.len();
    let mut scratch: Vec<Vec<Value>> = sources.iter().map(|s| s.contents()).collect();
    let mut sink = Bag::new(eq.clone());
    let mut pending: Vec<Bag> = (0..n).map(|_| Bag::new(eq.clone())).collect();

    for i in 0..n {
        while !scratch[i].is_empty() {
            let candidate = scratch[i].remove(0);
            let mut hits = vec![false; n];
            hits[i] = true;
            for j in 0..n {
                if j == i {
                    continue;
                }
                if let Some(pos) = scratch[j].iter().position(|e| eq.eq(e, &candidate)) {
                    scratch[j].remove(pos);
                    hits[j] = true;
                }
            }
            match mode {
                ScanMode::Intersect => {
                    if hits.iter().all(|h| *h) {
                        sink.push(candidate);
                    } else {
                        // Consumed copies are surplus of the sources that had
                        // them.
                        for j in 0..n {
                            if hits[j] {
                                pending[j].push(candidate.clone());
                            }
                        }
                    }
                }
                ScanMode::Union => {
                    for j in 0..n {
                        if !hits[j] {
                            pending[j].push(candidate.clone());
                        }
                    }
                    sink.push(candidate);
                }
            }
        }
    }
    (sink, pending)
}

/// Initial state of a difference view: the positive snapshot with one copy
/// removed per negative record, unmatched negatives queued.
pub(crate) fn not_seed(positive: &Multiset, negative: &Multiset, eq: &EquivRef) -> (Bag, Bag) {
    let mut sink = Bag::from_records(positive.contents(), eq.clone());
    let mut pending = Bag::new(eq.clone());
    for z in negative.contents() {
        if !sink.remove_one(&z) {
            pending.push(z);
        }
    }
    (sink, pending)
}

/// Intersection: source `port` gained a copy.
///
/// Emits only if every other source already has a surplus copy waiting;
/// otherwise the copy becomes this source's surplus.
pub(crate) fn and_insert(pending: &mut [Bag], port: usize, record: &Value) -> Option<Outcome> {
    let others_ready = pending
        .iter()
        .enumerate()
        .all(|(j, p)| j == port || p.contains(record));
    if others_ready {
        for (j, p) in pending.iter_mut().enumerate() {
            if j != port {
                p.remove_one(record);
            }
        }
        Some(Outcome::Insert(record.clone()))
    } else {
        pending[port].push(record.clone());
        None
    }
}

/// Intersection: source `port` lost a copy.
///
/// Surplus absorbs the loss when possible; otherwise the copy was counted in
/// the sink, so the sink shrinks and every other source's surplus grows by
/// the freed copy.
pub(crate) fn and_delete(pending: &mut [Bag], port: usize, record: &Value) -> Option<Outcome> {
    if pending[port].remove_one(record) {
        None
    } else {
        for (j, p) in pending.iter_mut().enumerate() {
            if j != port {
                p.push(record.clone());
            }
        }
        Some(Outcome::Delete(record.clone()))
    }
}

/// Union: source `port` gained a copy.
///
/// A source catching up to the max consumes its own shortfall silently; a
/// copy beyond the previous max grows the sink and every other source falls
/// one further behind.
pub(crate) fn or_insert(pending: &mut [Bag], port: usize, record: &Value) -> Option<Outcome> {
    if pending[port].remove_one(record) {
        None
    } else {
        for (j, p) in pending.iter_mut().enumerate() {
            if j != port {
                p.push(record.clone());
            }
        }
        Some(Outcome::Insert(record.clone()))
    }
}

/// Union: source `port` lost a copy.
///
/// The source falls behind; when every source is now short of the record,
/// the max itself dropped: all shortfalls shrink by one and so does the
/// sink.
pub(crate) fn or_delete(pending: &mut [Bag], port: usize, record: &Value) -> Option<Outcome> {
    pending[port].push(record.clone());
    if pending.iter().all(|p| p.contains(record)) {
        for p in pending.iter_mut() {
            p.remove_one(record);
        }
        Some(Outcome::Delete(record.clone()))
    } else {
        None
    }
}

/// Difference: the signed count `pos[e] - neg[e]` moved by one.
///
/// `increase` is true for a positive-side insert or negative-side delete.
/// Increases are absorbed by the clamp queue first; decreases drain the sink
/// first and only then accrue to the clamp queue. Sink and queue both stay
/// non-negative.
pub(crate) fn not_shift(
    pending: &mut Bag,
    cache: &Bag,
    record: &Value,
    increase: bool,
) -> Option<Outcome> {
    if increase {
        if pending.remove_one(record) {
            None
        } else {
            Some(Outcome::Insert(record.clone()))
        }
    } else if cache.contains(record) {
        Some(Outcome::Delete(record.clone()))
    } else {
        pending.push(record.clone());
        None
    }
}
