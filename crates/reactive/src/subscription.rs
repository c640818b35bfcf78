//! Subscription management for multiset events.
//!
//! This module provides subscription ids and a manager for tracking active
//! callbacks on a multiset. The manager keeps ids in registration order and
//! dispatches in that order.

use alloc::boxed::Box;
use alloc::vec::Vec;
use hashbrown::HashMap;
use rill_core::Value;

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback type for events carrying one record (insert, delete).
pub type RecordCallback = Box<dyn Fn(&Value)>;

/// Callback type for the payload-free changed signal.
pub type SignalCallback = Box<dyn Fn()>;

/// The observable events of a multiset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// One copy of a record was appended.
    Insert,
    /// One copy of a record was removed.
    Delete,
    /// Fired once after any insert or delete, for coalesced recomputation.
    Changed,
}

enum Callback {
    Record(RecordCallback),
    Signal(SignalCallback),
}

/// A subscription to multiset events.
pub struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    callback: Callback,
}

impl Subscription {
    /// Returns the subscription id.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the event kind this subscription listens for.
    #[inline]
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

/// Manages the external subscriptions of one multiset.
pub struct SubscriptionManager {
    /// Id -> subscription
    subscriptions: HashMap<SubscriptionId, Subscription>,
    /// Registration order, dispatch walks this
    order: Vec<SubscriptionId>,
    /// Next subscription id to assign
    next_id: SubscriptionId,
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    fn register(&mut self, kind: EventKind, callback: Callback) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscriptions.insert(id, Subscription { id, kind, callback });
        self.order.push(id);
        id
    }

    /// Subscribes to insert events.
    pub fn on_insert<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&Value) + 'static,
    {
        self.register(EventKind::Insert, Callback::Record(Box::new(callback)))
    }

    /// Subscribes to delete events.
    pub fn on_delete<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&Value) + 'static,
    {
        self.register(EventKind::Delete, Callback::Record(Box::new(callback)))
    }

    /// Subscribes to the changed signal.
    pub fn on_changed<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn() + 'static,
    {
        self.register(EventKind::Changed, Callback::Signal(Box::new(callback)))
    }

    /// Removes a subscription by id.
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if self.subscriptions.remove(&id).is_some() {
            self.order.retain(|o| *o != id);
            true
        } else {
            false
        }
    }

    /// Returns the number of active subscriptions.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no subscriptions are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Dispatches an insert event, in subscription order.
    pub fn notify_insert(&self, record: &Value) {
        self.notify_record(EventKind::Insert, record);
    }

    /// Dispatches a delete event, in subscription order.
    pub fn notify_delete(&self, record: &Value) {
        self.notify_record(EventKind::Delete, record);
    }

    fn notify_record(&self, kind: EventKind, record: &Value) {
        for id in &self.order {
            if let Some(sub) = self.subscriptions.get(id) {
                if sub.kind == kind {
                    if let Callback::Record(cb) = &sub.callback {
                        cb(record);
                    }
                }
            }
        }
    }

    /// Dispatches the changed signal, in subscription order.
    pub fn notify_changed(&self) {
        for id in &self.order {
            if let Some(sub) = self.subscriptions.get(id) {
                if sub.kind == EventKind::Changed {
                    if let Callback::Signal(cb) = &sub.callback {
                        cb();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[test]
    fn test_subscribe_and_notify() {
        let mut subs = SubscriptionManager::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = seen.clone();
        subs.on_insert(move |v| s.borrow_mut().push(v.clone()));

        subs.notify_insert(&Value::from(1));
        subs.notify_insert(&Value::from(2));
        subs.notify_delete(&Value::from(3)); // no delete subscriber

        assert_eq!(*seen.borrow(), vec![Value::from(1), Value::from(2)]);
    }

    #[test]
    fn test_dispatch_in_subscription_order() {
        let mut subs = SubscriptionManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in 0..3 {
            let l = log.clone();
            subs.on_changed(move || l.borrow_mut().push(tag));
        }

        subs.notify_changed();
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut subs = SubscriptionManager::new();
        let count = Rc::new(RefCell::new(0));

        let c = count.clone();
        let id = subs.on_changed(move || *c.borrow_mut() += 1);
        assert_eq!(subs.len(), 1);

        subs.notify_changed();
        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));
        subs.notify_changed();

        assert_eq!(*count.borrow(), 1);
        assert!(subs.is_empty());
    }

    #[test]
    fn test_unsubscribe_middle_keeps_order() {
        let mut subs = SubscriptionManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        let _a = subs.on_changed(move || l.borrow_mut().push("a"));
        let l = log.clone();
        let b = subs.on_changed(move || l.borrow_mut().push("b"));
        let l = log.clone();
        let _c = subs.on_changed(move || l.borrow_mut().push("c"));

        subs.unsubscribe(b);
        subs.notify_changed();

        assert_eq!(*log.borrow(), vec!["a", "c"]);
    }
}
