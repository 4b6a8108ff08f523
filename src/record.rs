//! Data-record abstraction for placeholder substitution.
//!
//! The engine consumes records through the [`RecordLookup`] trait: an opaque
//! key/value resolver addressed by dotted/bracket paths. [`DataRecord`] is
//! the concrete observable record hosts typically bind to a label; it owns a
//! JSON value and notifies subscribers on replacement. Subscriptions are
//! drop guards so a rebind or teardown always unsubscribes.

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Key/value resolver consumed by the template resolver.
pub trait RecordLookup {
    /// Resolve a dotted/bracket field path (`a.b`, `items[2].v`).
    ///
    /// Returns `None` when the path resolves to nothing; missing data is a
    /// normal, silent condition for chart labels.
    fn resolve(&self, path: &str) -> Option<Value>;
}

impl RecordLookup for Value {
    fn resolve(&self, path: &str) -> Option<Value> {
        resolve_path(self, path).cloned()
    }
}

fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        let (name, indices) = split_indices(segment)?;
        if !name.is_empty() {
            current = current.get(name)?;
        }
        for idx in indices {
            current = current.get(idx)?;
        }
    }
    Some(current)
}

/// Split `name[0][1]` into the name and its bracket indices.
fn split_indices(segment: &str) -> Option<(&str, Vec<usize>)> {
    let Some(bracket) = segment.find('[') else {
        return Some((segment, Vec::new()));
    };
    let name = &segment[..bracket];
    let mut indices = Vec::new();
    let mut rest = &segment[bracket..];
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        indices.push(inner[..close].parse().ok()?);
        rest = &inner[close + 1..];
    }
    Some((name, indices))
}

type ChangeCallback = Rc<dyn Fn()>;

struct Listener {
    id: u64,
    callback: ChangeCallback,
}

/// Observable data record: a JSON value plus change subscribers.
///
/// Single-threaded by design; share via `Rc` and hold `Weak` back-references
/// from consumers.
pub struct DataRecord {
    value: RefCell<Value>,
    listeners: RefCell<Vec<Listener>>,
    next_id: Cell<u64>,
}

impl DataRecord {
    /// Create a new record wrapped for sharing.
    #[must_use]
    pub fn new(value: Value) -> Rc<Self> {
        Rc::new(Self {
            value: RefCell::new(value),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        })
    }

    /// Replace the record's value and notify subscribers.
    pub fn set(&self, value: Value) {
        *self.value.borrow_mut() = value;
        self.notify();
    }

    /// Clone of the current value.
    #[must_use]
    pub fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    /// Subscribe to change notifications.
    ///
    /// The returned [`Subscription`] unsubscribes when dropped.
    pub fn subscribe<F>(self: &Rc<Self>, on_change: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            callback: Rc::new(on_change),
        });
        Subscription {
            record: Rc::downgrade(self),
            id,
        }
    }

    fn unsubscribe(&self, id: u64) {
        self.listeners.borrow_mut().retain(|l| l.id != id);
    }

    fn notify(&self) {
        // Snapshot callbacks so a listener may re-enter subscribe/unsubscribe.
        let callbacks: Vec<ChangeCallback> = self
            .listeners
            .borrow()
            .iter()
            .map(|l| Rc::clone(&l.callback))
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl RecordLookup for DataRecord {
    fn resolve(&self, path: &str) -> Option<Value> {
        resolve_path(&self.value.borrow(), path).cloned()
    }
}

/// Drop guard for a record subscription.
///
/// Holds only a weak reference: the subscription never extends the record's
/// lifetime, and dropping the guard after the record is gone is a no-op.
pub struct Subscription {
    record: Weak<DataRecord>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(record) = self.record.upgrade() {
            record.unsubscribe(self.id);
        }
    }
}
