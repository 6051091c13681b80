use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::warn;

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Observers<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

/// Handle that keeps an observer registered until it is dropped.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Subscription that owns nothing.
    pub fn empty() -> Self {
        Self { release: None }
    }

    /// Releases the observer now instead of at drop time.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Synchronous observer list without replay.
///
/// Observers run in registration order on the emitting thread. An observer
/// that re-enters the emitter for the same event is skipped for that nested
/// delivery rather than aliasing its own state.
pub struct EventEmitter<T> {
    observers: Rc<RefCell<Observers<T>>>,
}

impl<T: 'static> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> EventEmitter<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: Rc::new(RefCell::new(Observers::default())),
        }
    }

    pub fn subscribe(&self, observer: impl FnMut(&T) + 'static) -> Subscription {
        let callback: Callback<T> = Rc::new(RefCell::new(observer));
        let id = {
            let mut observers = self.observers.borrow_mut();
            let id = observers.next_id;
            observers.next_id += 1;
            observers.entries.push((id, callback));
            id
        };

        let weak: Weak<RefCell<Observers<T>>> = Rc::downgrade(&self.observers);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(observers) = weak.upgrade() {
                    observers
                        .borrow_mut()
                        .entries
                        .retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Callback<T>> = self
            .observers
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in snapshot {
            match callback.try_borrow_mut() {
                Ok(mut observer) => (&mut *observer)(value),
                Err(_) => warn!("skipping re-entrant observer delivery"),
            }
        }
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().entries.len()
    }

    /// Drops every registered observer.
    pub fn clear(&self) {
        self.observers.borrow_mut().entries.clear();
    }
}

impl<T> fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("observers", &self.observers.borrow().entries.len())
            .finish()
    }
}

/// Single-value holder with publish/subscribe and replay of the latest value.
///
/// New subscribers immediately receive the current value; every publish
/// stores the value and then notifies current subscribers in registration
/// order.
pub struct ReactiveCell<T> {
    latest: Rc<RefCell<T>>,
    emitter: EventEmitter<T>,
}

impl<T: Clone + 'static> ReactiveCell<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            latest: Rc::new(RefCell::new(initial)),
            emitter: EventEmitter::new(),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.latest.borrow().clone()
    }

    pub fn subscribe(&self, mut observer: impl FnMut(&T) + 'static) -> Subscription {
        let current = self.get();
        observer(&current);
        self.emitter.subscribe(observer)
    }

    pub fn publish(&self, value: T) {
        *self.latest.borrow_mut() = value.clone();
        self.emitter.emit(&value);
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.emitter.observer_count()
    }

    pub fn clear_observers(&self) {
        self.emitter.clear();
    }
}

impl<T: Clone + 'static> Clone for ReactiveCell<T> {
    /// Clones share the stored value and the observer list.
    fn clone(&self) -> Self {
        Self {
            latest: Rc::clone(&self.latest),
            emitter: EventEmitter {
                observers: Rc::clone(&self.emitter.observers),
            },
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveCell")
            .field("latest", &self.latest.borrow())
            .field("emitter", &self.emitter)
            .finish()
    }
}
