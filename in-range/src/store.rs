//! Minimal observable store shared by every renderer of one widget.
//!
//! ## Usage
//!
//! Create one store per widget, subscribe the renderers, then dispatch
//! actions. Each dispatch builds a new [`State`], notifies every observer with
//! `(next, previous)` and only then commits `next` as current.
//!
//! Subscribing, unsubscribing or dispatching from inside a notification is
//! unsupported.

use std::sync::Arc;

use im::OrdMap;
use parking_lot::RwLock;
use tracing::trace;

use crate::{geometry::Rect, prop::Slot};

/// Current value per thumb key.
pub type ValueMap = OrdMap<String, f64>;

/// Single source of truth for one widget instance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    /// Value per thumb key; grows as thumbs are seeded, never shrinks.
    pub value: ValueMap,
    /// Last measured track geometry.
    pub rect: Rect,
}

impl State {
    /// Value stored under `name`, if it has been seeded.
    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.value.get(name).copied()
    }
}

/// State transitions understood by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Identity action; returns the state unchanged.
    Init,
    /// Merges one entry into the value map, leaving the others untouched.
    SetValue {
        /// Thumb key.
        name: String,
        /// Accepted value.
        value: f64,
    },
    /// Replaces the rect wholesale.
    SetRect(Rect),
}

impl Action {
    /// Builds a [`Action::SetValue`].
    pub fn set_value(value: f64, name: impl Into<String>) -> Self {
        Self::SetValue {
            name: name.into(),
            value,
        }
    }

    /// Builds a [`Action::SetRect`] from a measured rect.
    pub fn set_rect(rect: Rect) -> Self {
        Self::SetRect(rect)
    }
}

/// Pure reducer producing the next state.
pub fn reduce(state: &State, action: &Action) -> State {
    match action {
        Action::Init => state.clone(),
        Action::SetValue { name, value } => State {
            value: state.value.update(name.clone(), *value),
            rect: state.rect,
        },
        Action::SetRect(rect) => State {
            value: state.value.clone(),
            rect: *rect,
        },
    }
}

/// Store subscriber receiving `(next, previous)` state pairs.
///
/// Observers compare by identity: clones of one observer are the same
/// subscriber.
#[derive(Clone)]
pub struct Observer {
    slot: Slot<dyn Fn(&State, &State) + Send + Sync>,
}

impl Observer {
    /// Wraps a closure as an observer.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&State, &State) + Send + Sync + 'static,
    {
        Self {
            slot: Slot::from_shared(Arc::new(handler)),
        }
    }

    /// Calls the observer.
    pub fn notify(&self, next: &State, previous: &State) {
        let handler = self.slot.shared();
        handler(next, previous);
    }
}

impl PartialEq for Observer {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot
    }
}

impl Eq for Observer {}

struct StoreInner {
    state: RwLock<Arc<State>>,
    observers: RwLock<Vec<Observer>>,
}

/// Shared handle to one widget's state container.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(State::default())
    }
}

impl Store {
    /// Creates a store primed with `initial`.
    pub fn new(initial: State) -> Self {
        let state = reduce(&initial, &Action::Init);
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(Arc::new(state)),
                observers: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Current state. Callers hold a snapshot; later dispatches replace it.
    pub fn state(&self) -> Arc<State> {
        Arc::clone(&self.inner.state.read())
    }

    /// Reduces `action`, notifies every observer, then commits.
    pub fn dispatch(&self, action: Action) {
        let previous = self.state();
        let next = Arc::new(reduce(&previous, &action));
        trace!(?action, "dispatch");
        let observers = self.inner.observers.read().clone();
        for observer in &observers {
            observer.notify(&next, &previous);
        }
        *self.inner.state.write() = next;
    }

    /// Registers `observer`; registering the same observer again is a no-op.
    pub fn subscribe(&self, observer: Observer) -> Subscription {
        {
            let mut observers = self.inner.observers.write();
            if !observers.contains(&observer) {
                observers.push(observer.clone());
            }
        }
        Subscription {
            store: self.clone(),
            observer,
        }
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.read().len()
    }

    fn remove(&self, observer: &Observer) {
        self.inner.observers.write().retain(|o| o != observer);
    }
}

/// Handle returned by [`Store::subscribe`].
///
/// Dropping the handle keeps the subscription alive; call
/// [`Subscription::unsubscribe`] to remove it.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    store: Store,
    observer: Observer,
}

impl Subscription {
    /// Removes the observer from the store.
    pub fn unsubscribe(self) {
        self.store.remove(&self.observer);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;

    fn counting_observer() -> (Observer, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let observer = Observer::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (observer, calls)
    }

    #[test]
    fn reduce_merges_values() {
        let state = reduce(&State::default(), &Action::set_value(5.0, "test"));
        let state = reduce(&state, &Action::set_value(2.0, "other"));
        assert_eq!(state.value_of("test"), Some(5.0));
        assert_eq!(state.value_of("other"), Some(2.0));
    }

    #[test]
    fn reduce_replaces_rect() {
        let state = reduce(&State::default(), &Action::set_rect(Rect::new(10.0, 200.0)));
        assert_eq!(state.rect, Rect::new(10.0, 200.0));
        assert!(state.value.is_empty());
    }

    #[test]
    fn init_action_leaves_state_unchanged() {
        let store = Store::default();
        store.dispatch(Action::set_value(1.0, "test"));
        let before = store.state();
        store.dispatch(Action::Init);
        assert_eq!(*store.state(), *before);
    }

    #[test]
    fn observers_see_next_then_previous() {
        let store = Store::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = store.subscribe(Observer::new(move |next, previous| {
            sink.lock()
                .push((next.value_of("name"), previous.value_of("name")));
        }));
        store.dispatch(Action::set_value(9.0, "name"));
        store.dispatch(Action::set_value(4.0, "name"));
        assert_eq!(*seen.lock(), vec![(Some(9.0), None), (Some(4.0), Some(9.0))]);
    }

    #[test]
    fn state_is_committed_after_notification() {
        let store = Store::default();
        let during = Arc::new(Mutex::new(None));
        let sink = during.clone();
        let reader = store.clone();
        let _subscription = store.subscribe(Observer::new(move |_, _| {
            *sink.lock() = Some(reader.state().value_of("name"));
        }));
        store.dispatch(Action::set_value(3.0, "name"));
        assert_eq!(*during.lock(), Some(None));
        assert_eq!(store.state().value_of("name"), Some(3.0));
    }

    #[test]
    fn every_observer_is_notified_once() {
        let store = Store::default();
        let observers: Vec<_> = (0..3).map(|_| counting_observer()).collect();
        let subscriptions: Vec<_> = observers
            .iter()
            .map(|(observer, _)| store.subscribe(observer.clone()))
            .collect();
        store.dispatch(Action::set_value(9.0, "name"));
        for (_, calls) in &observers {
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
        subscriptions.into_iter().for_each(Subscription::unsubscribe);
        assert_eq!(store.observer_count(), 0);
    }

    #[test]
    fn duplicate_subscription_notifies_once() {
        let store = Store::default();
        let (observer, calls) = counting_observer();
        let _first = store.subscribe(observer.clone());
        let _second = store.subscribe(observer);
        store.dispatch(Action::Init);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.observer_count(), 1);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = Store::default();
        let (observer, calls) = counting_observer();
        let subscription = store.subscribe(observer);
        store.dispatch(Action::Init);
        subscription.unsubscribe();
        store.dispatch(Action::Init);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
