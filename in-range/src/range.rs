//! Single-thumb controller.
//!
//! ## Usage
//!
//! Build one [`RangeController`] per thumb on top of a shared [`Store`],
//! subscribe its [`RangeController::observer`] and route programmatic values
//! through [`RangeControl::set_value`]. The composers in
//! [`crate::range_value`] and [`crate::range_min_max`] do all of this.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    geometry::{Bounds, get_next_value, is_valid_value, snap_to_grid, value_to_position},
    host::{ListenerId, RangeHost, TimerId},
    prop::{Callback, Validator},
    store::{Action, Observer, State, Store},
};

mod handlers;

/// Delay between the last window resize and the track re-measurement.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(400);

/// Listeners registered per controller.
pub const LISTENER_COUNT: usize = 9;

/// Per-thumb configuration.
#[derive(Clone, Debug)]
pub struct RangeOptions {
    /// Key of this thumb in the value map.
    pub name: String,
    /// Legal domain.
    pub bounds: Bounds,
    /// Extra acceptance predicate.
    pub on_validate: Option<Validator>,
}

impl RangeOptions {
    /// Options without a custom predicate.
    pub fn new(name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            bounds,
            on_validate: None,
        }
    }

    /// Adds a custom acceptance predicate.
    pub fn with_validator(mut self, validator: impl Into<Validator>) -> Self {
        self.on_validate = Some(validator.into());
        self
    }
}

/// Imperative surface of one thumb.
pub trait RangeControl {
    /// Accepts `next` if it is valid for this thumb; ignores it otherwise.
    fn set_value(&self, next: f64);

    /// Converts a viewport X coordinate to a value, then behaves like
    /// [`RangeControl::set_value`].
    fn set_position(&self, client_x: f64);

    /// Reconciles the input and thumb with a state change.
    fn update(&self, state: &State, previous: &State);

    /// Removes every listener and pending timer. Safe to call twice.
    fn destroy(&self);
}

/// Controller wiring one thumb's elements to the shared store.
#[derive(Clone)]
pub struct RangeController {
    inner: Arc<RangeInner>,
}

struct RangeInner {
    options: RangeOptions,
    store: Store,
    host: Arc<dyn RangeHost>,
    dragging: AtomicBool,
    pending_resize: Mutex<Option<TimerId>>,
    listeners: Mutex<SmallVec<[ListenerId; LISTENER_COUNT]>>,
}

impl RangeController {
    /// Attaches every listener and measures the track once.
    pub fn new(host: Arc<dyn RangeHost>, options: RangeOptions, store: Store) -> Self {
        let inner = Arc::new(RangeInner {
            options,
            store,
            host,
            dragging: AtomicBool::new(false),
            pending_resize: Mutex::new(None),
            listeners: Mutex::new(SmallVec::new()),
        });
        let listeners = handlers::attach(&inner);
        *inner.listeners.lock() = listeners;
        inner.measure();
        debug!(name = %inner.options.name, "range attached");
        Self { inner }
    }

    /// Key of this thumb.
    pub fn name(&self) -> &str {
        &self.inner.options.name
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.inner.dragging.load(Ordering::Relaxed)
    }

    /// Number of listeners still attached.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    /// Store observer forwarding to [`RangeControl::update`].
    ///
    /// The observer holds a weak reference and goes quiet once the
    /// controller is dropped.
    pub fn observer(&self) -> Observer {
        let weak = Arc::downgrade(&self.inner);
        Observer::new(move |state, previous| {
            if let Some(inner) = weak.upgrade() {
                inner.update(state, previous);
            }
        })
    }
}

impl RangeControl for RangeController {
    fn set_value(&self, next: f64) {
        self.inner.set_value(next);
    }

    fn set_position(&self, client_x: f64) {
        self.inner.set_position(client_x);
    }

    fn update(&self, state: &State, previous: &State) {
        self.inner.update(state, previous);
    }

    fn destroy(&self) {
        self.inner.release();
    }
}

fn thumb_style(position: f64) -> String {
    format!("--range-thumb-left:{position}%;")
}

impl RangeInner {
    fn current(&self) -> Option<f64> {
        self.store.state().value_of(&self.options.name)
    }

    fn accepts(&self, candidate: f64, current: Option<f64>) -> bool {
        is_valid_value(
            candidate,
            current,
            &self.options.bounds,
            self.options.on_validate.as_ref(),
        )
    }

    fn set_value(&self, next: f64) {
        let next = snap_to_grid(next, &self.options.bounds);
        let name = &self.options.name;
        let current = self.current();
        if self.accepts(next, current) {
            debug!(%name, value = next, "value accepted");
            self.store.dispatch(Action::set_value(next, name.clone()));
            return;
        }
        trace!(%name, value = next, "value rejected");
        // Snap a rejected typed value back to the committed one.
        if let Some(current) = current {
            self.host.write_input(&current.to_string());
        }
    }

    fn set_position(&self, client_x: f64) {
        let state = self.store.state();
        let next = get_next_value(client_x, &state.rect, &self.options.bounds);
        if self.accepts(next, state.value_of(&self.options.name)) {
            self.set_value(next);
        }
    }

    fn measure(&self) {
        let rect = self.host.track_rect();
        trace!(name = %self.options.name, ?rect, "track measured");
        self.store.dispatch(Action::set_rect(rect));
    }

    fn schedule_measure(self: &Arc<Self>) {
        let previous = self.pending_resize.lock().take();
        if let Some(id) = previous {
            self.host.clear_timeout(id);
        }
        let weak = Arc::downgrade(self);
        let id = self.host.set_timeout(
            RESIZE_DEBOUNCE,
            Callback::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.pending_resize.lock().take();
                    inner.measure();
                }
            }),
        );
        *self.pending_resize.lock() = Some(id);
    }

    fn update(&self, state: &State, previous: &State) {
        let name = &self.options.name;
        let Some(value) = state.value_of(name) else {
            return;
        };
        if previous.value_of(name) == Some(value) {
            return;
        }
        let position = value_to_position(value, &self.options.bounds);
        self.host.write_input(&value.to_string());
        self.host.write_thumb_style(&thumb_style(position));
    }

    fn release(&self) {
        let listeners = std::mem::take(&mut *self.listeners.lock());
        let pending = self.pending_resize.lock().take();
        if listeners.is_empty() && pending.is_none() {
            return;
        }
        for id in listeners {
            self.host.unlisten(id);
        }
        if let Some(id) = pending {
            self.host.clear_timeout(id);
        }
        self.dragging.store(false, Ordering::Relaxed);
        debug!(name = %self.options.name, "range destroyed");
    }
}

impl Drop for RangeInner {
    fn drop(&mut self) {
        self.release();
    }
}
