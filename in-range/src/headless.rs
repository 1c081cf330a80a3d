//! In-memory document for driving widgets without a browser.
//!
//! ## Usage
//!
//! Create a [`HeadlessDocument`], hand out one [`HeadlessThumb`] per thumb
//! and an optional [`HeadlessFill`], then fire synthetic events and advance
//! the manual clock to exercise a widget end to end.
//!
//! ```
//! use std::sync::Arc;
//!
//! use in_range::{
//!     Rect, RangeArgs, RangeValue,
//!     headless::HeadlessDocument,
//!     host::{DomEvent, EventKind, EventTarget},
//! };
//!
//! let doc = HeadlessDocument::new();
//! let thumb = doc.thumb(Rect::new(0.0, 200.0));
//! let range = RangeValue::new(
//!     Arc::new(thumb.clone()),
//!     None,
//!     RangeArgs::default().name("volume").max(10.0),
//!     None,
//! )
//! .expect("valid configuration");
//!
//! thumb.fire(EventTarget::Root, EventKind::Click, DomEvent::pointer(100.0));
//! assert_eq!(range.get_value(), 5.0);
//! ```

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::{
    geometry::Rect,
    host::{
        DomEvent, EventHandler, EventKind, EventTarget, FillHost, ListenerId, RangeHost, TimerId,
    },
    prop::Callback,
};

struct Listener {
    scope: u64,
    target: EventTarget,
    kind: EventKind,
    handler: EventHandler,
}

struct Timer {
    due: Duration,
    task: Callback,
}

#[derive(Default)]
struct DocumentState {
    next_id: u64,
    listeners: FxHashMap<ListenerId, Listener>,
    timers: FxHashMap<TimerId, Timer>,
    now: Duration,
}

impl DocumentState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared document/window of a headless page.
#[derive(Clone, Default)]
pub struct HeadlessDocument {
    state: Arc<Mutex<DocumentState>>,
}

impl HeadlessDocument {
    /// Creates an empty document at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the elements of one thumb whose track measures `rect`.
    pub fn thumb(&self, rect: Rect) -> HeadlessThumb {
        let scope = self.state.lock().next_id();
        HeadlessThumb {
            document: self.clone(),
            scope,
            elements: Arc::new(Mutex::new(ThumbElements {
                rect,
                ..ThumbElements::default()
            })),
        }
    }

    /// Adds a fill bar element.
    pub fn fill(&self) -> HeadlessFill {
        HeadlessFill::default()
    }

    /// Fires an event on `target` across every thumb; returns the number of
    /// listeners invoked.
    pub fn fire(&self, target: EventTarget, kind: EventKind, event: DomEvent) -> usize {
        self.dispatch(None, target, kind, event)
    }

    fn dispatch(
        &self,
        scope: Option<u64>,
        target: EventTarget,
        kind: EventKind,
        event: DomEvent,
    ) -> usize {
        let handlers: Vec<EventHandler> = {
            let state = self.state.lock();
            let mut matching: Vec<_> = state
                .listeners
                .iter()
                .filter(|(_, listener)| {
                    listener.target == target
                        && listener.kind == kind
                        && (target.is_global() || scope.is_none_or(|s| s == listener.scope))
                })
                .map(|(id, listener)| (*id, listener.handler.clone()))
                .collect();
            matching.sort_by_key(|(id, _)| *id);
            matching.into_iter().map(|(_, handler)| handler).collect()
        };
        for handler in &handlers {
            handler.call(event.clone());
        }
        handlers.len()
    }

    /// Moves the clock forward, running every timer that falls due in order.
    pub fn advance(&self, by: Duration) {
        let now = {
            let mut state = self.state.lock();
            state.now += by;
            state.now
        };
        loop {
            let task = {
                let mut state = self.state.lock();
                let due = state
                    .timers
                    .iter()
                    .filter(|(_, timer)| timer.due <= now)
                    .min_by_key(|(id, timer)| (timer.due, **id))
                    .map(|(id, _)| *id);
                due.and_then(|id| state.timers.remove(&id))
            };
            match task {
                Some(timer) => timer.task.call(),
                None => break,
            }
        }
    }

    /// Number of timers waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.state.lock().timers.len()
    }

    /// Number of attached listeners across every thumb.
    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    /// Kinds attached to `target`, in registration order.
    pub fn listener_kinds(&self, target: EventTarget) -> Vec<EventKind> {
        let state = self.state.lock();
        let mut kinds: Vec<_> = state
            .listeners
            .iter()
            .filter(|(_, listener)| listener.target == target)
            .map(|(id, listener)| (*id, listener.kind))
            .collect();
        kinds.sort_by_key(|(id, _)| *id);
        kinds.into_iter().map(|(_, kind)| kind).collect()
    }
}

#[derive(Default)]
struct ThumbElements {
    rect: Rect,
    input: String,
    input_writes: usize,
    thumb_style: Option<String>,
    thumb_style_writes: usize,
}

/// Track, input and thumb elements of one headless thumb.
#[derive(Clone)]
pub struct HeadlessThumb {
    document: HeadlessDocument,
    scope: u64,
    elements: Arc<Mutex<ThumbElements>>,
}

impl HeadlessThumb {
    /// Fires an event on one of this thumb's elements, or on a global target.
    pub fn fire(&self, target: EventTarget, kind: EventKind, event: DomEvent) -> usize {
        self.document.dispatch(Some(self.scope), target, kind, event)
    }

    /// Types `value` into the input and fires `change`.
    pub fn type_value(&self, value: &str) -> usize {
        self.elements.lock().input = value.to_string();
        self.fire(EventTarget::Input, EventKind::Change, DomEvent::change(value))
    }

    /// Simulates a layout shift of the track.
    pub fn set_rect(&self, rect: Rect) {
        self.elements.lock().rect = rect;
    }

    /// Current input value.
    pub fn input_value(&self) -> String {
        self.elements.lock().input.clone()
    }

    /// Number of input writes performed by the widget.
    pub fn input_writes(&self) -> usize {
        self.elements.lock().input_writes
    }

    /// Current thumb `style` attribute.
    pub fn thumb_style(&self) -> Option<String> {
        self.elements.lock().thumb_style.clone()
    }

    /// Number of thumb style writes performed by the widget.
    pub fn thumb_style_writes(&self) -> usize {
        self.elements.lock().thumb_style_writes
    }
}

impl RangeHost for HeadlessThumb {
    fn track_rect(&self) -> Rect {
        self.elements.lock().rect
    }

    fn write_input(&self, value: &str) {
        let mut elements = self.elements.lock();
        elements.input = value.to_string();
        elements.input_writes += 1;
    }

    fn write_thumb_style(&self, style: &str) {
        let mut elements = self.elements.lock();
        elements.thumb_style = Some(style.to_string());
        elements.thumb_style_writes += 1;
    }

    fn listen(&self, target: EventTarget, kind: EventKind, handler: EventHandler) -> ListenerId {
        let mut state = self.document.state.lock();
        let id = ListenerId(state.next_id());
        state.listeners.insert(
            id,
            Listener {
                scope: self.scope,
                target,
                kind,
                handler,
            },
        );
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.document.state.lock().listeners.remove(&id);
    }

    fn set_timeout(&self, delay: Duration, task: Callback) -> TimerId {
        let mut state = self.document.state.lock();
        let id = TimerId(state.next_id());
        let due = state.now + delay;
        state.timers.insert(id, Timer { due, task });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.document.state.lock().timers.remove(&id);
    }
}

/// Headless fill bar.
#[derive(Clone, Default)]
pub struct HeadlessFill {
    style: Arc<Mutex<(Option<String>, usize)>>,
}

impl HeadlessFill {
    /// Current `style` attribute.
    pub fn style(&self) -> Option<String> {
        self.style.lock().0.clone()
    }

    /// Number of style writes performed by the widget.
    pub fn writes(&self) -> usize {
        self.style.lock().1
    }
}

impl FillHost for HeadlessFill {
    fn write_fill_style(&self, style: &str) {
        let mut slot = self.style.lock();
        slot.0 = Some(style.to_string());
        slot.1 += 1;
    }
}
