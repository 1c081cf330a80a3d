use std::sync::{Arc, Weak, atomic::Ordering};

use smallvec::SmallVec;
use tracing::trace;

use super::{LISTENER_COUNT, RangeInner};
use crate::host::{DomEvent, EventHandler, EventKind, EventTarget, ListenerId};

/// Registers every listener of one controller and returns their ids.
pub(super) fn attach(inner: &Arc<RangeInner>) -> SmallVec<[ListenerId; LISTENER_COUNT]> {
    let weak = Arc::downgrade(inner);
    let bindings: [(EventTarget, EventKind, EventHandler); LISTENER_COUNT] = [
        (EventTarget::Root, EventKind::Click, on_click(weak.clone())),
        (EventTarget::Input, EventKind::Change, on_input_change(weak.clone())),
        (EventTarget::Thumb, EventKind::MouseDown, on_press(weak.clone())),
        (EventTarget::Thumb, EventKind::TouchStart, on_press(weak.clone())),
        (EventTarget::Thumb, EventKind::TouchEnd, on_release(weak.clone())),
        (EventTarget::Document, EventKind::MouseUp, on_release(weak.clone())),
        (EventTarget::Document, EventKind::MouseMove, on_drag(weak.clone())),
        (EventTarget::Document, EventKind::TouchMove, on_drag(weak.clone())),
        (EventTarget::Window, EventKind::Resize, on_resize(weak)),
    ];
    bindings
        .into_iter()
        .map(|(target, kind, handler)| inner.host.listen(target, kind, handler))
        .collect()
}

fn bind<F>(weak: Weak<RangeInner>, handler: F) -> EventHandler
where
    F: Fn(&Arc<RangeInner>, DomEvent) + Send + Sync + 'static,
{
    EventHandler::new(move |event| {
        if let Some(inner) = weak.upgrade() {
            handler(&inner, event);
        }
    })
}

fn on_click(weak: Weak<RangeInner>) -> EventHandler {
    bind(weak, |inner, event| {
        if let Some(client_x) = event.client_x() {
            inner.set_position(client_x);
        }
    })
}

fn on_press(weak: Weak<RangeInner>) -> EventHandler {
    bind(weak, |inner, _| inner.dragging.store(true, Ordering::Relaxed))
}

fn on_release(weak: Weak<RangeInner>) -> EventHandler {
    bind(weak, |inner, _| inner.dragging.store(false, Ordering::Relaxed))
}

fn on_drag(weak: Weak<RangeInner>) -> EventHandler {
    bind(weak, |inner, event| {
        if !inner.dragging.load(Ordering::Relaxed) {
            return;
        }
        if let Some(client_x) = event.client_x() {
            inner.set_position(client_x);
        }
    })
}

fn on_input_change(weak: Weak<RangeInner>) -> EventHandler {
    bind(weak, |inner, event| {
        let DomEvent::Change { value } = event else {
            return;
        };
        // Unparsable text goes through the same rejection path as NaN.
        let next = value.trim().parse::<f64>().unwrap_or_else(|_| {
            trace!(raw = %value, "input value is not a number");
            f64::NAN
        });
        inner.set_value(next);
    })
}

fn on_resize(weak: Weak<RangeInner>) -> EventHandler {
    bind(weak, |inner, _| inner.schedule_measure())
}
