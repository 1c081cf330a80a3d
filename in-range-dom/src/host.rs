//! `web-sys` implementations of the element hosts.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use in_range::{
    Callback, Rect,
    config::{Attributes, attr},
    host::{
        DomEvent, EventHandler, EventKind, EventTarget, FillHost, ListenerId, RangeHost, TimerId,
    },
};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use send_wrapper::SendWrapper;
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{Element, HtmlElement, HtmlInputElement, MouseEvent, TouchEvent};

use crate::{DomError, selector};

pub(crate) fn js_error(error: JsValue) -> DomError {
    DomError::Js(format!("{error:?}"))
}

pub(crate) fn window() -> Result<web_sys::Window, DomError> {
    web_sys::window().ok_or(DomError::NoDocument)
}

pub(crate) fn document() -> Result<web_sys::Document, DomError> {
    window()?.document().ok_or(DomError::NoDocument)
}

/// Finds a descendant of `root` and casts it to `T`.
pub(crate) fn find<T: JsCast>(root: &Element, selector: &str) -> Result<T, DomError> {
    root.query_selector(selector)
        .map_err(js_error)?
        .ok_or_else(|| in_range::Error::MissingElement(selector.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| DomError::UnexpectedElement(selector.to_string()))
}

/// Attribute view of an element.
pub(crate) struct ElementAttributes<'a>(pub &'a Element);

impl Attributes for ElementAttributes<'_> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }
}

fn to_dom_event(kind: EventKind, event: &web_sys::Event) -> DomEvent {
    match kind {
        EventKind::Click | EventKind::MouseDown | EventKind::MouseUp | EventKind::MouseMove => event
            .dyn_ref::<MouseEvent>()
            .map(|mouse| DomEvent::pointer(f64::from(mouse.client_x())))
            .unwrap_or_default(),
        EventKind::TouchStart | EventKind::TouchMove | EventKind::TouchEnd => event
            .dyn_ref::<TouchEvent>()
            .map(|touch| {
                let list = touch.target_touches();
                DomEvent::Touch {
                    touches: (0..list.length())
                        .filter_map(|index| list.get(index))
                        .map(|touch| f64::from(touch.client_x()))
                        .collect(),
                }
            })
            .unwrap_or_default(),
        EventKind::Change => event
            .target()
            .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
            .map(|input| DomEvent::change(input.value()))
            .unwrap_or_default(),
        EventKind::Resize => DomEvent::Plain,
    }
}

struct Listener {
    target: web_sys::EventTarget,
    kind: EventKind,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

struct Timer {
    handle: i32,
    fired: Arc<AtomicBool>,
    _closure: Closure<dyn FnMut()>,
}

struct ThumbElements {
    root: HtmlElement,
    input: HtmlInputElement,
    thumb: HtmlElement,
    listeners: Mutex<FxHashMap<ListenerId, Listener>>,
    timers: Mutex<FxHashMap<TimerId, Timer>>,
}

/// Track, input and thumb of one thumb, looked up inside its root.
///
/// The JS handles stay on the thread that created them; touching them from
/// any other thread panics.
pub struct DomThumb {
    elements: SendWrapper<ThumbElements>,
    next_id: AtomicU64,
}

impl DomThumb {
    /// Looks up the thumb and input elements under `root`.
    pub fn find(root: HtmlElement) -> Result<Self, DomError> {
        let thumb = find::<HtmlElement>(&root, &selector::has_attribute(attr::THUMB))?;
        let input = find::<HtmlInputElement>(&root, &selector::has_attribute(attr::INPUT))?;
        Ok(Self {
            elements: SendWrapper::new(ThumbElements {
                root,
                input,
                thumb,
                listeners: Mutex::new(FxHashMap::default()),
                timers: Mutex::new(FxHashMap::default()),
            }),
            next_id: AtomicU64::new(1),
        })
    }

    /// `name` attribute of the numeric input.
    pub fn input_name(&self) -> String {
        self.elements.input.name()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn event_target(&self, target: EventTarget) -> Option<web_sys::EventTarget> {
        match target {
            EventTarget::Root => Some(self.elements.root.clone().into()),
            EventTarget::Input => Some(self.elements.input.clone().into()),
            EventTarget::Thumb => Some(self.elements.thumb.clone().into()),
            EventTarget::Document => document().ok().map(Into::into),
            EventTarget::Window => web_sys::window().map(Into::into),
        }
    }
}

impl RangeHost for DomThumb {
    fn track_rect(&self) -> Rect {
        let rect = self.elements.root.get_bounding_client_rect();
        Rect::new(rect.left(), rect.width())
    }

    fn write_input(&self, value: &str) {
        self.elements.input.set_value(value);
    }

    fn write_thumb_style(&self, style: &str) {
        if let Err(error) = self.elements.thumb.set_attribute("style", style) {
            warn!(?error, "failed to write thumb style");
        }
    }

    fn listen(&self, target: EventTarget, kind: EventKind, handler: EventHandler) -> ListenerId {
        let id = ListenerId(self.next_id());
        let Some(event_target) = self.event_target(target) else {
            warn!(?target, event = kind.as_str(), "listener target unavailable");
            return id;
        };
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            handler.call(to_dom_event(kind, &event));
        });
        if let Err(error) = event_target
            .add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
        {
            warn!(?error, event = kind.as_str(), "failed to attach listener");
            return id;
        }
        self.elements.listeners.lock().insert(
            id,
            Listener {
                target: event_target,
                kind,
                closure,
            },
        );
        id
    }

    fn unlisten(&self, id: ListenerId) {
        let removed = self.elements.listeners.lock().remove(&id);
        let Some(listener) = removed else {
            return;
        };
        if let Err(error) = listener.target.remove_event_listener_with_callback(
            listener.kind.as_str(),
            listener.closure.as_ref().unchecked_ref(),
        ) {
            warn!(?error, event = listener.kind.as_str(), "failed to detach listener");
        }
    }

    fn set_timeout(&self, delay: Duration, task: Callback) -> TimerId {
        let id = TimerId(self.next_id());
        self.elements
            .timers
            .lock()
            .retain(|_, timer| !timer.fired.load(Ordering::Relaxed));

        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            flag.store(true, Ordering::Relaxed);
            task.call();
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let scheduled = window().and_then(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    millis,
                )
                .map_err(js_error)
        });
        match scheduled {
            Ok(handle) => {
                self.elements.timers.lock().insert(
                    id,
                    Timer {
                        handle,
                        fired,
                        _closure: closure,
                    },
                );
            }
            Err(error) => warn!(%error, "failed to schedule timer"),
        }
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        let removed = self.elements.timers.lock().remove(&id);
        let Some(timer) = removed else {
            return;
        };
        if timer.fired.load(Ordering::Relaxed) {
            return;
        }
        if let Ok(window) = window() {
            window.clear_timeout_with_handle(timer.handle);
        }
    }
}

/// Fill bar element, pinned to its creating thread like [`DomThumb`].
pub struct DomFill {
    element: SendWrapper<HtmlElement>,
}

impl DomFill {
    /// Wraps the fill element.
    pub fn new(element: HtmlElement) -> Self {
        Self {
            element: SendWrapper::new(element),
        }
    }

    /// Looks up an optional fill bar under `root`.
    pub fn find(root: &Element) -> Option<Self> {
        find::<HtmlElement>(root, &selector::has_attribute(attr::FILL))
            .ok()
            .map(Self::new)
    }
}

impl FillHost for DomFill {
    fn write_fill_style(&self, style: &str) {
        if let Err(error) = self.element.set_attribute("style", style) {
            warn!(?error, "failed to write fill style");
        }
    }
}
