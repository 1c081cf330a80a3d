//! Element and event access required by the controllers.
//!
//! The core never touches a concrete DOM. A [`RangeHost`] exposes the elements
//! of one thumb (track root, numeric input, thumb label), the shared
//! `document`/`window` event targets and a timer facility. A [`FillHost`]
//! exposes the optional fill bar.

use std::time::Duration;

use smallvec::SmallVec;

use crate::{
    geometry::Rect,
    prop::{Callback, CallbackWith},
};

/// Element or global object a listener is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// Track element of the thumb.
    Root,
    /// Native numeric input.
    Input,
    /// Draggable thumb label.
    Thumb,
    /// The whole document.
    Document,
    /// The window.
    Window,
}

impl EventTarget {
    /// Whether the target is shared by every widget on the page.
    pub fn is_global(self) -> bool {
        matches!(self, Self::Document | Self::Window)
    }
}

/// Event kinds the controllers listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `click`
    Click,
    /// `change`
    Change,
    /// `mousedown`
    MouseDown,
    /// `mouseup`
    MouseUp,
    /// `mousemove`
    MouseMove,
    /// `touchstart`
    TouchStart,
    /// `touchmove`
    TouchMove,
    /// `touchend`
    TouchEnd,
    /// `resize`
    Resize,
}

impl EventKind {
    /// DOM event type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Change => "change",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseMove => "mousemove",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::Resize => "resize",
        }
    }
}

/// Payload handed to listeners, reduced to what the controllers read.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DomEvent {
    /// Mouse event with its viewport X coordinate.
    Pointer {
        /// `clientX`
        client_x: f64,
    },
    /// Touch event with the `clientX` of each target touch.
    Touch {
        /// Target touches, in order.
        touches: SmallVec<[f64; 2]>,
    },
    /// Input `change` event with the raw input value.
    Change {
        /// `target.value`
        value: String,
    },
    /// Event without a payload the controllers care about.
    #[default]
    Plain,
}

impl DomEvent {
    /// Mouse event at `client_x`.
    pub fn pointer(client_x: f64) -> Self {
        Self::Pointer { client_x }
    }

    /// Single-finger touch event at `client_x`.
    pub fn touch(client_x: f64) -> Self {
        Self::Touch {
            touches: SmallVec::from_slice(&[client_x]),
        }
    }

    /// Input change event carrying `value`.
    pub fn change(value: impl Into<String>) -> Self {
        Self::Change {
            value: value.into(),
        }
    }

    /// X coordinate of a mouse event or of the first target touch.
    pub fn client_x(&self) -> Option<f64> {
        match self {
            Self::Pointer { client_x } => Some(*client_x),
            Self::Touch { touches } => touches.first().copied(),
            _ => None,
        }
    }
}

/// Listener callback.
pub type EventHandler = CallbackWith<DomEvent>;

/// Identifier of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Identifier of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Elements, listeners and timers of one thumb.
pub trait RangeHost: Send + Sync {
    /// Measures the track element.
    fn track_rect(&self) -> Rect;

    /// Writes the numeric input's value.
    fn write_input(&self, value: &str);

    /// Writes the thumb label's `style` attribute.
    fn write_thumb_style(&self, style: &str);

    /// Attaches `handler` for `kind` events on `target`.
    fn listen(&self, target: EventTarget, kind: EventKind, handler: EventHandler) -> ListenerId;

    /// Detaches a listener; unknown ids are ignored.
    fn unlisten(&self, id: ListenerId);

    /// Runs `task` once after `delay`.
    fn set_timeout(&self, delay: Duration, task: Callback) -> TimerId;

    /// Cancels a pending timer; unknown or fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}

/// Optional fill bar element.
pub trait FillHost: Send + Sync {
    /// Writes the fill element's `style` attribute.
    fn write_fill_style(&self, style: &str);
}
