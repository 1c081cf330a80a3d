//! in-range keeps a range slider's numeric value and its visual position in
//! sync.
//!
//! # Widgets
//!
//! [`RangeValue`] drives a single thumb, [`RangeMinMax`] drives two thumbs
//! selecting an interval. Both accept values from pointer clicks, drags,
//! touches, keyboard edits of the numeric input and programmatic calls, and
//! run every candidate through the same validation before it reaches the
//! store.
//!
//! ```
//! use std::sync::Arc;
//!
//! use in_range::{
//!     MinMax, RangeMinMax, RangeMinMaxArgs, Rect, headless::HeadlessDocument, host::RangeHost,
//! };
//!
//! let doc = HeadlessDocument::new();
//! let hosts: MinMax<Arc<dyn RangeHost>> = MinMax::new(
//!     Arc::new(doc.thumb(Rect::new(0.0, 100.0))),
//!     Arc::new(doc.thumb(Rect::new(0.0, 100.0))),
//! );
//! let range = RangeMinMax::new(
//!     hosts,
//!     None,
//!     RangeMinMaxArgs::default().name("price").max(10.0),
//!     MinMax::new(Some(3.0), Some(9.0)),
//! )
//! .expect("valid configuration");
//!
//! range.set_value(9.0, "min");
//! assert_eq!(range.get_value(), MinMax::new(3.0, 9.0));
//! range.set_value(5.0, "min");
//! assert_eq!(range.get_value(), MinMax::new(5.0, 9.0));
//! ```
//!
//! # Hosts
//!
//! The widgets never touch a concrete document. They talk to elements through
//! [`host::RangeHost`] and [`host::FillHost`]; the `headless` feature provides
//! an in-memory implementation for tests and demos.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod config;
mod error;
pub mod fill;
pub mod geometry;
#[cfg(any(test, feature = "headless"))]
pub mod headless;
pub mod host;
pub mod prop;
pub mod range;
pub mod range_min_max;
pub mod range_value;
pub mod store;


pub use crate::{
    config::{ChangeEvent, ChangeTarget, RangeArgs, RangeMinMaxArgs, WidgetArgs},
    error::Error,
    fill::{Fill, FillSpan},
    geometry::{Bounds, Rect},
    prop::{Callback, CallbackWith, Validator},
    range::{RangeControl, RangeController, RangeOptions},
    range_min_max::{MinMax, RangeMinMax, Thumb},
    range_value::RangeValue,
    store::{Action, State, Store},
};
