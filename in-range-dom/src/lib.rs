//! Browser bindings for [`in_range`].
//!
//! ## Usage
//!
//! Declare the markup with the `data-in-range-*` attributes (see
//! [`in_range::config::attr`]) and bind it from wasm:
//!
//! ```ignore
//! use in_range::MinMax;
//!
//! let price = in_range_dom::range_min_max(
//!     "#price",
//!     |args| args.on_value_change(|event| tracing::info!(?event.target.value, "price")),
//!     MinMax::default(),
//! )?;
//! ```
//!
//! Off wasm only the error type and the selector helpers are available.
#![deny(missing_docs, clippy::unwrap_used)]

mod error;
#[cfg(target_arch = "wasm32")]
pub mod host;
pub mod selector;
#[cfg(target_arch = "wasm32")]
mod widget;

pub use crate::error::DomError;
#[cfg(target_arch = "wasm32")]
pub use crate::widget::{mark_has_js, range_min_max, range_value};
