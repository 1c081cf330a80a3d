//! Configuration errors raised while constructing a widget.
//!
//! Runtime input (drags, key presses, programmatic values) never produces an
//! error; it is either accepted or silently ignored.

use thiserror::Error;

/// Errors returned by widget constructors and option resolution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A required element could not be found.
    #[error("could not find element {0}")]
    MissingElement(String),
    /// A required attribute is absent on the root element.
    #[error("the {0} attribute is required")]
    MissingAttribute(&'static str),
    /// The widget has no logical name to key its value under.
    #[error("missing input element name attribute")]
    MissingName,
    /// A numeric option could not be parsed.
    #[error("'{name}' option is not of type number: {value:?}")]
    InvalidOption {
        /// Option or attribute name.
        name: &'static str,
        /// Raw value that failed to parse.
        value: String,
    },
    /// Bounds must be finite with `max > min` and `step > 0`.
    #[error("invalid bounds: min {min}, max {max}, step {step}")]
    InvalidBounds {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Step size.
        step: f64,
    },
    /// A seed value lies outside the legal domain of its thumb.
    #[error("initial value {value} for '{name}' is outside the legal domain")]
    InvalidInitialValue {
        /// Key the seed was meant for.
        name: String,
        /// Offending value.
        value: f64,
    },
}
