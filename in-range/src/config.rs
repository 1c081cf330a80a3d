//! Construction options and the attribute contract.
//!
//! ## Usage
//!
//! Build [`RangeArgs`] or [`RangeMinMaxArgs`] with their setters, or start
//! from the `data-in-range-*` attributes of a root element with
//! `from_attributes` and override individual fields afterwards.

use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

use derive_setters::Setters;

use crate::{
    Error,
    geometry::Bounds,
    prop::{CallbackWith, Validator},
    range_min_max::MinMax,
};

/// Attribute names of the framework-free markup.
pub mod attr {
    /// Root marker; `value` for single-value widgets, `minmax` for dual.
    pub const ROOT: &str = "data-in-range";
    /// Logical name on the root; `min`/`max` on the nested dual-thumb roots.
    pub const NAME: &str = "data-in-range-name";
    /// Optional lower bound on the root.
    pub const MIN: &str = "data-in-range-min";
    /// Optional upper bound on the root.
    pub const MAX: &str = "data-in-range-max";
    /// Optional step on the root.
    pub const STEP: &str = "data-in-range-step";
    /// Draggable thumb label.
    pub const THUMB: &str = "data-in-range-thumb";
    /// Numeric input.
    pub const INPUT: &str = "data-in-range-input";
    /// Optional fill bar.
    pub const FILL: &str = "data-in-range-fill";
}

/// Bounds applied when neither arguments nor attributes set them; these
/// match a native range input.
pub const DEFAULT_BOUNDS: Bounds = Bounds {
    min: 0.0,
    max: 100.0,
    step: 1.0,
};

/// Read access to an element's attributes.
pub trait Attributes {
    /// Value of attribute `name`, if present.
    fn attribute(&self, name: &str) -> Option<String>;
}

impl<S: BuildHasher> Attributes for HashMap<String, String, S> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Attributes for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

fn read_number(
    attributes: &impl Attributes,
    name: &'static str,
    fallback: f64,
) -> Result<f64, Error> {
    match attributes.attribute(name) {
        None => Ok(fallback),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or(Error::InvalidOption { name, value: raw }),
    }
}

/// Reads bounds from the root attributes, falling back to [`DEFAULT_BOUNDS`]
/// per field.
pub fn bounds_from_attributes(attributes: &impl Attributes) -> Result<Bounds, Error> {
    Ok(Bounds {
        min: read_number(attributes, attr::MIN, DEFAULT_BOUNDS.min)?,
        max: read_number(attributes, attr::MAX, DEFAULT_BOUNDS.max)?,
        step: read_number(attributes, attr::STEP, DEFAULT_BOUNDS.step)?,
    })
}

/// Reads the required logical name from the root attributes.
pub fn name_from_attributes(attributes: &impl Attributes) -> Result<String, Error> {
    attributes
        .attribute(attr::NAME)
        .filter(|name| !name.is_empty())
        .ok_or(Error::MissingAttribute(attr::NAME))
}

/// Change notification shaped like a native input `change` event.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent<T> {
    /// Event target.
    pub target: ChangeTarget<T>,
}

/// Target of a [`ChangeEvent`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeTarget<T> {
    /// Widget name.
    pub name: String,
    /// New value.
    pub value: T,
}

impl<T> ChangeEvent<T> {
    /// Creates an event for `name` carrying `value`.
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            target: ChangeTarget {
                name: name.into(),
                value,
            },
        }
    }
}

/// Arguments shared by both widgets, generic over the change payload.
///
/// Use the [`RangeArgs`] and [`RangeMinMaxArgs`] aliases.
#[derive(Clone, Debug, Setters)]
pub struct WidgetArgs<V> {
    /// Key of the value and name reported in change events.
    #[setters(into)]
    pub name: String,
    /// Smallest legal value.
    pub min: f64,
    /// Largest legal value.
    pub max: f64,
    /// Grid spacing from `min`.
    pub step: f64,
    /// Extra acceptance predicate, applied to every thumb.
    #[setters(skip)]
    pub on_validate: Option<Validator>,
    /// Called with the new value after every accepted change.
    #[setters(skip)]
    pub on_value_change: CallbackWith<ChangeEvent<V>>,
}

/// Arguments for [`crate::RangeValue`].
pub type RangeArgs = WidgetArgs<f64>;

/// Arguments for [`crate::RangeMinMax`]; both values travel in each event.
pub type RangeMinMaxArgs = WidgetArgs<MinMax<f64>>;

impl<V: 'static> Default for WidgetArgs<V> {
    fn default() -> Self {
        Self {
            name: String::new(),
            min: DEFAULT_BOUNDS.min,
            max: DEFAULT_BOUNDS.max,
            step: DEFAULT_BOUNDS.step,
            on_validate: None,
            on_value_change: CallbackWith::new(|_| {}),
        }
    }
}

impl<V: 'static> WidgetArgs<V> {
    fn with_attributes(name: String, attributes: &impl Attributes) -> Result<Self, Error> {
        let bounds = bounds_from_attributes(attributes)?;
        Ok(Self {
            name,
            ..Self::default()
        }
        .bounds(bounds))
    }

    /// Sets min, max and step at once.
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.min = bounds.min;
        self.max = bounds.max;
        self.step = bounds.step;
        self
    }

    /// Checked bounds.
    pub fn to_bounds(&self) -> Result<Bounds, Error> {
        Bounds::new(self.min, self.max, self.step)
    }

    /// Sets the acceptance predicate. Dual widgets consult it for both
    /// thumbs, on top of the ordering constraint.
    pub fn on_validate<F>(mut self, on_validate: F) -> Self
    where
        F: Fn(f64) -> bool + Send + Sync + 'static,
    {
        self.on_validate = Some(Validator::new(on_validate));
        self
    }

    /// Sets the change handler.
    pub fn on_value_change<F>(mut self, on_value_change: F) -> Self
    where
        F: Fn(ChangeEvent<V>) + Send + Sync + 'static,
    {
        self.on_value_change = CallbackWith::new(on_value_change);
        self
    }

    /// Sets the change handler using a shared callback.
    pub fn on_value_change_shared(
        mut self,
        on_value_change: impl Into<CallbackWith<ChangeEvent<V>>>,
    ) -> Self {
        self.on_value_change = on_value_change.into();
        self
    }
}

impl RangeArgs {
    /// Starts from the root attributes; the name attribute is optional here.
    pub fn from_attributes(attributes: &impl Attributes) -> Result<Self, Error> {
        let name = attributes.attribute(attr::NAME).unwrap_or_default();
        Self::with_attributes(name, attributes)
    }
}

impl RangeMinMaxArgs {
    /// Starts from the root attributes; the name attribute is required.
    pub fn from_attributes(attributes: &impl Attributes) -> Result<Self, Error> {
        let name = name_from_attributes(attributes)?;
        Self::with_attributes(name, attributes)
    }
}
