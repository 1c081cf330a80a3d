//! Dual-thumb widget selecting a `{min, max}` interval.
//!
//! ## Usage
//!
//! Hand [`RangeMinMax::new`] one host per thumb, an optional fill element and
//! [`RangeMinMaxArgs`]. Both thumbs share one store; each thumb only accepts
//! values that keep `min < max`, and every accepted change after seeding is
//! reported once with both values.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    Error,
    config::{ChangeEvent, RangeMinMaxArgs},
    fill::Fill,
    geometry::{Bounds, snap_to_grid},
    host::{FillHost, RangeHost},
    prop::Validator,
    range::{RangeControl, RangeController, RangeOptions},
    range_value::check_seed,
    store::{Action, Observer, Store, Subscription},
};

/// One of the two thumbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Thumb {
    /// Lower thumb, keyed `min`.
    Min,
    /// Upper thumb, keyed `max`.
    Max,
}

impl Thumb {
    /// Both thumbs, lower first.
    pub const ALL: [Self; 2] = [Self::Min, Self::Max];

    /// Value-map key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Thumb keyed exactly `name`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            _ => None,
        }
    }
}

/// A pair of per-thumb values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MinMax<T> {
    /// Lower thumb.
    pub min: T,
    /// Upper thumb.
    pub max: T,
}

impl<T> MinMax<T> {
    /// Creates a pair.
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Entry for `thumb`.
    pub fn get(&self, thumb: Thumb) -> &T {
        match thumb {
            Thumb::Min => &self.min,
            Thumb::Max => &self.max,
        }
    }

    /// Applies `f` to both entries.
    pub fn map<U>(self, mut f: impl FnMut(Thumb, T) -> U) -> MinMax<U> {
        MinMax {
            min: f(Thumb::Min, self.min),
            max: f(Thumb::Max, self.max),
        }
    }
}

/// Ordering predicate for `thumb`, reading the other thumb live from `store`,
/// combined with the caller's predicate.
fn ordering_validator(thumb: Thumb, store: Store, custom: Option<Validator>) -> Validator {
    Validator::new(move |candidate| {
        let state = store.state();
        let ordered = match thumb {
            Thumb::Min => state
                .value_of(Thumb::Max.as_str())
                .is_none_or(|max| candidate < max),
            Thumb::Max => state
                .value_of(Thumb::Min.as_str())
                .is_none_or(|min| candidate > min),
        };
        ordered && custom.as_ref().is_none_or(|validate| validate.call(candidate))
    })
}

fn check_seeds(seeds: &MinMax<f64>, bounds: &Bounds) -> Result<(), Error> {
    check_seed(Thumb::Min.as_str(), seeds.min, bounds)?;
    check_seed(Thumb::Max.as_str(), seeds.max, bounds)?;
    if seeds.min >= seeds.max {
        return Err(Error::InvalidInitialValue {
            name: Thumb::Max.as_str().to_string(),
            value: seeds.max,
        });
    }
    Ok(())
}

fn change_observer(args: &RangeMinMaxArgs) -> Observer {
    let name = args.name.clone();
    let on_value_change = args.on_value_change.clone();
    Observer::new(move |state, previous| {
        if state.value == previous.value || previous.value.is_empty() {
            return;
        }
        let (Some(min), Some(max)) = (
            state.value_of(Thumb::Min.as_str()),
            state.value_of(Thumb::Max.as_str()),
        ) else {
            return;
        };
        on_value_change.call(ChangeEvent::new(name.clone(), MinMax::new(min, max)));
    })
}

/// Dual-thumb range widget.
pub struct RangeMinMax {
    store: Store,
    ranges: MinMax<RangeController>,
    subscriptions: Vec<Subscription>,
}

impl RangeMinMax {
    /// Wires both thumbs and seeds them from `initial`, falling back to the
    /// bounds per thumb.
    pub fn new(
        hosts: MinMax<Arc<dyn RangeHost>>,
        fill: Option<Arc<dyn FillHost>>,
        args: RangeMinMaxArgs,
        initial: MinMax<Option<f64>>,
    ) -> Result<Self, Error> {
        let bounds = args.to_bounds()?;
        let seeds = MinMax::new(
            snap_to_grid(initial.min.unwrap_or(bounds.min), &bounds),
            snap_to_grid(initial.max.unwrap_or(bounds.max), &bounds),
        );
        check_seeds(&seeds, &bounds)?;

        let store = Store::default();
        let ranges = hosts.map(|thumb, host| {
            let mut options = RangeOptions::new(thumb.as_str(), bounds);
            options.on_validate = Some(ordering_validator(
                thumb,
                store.clone(),
                args.on_validate.clone(),
            ));
            RangeController::new(host, options, store.clone())
        });
        let fill = Fill::new(fill, bounds);

        let mut subscriptions = vec![store.subscribe(fill.observer())];
        subscriptions.extend(
            Thumb::ALL
                .iter()
                .map(|thumb| store.subscribe(ranges.get(*thumb).observer())),
        );
        for thumb in Thumb::ALL {
            store.dispatch(Action::set_value(*seeds.get(thumb), thumb.as_str()));
        }
        subscriptions.push(store.subscribe(change_observer(&args)));
        debug!(name = %args.name, min = seeds.min, max = seeds.max, "range min max created");

        Ok(Self {
            store,
            ranges,
            subscriptions,
        })
    }

    /// Routes `next` to the thumb keyed `name`; any other name is ignored.
    pub fn set_value(&self, next: f64, name: &str) {
        match Thumb::from_name(name) {
            Some(thumb) => self.set_thumb(next, thumb),
            None => trace!(%name, value = next, "unknown thumb"),
        }
    }

    /// Routes `next` to `thumb`.
    pub fn set_thumb(&self, next: f64, thumb: Thumb) {
        self.ranges.get(thumb).set_value(next);
    }

    /// Current values of both thumbs.
    pub fn get_value(&self) -> MinMax<f64> {
        let state = self.store.state();
        MinMax::new(
            state.value_of(Thumb::Min.as_str()).unwrap_or(f64::NAN),
            state.value_of(Thumb::Max.as_str()).unwrap_or(f64::NAN),
        )
    }

    /// Detaches every listener and subscription. Safe to call twice.
    pub fn destroy(&mut self) {
        for thumb in Thumb::ALL {
            self.ranges.get(thumb).destroy();
        }
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }
}

impl Drop for RangeMinMax {
    fn drop(&mut self) {
        self.destroy();
    }
}
