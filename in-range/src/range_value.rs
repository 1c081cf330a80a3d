//! Single-value widget.
//!
//! ## Usage
//!
//! Hand [`RangeValue::new`] the host of one thumb, an optional fill element
//! and [`RangeArgs`]. The widget seeds its value, keeps the input, thumb and
//! fill in sync and reports accepted changes through
//! [`RangeArgs::on_value_change`].

use std::sync::Arc;

use tracing::debug;

use crate::{
    Error,
    config::{ChangeEvent, RangeArgs},
    fill::Fill,
    geometry::{Bounds, snap_to_grid},
    host::{FillHost, RangeHost},
    range::{RangeControl, RangeController, RangeOptions},
    store::{Action, Observer, Store, Subscription},
};

/// Single-value range widget.
pub struct RangeValue {
    name: String,
    store: Store,
    range: RangeController,
    subscriptions: Vec<Subscription>,
}

/// Fails unless `value` is a legal seed for `name`.
pub(crate) fn check_seed(name: &str, value: f64, bounds: &Bounds) -> Result<(), Error> {
    if value.is_finite() && bounds.contains(value) && bounds.is_on_grid(value) {
        return Ok(());
    }
    Err(Error::InvalidInitialValue {
        name: name.to_string(),
        value,
    })
}

fn change_observer(args: &RangeArgs) -> Observer {
    let name = args.name.clone();
    let on_value_change = args.on_value_change.clone();
    Observer::new(move |state, previous| {
        let (Some(value), Some(previous)) = (state.value_of(&name), previous.value_of(&name))
        else {
            return;
        };
        if value != previous {
            on_value_change.call(ChangeEvent::new(name.clone(), value));
        }
    })
}

impl RangeValue {
    /// Wires the widget and seeds it with `initial`, or `args.min` when absent.
    pub fn new(
        host: Arc<dyn RangeHost>,
        fill: Option<Arc<dyn FillHost>>,
        args: RangeArgs,
        initial: Option<f64>,
    ) -> Result<Self, Error> {
        if args.name.is_empty() {
            return Err(Error::MissingName);
        }
        let bounds = args.to_bounds()?;
        let seed = snap_to_grid(initial.unwrap_or(bounds.min), &bounds);
        check_seed(&args.name, seed, &bounds)?;

        let store = Store::default();
        let mut options = RangeOptions::new(args.name.clone(), bounds);
        options.on_validate = args.on_validate.clone();
        let range = RangeController::new(host, options, store.clone());
        let fill = Fill::new(fill, bounds);

        let subscriptions = vec![
            store.subscribe(fill.observer()),
            store.subscribe(range.observer()),
            store.subscribe(change_observer(&args)),
        ];
        store.dispatch(Action::set_value(seed, args.name.clone()));
        debug!(name = %args.name, value = seed, "range value created");

        Ok(Self {
            name: args.name,
            store,
            range,
            subscriptions,
        })
    }

    /// Name of the widget.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Routes `next` through validation; invalid values are ignored.
    pub fn set_value(&self, next: f64) {
        self.range.set_value(next);
    }

    /// Current value.
    pub fn get_value(&self) -> f64 {
        // Seeded at construction, so the key is always present.
        self.store.state().value_of(&self.name).unwrap_or(f64::NAN)
    }

    /// Detaches every listener and subscription. Safe to call twice.
    pub fn destroy(&mut self) {
        self.range.destroy();
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }
}

impl Drop for RangeValue {
    fn drop(&mut self) {
        self.destroy();
    }
}
