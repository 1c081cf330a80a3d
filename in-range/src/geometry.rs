//! Conversions between pointer position, percentage and stepped value.
//!
//! Everything here is pure. The validators are the single choke point every
//! input path goes through, so keyboard, pointer and programmatic values share
//! the same acceptance rules.

use crate::{Error, prop::Validator};

/// Maximum distance, in steps, a value may sit from the step grid.
pub const STEP_TOLERANCE: f64 = 1e-7;

const MAX_DECIMALS: i32 = 10;

/// Legal value domain and quantization grid of one widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest legal value.
    pub min: f64,
    /// Largest legal value.
    pub max: f64,
    /// Grid spacing, measured from `min`.
    pub step: f64,
}

impl Bounds {
    /// Creates checked bounds.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, Error> {
        let bounds = Self { min, max, step };
        bounds.check()?;
        Ok(bounds)
    }

    /// Fails unless all fields are finite, `max > min` and `step > 0`.
    pub fn check(&self) -> Result<(), Error> {
        let finite = self.min.is_finite() && self.max.is_finite() && self.step.is_finite();
        if !finite || self.max <= self.min || self.step <= 0.0 {
            return Err(Error::InvalidBounds {
                min: self.min,
                max: self.max,
                step: self.step,
            });
        }
        Ok(())
    }

    /// Number of steps between `min` and `max`.
    pub fn step_count(&self) -> f64 {
        (self.max - self.min) / self.step
    }

    /// Whether `value` lies within `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Whether `value` is a whole number of steps away from `min`.
    pub fn is_on_grid(&self, value: f64) -> bool {
        let steps = (value - self.min) / self.step;
        (steps - steps.round()).abs() <= STEP_TOLERANCE
    }

    /// Decimal digits needed to represent every grid value exactly.
    fn precision(&self) -> i32 {
        decimal_places(self.step).max(decimal_places(self.min))
    }
}

/// Cached bounding geometry of the track in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge of the track.
    pub left: f64,
    /// Track width.
    pub width: f64,
}

impl Rect {
    /// Creates a rect from its left edge and width.
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }
}

fn decimal_places(value: f64) -> i32 {
    (0..MAX_DECIMALS)
        .find(|&digits| {
            let scaled = value * 10f64.powi(digits);
            (scaled - scaled.round()).abs() < 1e-9 * scaled.abs().max(1.0)
        })
        .unwrap_or(MAX_DECIMALS)
}

fn round_to_precision(value: f64, digits: i32) -> f64 {
    let multiplier = 10f64.powi(digits);
    (value * multiplier).round() / multiplier
}

/// Maps a pixel offset within the track to the nearest grid value.
///
/// Offsets at or before the track start yield `min`. There is no clamp at
/// the far end, so offsets past the track produce values above `max` that
/// validation rejects. An unmeasured (zero-width) track yields a non-finite
/// value.
pub fn position_to_value(pixel_offset: f64, track_width: f64, bounds: &Bounds) -> f64 {
    if pixel_offset <= 0.0 {
        return bounds.min;
    }
    let pixels_per_step = track_width / bounds.step_count();
    let raw_steps = pixel_offset / pixels_per_step;
    let value = raw_steps.round() * bounds.step + bounds.min;
    round_to_precision(value, bounds.precision())
}

/// Replaces an on-grid `candidate` with the exact grid value it lies on.
///
/// Values off the grid, and non-finite ones, come back unchanged so
/// validation still sees them as they were given.
pub fn snap_to_grid(candidate: f64, bounds: &Bounds) -> f64 {
    if !candidate.is_finite() || !bounds.is_on_grid(candidate) {
        return candidate;
    }
    let steps = ((candidate - bounds.min) / bounds.step).round();
    round_to_precision(steps * bounds.step + bounds.min, bounds.precision())
}

/// Percentage of the track covered up to `value`.
pub fn value_to_position(value: f64, bounds: &Bounds) -> f64 {
    ((value - bounds.min) / (bounds.max - bounds.min)) * 100.0
}

/// Value under the pointer, given the cached track rect.
pub fn get_next_value(pointer_x: f64, rect: &Rect, bounds: &Bounds) -> f64 {
    position_to_value(pointer_x - rect.left, rect.width, bounds)
}

/// Bounds check plus the optional caller predicate.
pub fn validate_value(candidate: f64, bounds: &Bounds, predicate: Option<&Validator>) -> bool {
    bounds.contains(candidate) && predicate.is_none_or(|validate| validate.call(candidate))
}

/// Full acceptance test for a candidate value.
///
/// Rejects non-finite candidates, no-op changes, off-grid values and
/// anything [`validate_value`] refuses.
pub fn is_valid_value(
    candidate: f64,
    current: Option<f64>,
    bounds: &Bounds,
    predicate: Option<&Validator>,
) -> bool {
    candidate.is_finite()
        && current != Some(candidate)
        && bounds.is_on_grid(candidate)
        && validate_value(candidate, bounds, predicate)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use proptest::prelude::*;

    use super::*;

    fn bounds(min: f64, max: f64, step: f64) -> Bounds {
        Bounds { min, max, step }
    }

    #[test]
    fn position_to_value_snaps_to_grid() {
        let bounds = bounds(0.0, 20.0, 1.0);
        let positions = [100.0, 200.0, 330.0, 340.0, 350.0, 400.0];
        let outcomes = [5.0, 10.0, 17.0, 17.0, 18.0, 20.0];
        for (position, expected) in positions.into_iter().zip(outcomes) {
            assert_eq!(position_to_value(position, 400.0, &bounds), expected);
        }
    }

    #[test]
    fn negative_positions_yield_min() {
        let bounds = bounds(0.0, 20.0, 1.0);
        for position in [-10.0, -20.0, -100.0, 0.0] {
            assert_eq!(position_to_value(position, 400.0, &bounds), 0.0);
        }
    }

    #[test]
    fn fractional_steps_round_to_step_precision() {
        let bounds = bounds(0.0, 10.0, 0.1);
        let positions = [0.0, 5.0, 18.0, 57.0, 87.0];
        let outcomes = [0.0, 0.5, 1.8, 5.7, 8.7];
        for (position, expected) in positions.into_iter().zip(outcomes) {
            assert_eq!(position_to_value(position, 100.0, &bounds), expected);
        }
    }

    #[test]
    fn positions_past_the_track_exceed_max() {
        let bounds = bounds(0.0, 20.0, 1.0);
        let value = position_to_value(440.0, 400.0, &bounds);
        assert_eq!(value, 22.0);
        assert!(!is_valid_value(value, Some(5.0), &bounds, None));
    }

    #[test]
    fn unmeasured_track_is_rejected() {
        let bounds = bounds(0.0, 20.0, 1.0);
        let value = position_to_value(10.0, 0.0, &bounds);
        assert!(!value.is_finite());
        assert!(!is_valid_value(value, Some(5.0), &bounds, None));
    }

    #[test]
    fn snap_to_grid_drops_float_noise() {
        let bounds = bounds(0.0, 1.0, 0.1);
        assert_eq!(snap_to_grid(0.1 + 0.2, &bounds), 0.3);
        assert_eq!(snap_to_grid(0.7000000000000001, &bounds), 0.7);
        assert_eq!(snap_to_grid(1.2 - 1.0, &bounds), 0.2);
    }

    #[test]
    fn snap_to_grid_keeps_off_grid_and_non_finite_values() {
        let bounds = bounds(1.0, 11.0, 2.0);
        assert_eq!(snap_to_grid(4.0, &bounds), 4.0);
        assert!(snap_to_grid(f64::NAN, &bounds).is_nan());
        assert_eq!(snap_to_grid(f64::INFINITY, &bounds), f64::INFINITY);
    }

    #[test]
    fn value_to_position_is_percentage_of_bounds() {
        let bounds = bounds(-5.0, 5.0, 1.0);
        assert_eq!(value_to_position(-4.0, &bounds), 10.0);
        assert_eq!(value_to_position(0.0, &bounds), 50.0);
        assert_eq!(value_to_position(2.0, &bounds), 70.0);
    }

    #[test]
    fn get_next_value_offsets_by_rect_left() {
        let bounds = bounds(0.0, 20.0, 1.0);
        let rect = Rect::new(50.0, 400.0);
        assert_eq!(get_next_value(250.0, &rect, &bounds), 10.0);
        assert_eq!(get_next_value(20.0, &rect, &bounds), 0.0);
    }

    #[test]
    fn validate_value_checks_bounds() {
        let inside = bounds(1.0, 20.0, 1.0);
        for value in [1.0, 3.0, 8.0, 16.0] {
            assert!(validate_value(value, &inside, None));
        }
        let narrow = bounds(0.0, 10.0, 1.0);
        for value in [-40.0, -4.0, 100.0, 11.0] {
            assert!(!validate_value(value, &narrow, None));
        }
    }

    #[test]
    fn validate_value_consults_predicate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let predicate = Validator::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        });
        assert!(!validate_value(4.0, &bounds(0.0, 5.0, 1.0), Some(&predicate)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn is_valid_value_rejects_off_grid_values() {
        let bounds = bounds(0.0, 10.0, 2.0);
        for value in [3.0, 5.0, 7.0] {
            assert!(!is_valid_value(value, Some(4.0), &bounds, None));
        }
        for value in [0.0, 2.0, 4.0, 6.0, 8.0] {
            assert!(is_valid_value(value, Some(10.0), &bounds, None));
        }
    }

    #[test]
    fn is_valid_value_measures_grid_from_min() {
        let bounds = bounds(1.0, 11.0, 2.0);
        assert!(is_valid_value(3.0, Some(1.0), &bounds, None));
        assert!(!is_valid_value(4.0, Some(1.0), &bounds, None));
    }

    #[test]
    fn is_valid_value_handles_fractional_steps() {
        let bounds = bounds(0.0, 10.0, 0.1);
        for value in [1.1, 5.7, 8.4] {
            assert!(is_valid_value(value, Some(5.5), &bounds, None));
        }
        assert!(!is_valid_value(5.5, Some(5.5), &bounds, None));
        assert!(!is_valid_value(5.55, Some(5.5), &bounds, None));
    }

    #[test]
    fn is_valid_value_rejects_nan_and_infinity() {
        let bounds = bounds(0.0, 10.0, 1.0);
        assert!(!is_valid_value(f64::NAN, Some(1.0), &bounds, None));
        assert!(!is_valid_value(f64::INFINITY, None, &bounds, None));
    }

    #[test]
    fn bounds_new_rejects_degenerate_domains() {
        assert!(Bounds::new(0.0, 10.0, 1.0).is_ok());
        assert!(Bounds::new(10.0, 10.0, 1.0).is_err());
        assert!(Bounds::new(0.0, 10.0, 0.0).is_err());
        assert!(Bounds::new(0.0, f64::NAN, 1.0).is_err());
    }

    fn grid_case() -> impl Strategy<Value = (Bounds, f64, f64)> {
        (-1000i32..1000, 1u32..200, prop::sample::select(vec![0.1, 0.5, 1.0, 2.0, 5.0]))
            .prop_flat_map(|(min, steps, step)| {
                let bounds = Bounds {
                    min: f64::from(min),
                    max: f64::from(min) + f64::from(steps) * step,
                    step,
                };
                (Just(bounds), 0..=steps, 50.0f64..2000.0)
            })
            .prop_map(|(bounds, index, width)| {
                let value = round_to_precision(
                    bounds.min + f64::from(index) * bounds.step,
                    bounds.precision(),
                );
                (bounds, value, width)
            })
    }

    proptest! {
        #[test]
        fn grid_values_survive_a_position_round_trip((bounds, value, width) in grid_case()) {
            let offset = value_to_position(value, &bounds) * width / 100.0;
            let back = position_to_value(offset, width, &bounds);
            prop_assert!((back - value).abs() <= bounds.step / 2.0);
        }

        #[test]
        fn bounds_map_to_track_ends((bounds, _value, _width) in grid_case()) {
            prop_assert_eq!(value_to_position(bounds.min, &bounds), 0.0);
            prop_assert!((value_to_position(bounds.max, &bounds) - 100.0).abs() < 1e-9);
        }

        #[test]
        fn snapping_a_grid_value_is_identity((bounds, value, _width) in grid_case()) {
            prop_assert_eq!(snap_to_grid(value, &bounds), value);
        }

        #[test]
        fn unchanged_values_are_never_valid((bounds, value, _width) in grid_case()) {
            prop_assert!(!is_valid_value(value, Some(value), &bounds, None));
        }
    }
}
