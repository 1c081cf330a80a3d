//! Fill bar renderer.
//!
//! The fill spans from the start of the track (single value) or the min
//! thumb (dual thumb) to the value thumb or the max thumb.

use std::sync::Arc;

use crate::{
    geometry::{Bounds, value_to_position},
    host::FillHost,
    store::{Observer, State, ValueMap},
};

/// Start and end of the fill, in percent of the track.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FillSpan {
    /// Left edge.
    pub start: f64,
    /// Right edge.
    pub end: f64,
}

impl FillSpan {
    /// Computes the span for whichever keys are present.
    pub fn from_values(value: &ValueMap, bounds: &Bounds) -> Self {
        if let (Some(min), Some(max)) = (value.get("min"), value.get("max")) {
            return Self {
                start: value_to_position(*min, bounds),
                end: value_to_position(*max, bounds),
            };
        }
        match value.values().next() {
            Some(single) => Self {
                start: 0.0,
                end: value_to_position(*single, bounds),
            },
            None => Self::default(),
        }
    }

    /// CSS `style` attribute for the fill element.
    pub fn style(&self) -> String {
        format!("width:{}%;left:{}%;", self.end - self.start, self.start)
    }
}

/// Store subscriber keeping the fill element in sync.
///
/// Without an element every update is a no-op.
#[derive(Clone)]
pub struct Fill {
    element: Option<Arc<dyn FillHost>>,
    bounds: Bounds,
}

impl Fill {
    /// Creates the renderer; `element` may be absent.
    pub fn new(element: Option<Arc<dyn FillHost>>, bounds: Bounds) -> Self {
        Self { element, bounds }
    }

    /// Rewrites the fill when the value map changed.
    pub fn update(&self, state: &State, previous: &State) {
        let Some(element) = self.element.as_ref() else {
            return;
        };
        if state.value == previous.value {
            return;
        }
        let span = FillSpan::from_values(&state.value, &self.bounds);
        element.write_fill_style(&span.style());
    }

    /// Store observer forwarding to [`Fill::update`].
    pub fn observer(&self) -> Observer {
        let fill = self.clone();
        Observer::new(move |state, previous| fill.update(state, previous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::Rect, headless::HeadlessFill};

    fn state(values: &[(&str, f64)]) -> State {
        State {
            value: values
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
            rect: Rect::new(0.0, 100.0),
        }
    }

    fn fill() -> (Fill, HeadlessFill) {
        let element = HeadlessFill::default();
        let bounds = Bounds::new(0.0, 10.0, 1.0).expect("bounds");
        (Fill::new(Some(Arc::new(element.clone())), bounds), element)
    }

    #[test]
    fn single_value_fills_from_track_start() {
        let (fill, element) = fill();
        fill.update(&state(&[("test", 0.0)]), &state(&[("test", 1.0)]));
        assert_eq!(element.style().as_deref(), Some("width:0%;left:0%;"));
        fill.update(&state(&[("test", 4.0)]), &state(&[("test", 0.0)]));
        assert_eq!(element.style().as_deref(), Some("width:40%;left:0%;"));
    }

    #[test]
    fn min_max_values_fill_between_thumbs() {
        let (fill, element) = fill();
        fill.update(
            &state(&[("min", 0.0), ("max", 10.0)]),
            &state(&[("min", 1.0), ("max", 8.0)]),
        );
        assert_eq!(element.style().as_deref(), Some("width:100%;left:0%;"));
        fill.update(
            &state(&[("min", 2.0), ("max", 7.0)]),
            &state(&[("min", 0.0), ("max", 10.0)]),
        );
        assert_eq!(element.style().as_deref(), Some("width:50%;left:20%;"));
    }

    #[test]
    fn equal_value_maps_are_skipped() {
        let (fill, element) = fill();
        let current = state(&[("test", 1.0)]);
        let mut moved = current.clone();
        moved.rect = Rect::new(40.0, 300.0);
        fill.update(&moved, &current);
        assert_eq!(element.writes(), 0);
    }

    #[test]
    fn new_keys_count_as_a_change() {
        let (fill, element) = fill();
        fill.update(&state(&[("min", 2.0)]), &state(&[]));
        assert_eq!(element.style().as_deref(), Some("width:20%;left:0%;"));
        fill.update(&state(&[("min", 2.0), ("max", 6.0)]), &state(&[("min", 2.0)]));
        assert_eq!(element.style().as_deref(), Some("width:40%;left:20%;"));
    }

    #[test]
    fn missing_element_is_a_no_op() {
        let fill = Fill::new(None, Bounds::new(0.0, 10.0, 1.0).expect("bounds"));
        fill.update(&state(&[("test", 3.0)]), &state(&[]));
    }

    #[test]
    fn empty_map_spans_nothing() {
        let bounds = Bounds::new(0.0, 10.0, 1.0).expect("bounds");
        assert_eq!(FillSpan::from_values(&ValueMap::new(), &bounds), FillSpan::default());
    }
}
