//! CSS selectors for the `data-in-range-*` markup.

use in_range::{Thumb, config::attr};

/// Selector matching any element carrying `attribute`.
pub fn has_attribute(attribute: &str) -> String {
    format!("[{attribute}]")
}

/// Selector matching the nested root of one thumb of a dual widget.
pub fn thumb_root(thumb: Thumb) -> String {
    format!("[{}=\"{}\"]", attr::NAME, thumb.as_str())
}
