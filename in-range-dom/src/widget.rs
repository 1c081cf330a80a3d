use std::sync::Arc;

use in_range::{
    MinMax, RangeArgs, RangeMinMax, RangeMinMaxArgs, RangeValue, Thumb,
    host::{FillHost, RangeHost},
};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::{
    DomError,
    host::{DomFill, DomThumb, ElementAttributes, document, find, js_error},
    selector,
};

const HAS_JS: &str = "data-has-js";

fn root_element(selector: &str) -> Result<HtmlElement, DomError> {
    document()?
        .query_selector(selector)
        .map_err(js_error)?
        .ok_or_else(|| in_range::Error::MissingElement(selector.to_string()))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| DomError::UnexpectedElement(selector.to_string()))
}

fn fill_host(root: &Element) -> Option<Arc<dyn FillHost>> {
    DomFill::find(root).map(|fill| Arc::new(fill) as Arc<dyn FillHost>)
}

/// Binds a single-value widget to the element matched by `selector`.
///
/// Arguments start from the root's `data-in-range-*` attributes and the
/// input's `name`; `configure` may override any of them.
pub fn range_value(
    selector: &str,
    configure: impl FnOnce(RangeArgs) -> RangeArgs,
    initial: Option<f64>,
) -> Result<RangeValue, DomError> {
    mark_has_js();
    let root = root_element(selector)?;
    let thumb = DomThumb::find(root.clone())?;
    let args = RangeArgs::from_attributes(&ElementAttributes(&root))?.name(thumb.input_name());
    let fill = fill_host(&root);
    let range = RangeValue::new(Arc::new(thumb), fill, configure(args), initial)?;
    debug!(%selector, "range value bound");
    Ok(range)
}

/// Binds a dual-thumb widget to the element matched by `selector`.
///
/// The root must carry `data-in-range-name`; its two nested thumb roots are
/// tagged `data-in-range-name="min"` and `"max"`.
pub fn range_min_max(
    selector: &str,
    configure: impl FnOnce(RangeMinMaxArgs) -> RangeMinMaxArgs,
    initial: MinMax<Option<f64>>,
) -> Result<RangeMinMax, DomError> {
    mark_has_js();
    let root = root_element(selector)?;
    let args = RangeMinMaxArgs::from_attributes(&ElementAttributes(&root))?;
    let min = DomThumb::find(find::<HtmlElement>(&root, &selector::thumb_root(Thumb::Min))?)?;
    let max = DomThumb::find(find::<HtmlElement>(&root, &selector::thumb_root(Thumb::Max))?)?;
    let hosts: MinMax<Arc<dyn RangeHost>> = MinMax::new(Arc::new(min), Arc::new(max));
    let fill = fill_host(&root);
    let range = RangeMinMax::new(hosts, fill, configure(args), initial)?;
    debug!(%selector, "range min max bound");
    Ok(range)
}

/// Marks the document element with `data-has-js` so styles can tell
/// scripted pages apart.
pub fn mark_has_js() {
    let Ok(root) = document().and_then(|doc| doc.document_element().ok_or(DomError::NoDocument))
    else {
        return;
    };
    if !root.has_attribute(HAS_JS)
        && let Err(error) = root.set_attribute(HAS_JS, "")
    {
        warn!(?error, "failed to mark the document");
    }
}
