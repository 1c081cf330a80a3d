#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use in_range::MinMax;
use in_range_dom::{DomError, range_min_max, range_value};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Element, Event, HtmlInputElement, MouseEvent, MouseEventInit};

wasm_bindgen_test_configure!(run_in_browser);

const SINGLE: &str = r#"
    <input data-in-range-input type="number" name="volume" />
    <label data-in-range-thumb></label>
    <div data-in-range-fill></div>
"#;

const DUAL: &str = r#"
    <div data-in-range-name="min">
        <input data-in-range-input type="number" />
        <label data-in-range-thumb></label>
    </div>
    <div data-in-range-name="max">
        <input data-in-range-input type="number" />
        <label data-in-range-thumb></label>
    </div>
    <div data-in-range-fill></div>
"#;

fn document() -> web_sys::Document {
    web_sys::window()
        .and_then(|window| window.document())
        .expect("browser document")
}

/// Appends a 100px wide root at the left edge of the viewport.
fn mount(id: &str, attributes: &[(&str, &str)], markup: &str) -> Element {
    let doc = document();
    let root = doc.create_element("div").expect("div");
    root.set_id(id);
    root.set_attribute("style", "position:absolute;left:0px;top:0px;width:100px;height:10px")
        .expect("style");
    for (name, value) in attributes {
        root.set_attribute(name, value).expect("attribute");
    }
    root.set_inner_html(markup);
    doc.body()
        .expect("body")
        .append_child(&root)
        .expect("mounted");
    root
}

fn element(selector: &str) -> Element {
    document()
        .query_selector(selector)
        .expect("valid selector")
        .expect("element present")
}

fn input(selector: &str) -> HtmlInputElement {
    element(selector).dyn_into().expect("input element")
}

fn type_value(input: &HtmlInputElement, value: &str) {
    input.set_value(value);
    let event = Event::new("change").expect("change event");
    input.dispatch_event(&event).expect("dispatched");
}

fn click(target: &Element, client_x: i32) {
    let init = MouseEventInit::new();
    init.set_client_x(client_x);
    let event = MouseEvent::new_with_mouse_event_init_dict("click", &init).expect("click event");
    target.dispatch_event(&event).expect("dispatched");
}

fn bounds(min: &'static str, max: &'static str) -> [(&'static str, &'static str); 3] {
    [
        ("data-in-range-min", min),
        ("data-in-range-max", max),
        ("data-in-range-step", "1"),
    ]
}

#[wasm_bindgen_test]
fn range_value_binds_markup() {
    let root = mount("bind-single", &bounds("0", "10"), SINGLE);
    let range = range_value("#bind-single", |args| args, Some(5.0)).expect("bound");

    assert_eq!(range.name(), "volume");
    assert_eq!(range.get_value(), 5.0);
    assert_eq!(input("#bind-single [data-in-range-input]").value(), "5");
    assert_eq!(
        element("#bind-single [data-in-range-thumb]")
            .get_attribute("style")
            .as_deref(),
        Some("--range-thumb-left:50%;")
    );
    assert_eq!(
        element("#bind-single [data-in-range-fill]")
            .get_attribute("style")
            .as_deref(),
        Some("width:50%;left:0%;")
    );
    assert!(
        document()
            .document_element()
            .expect("html element")
            .has_attribute("data-has-js")
    );
    root.remove();
}

#[wasm_bindgen_test]
fn typed_and_clicked_values_reach_the_store() {
    let root = mount("events-single", &bounds("0", "10"), SINGLE);
    let range = range_value("#events-single", |args| args, None).expect("bound");
    let field = input("#events-single [data-in-range-input]");

    type_value(&field, "7");
    assert_eq!(range.get_value(), 7.0);

    type_value(&field, "70");
    assert_eq!(range.get_value(), 7.0);
    assert_eq!(field.value(), "7");

    click(&root, 20);
    assert_eq!(range.get_value(), 2.0);
    root.remove();
}

#[wasm_bindgen_test]
fn missing_thumb_is_a_configuration_error() {
    let root = mount(
        "no-thumb",
        &[],
        r#"<input data-in-range-input type="number" name="volume" />"#,
    );
    let result = range_value("#no-thumb", |args| args, None);
    assert_eq!(
        result.err(),
        Some(DomError::Config(in_range::Error::MissingElement(
            "[data-in-range-thumb]".to_string()
        )))
    );
    root.remove();
}

#[wasm_bindgen_test]
fn missing_input_is_a_configuration_error() {
    let root = mount("no-input", &[], "<label data-in-range-thumb></label>");
    let result = range_value("#no-input", |args| args, None);
    assert_eq!(
        result.err(),
        Some(DomError::Config(in_range::Error::MissingElement(
            "[data-in-range-input]".to_string()
        )))
    );
    root.remove();
}

#[wasm_bindgen_test]
fn missing_root_is_a_configuration_error() {
    let result = range_value("#nowhere", |args| args, None);
    assert_eq!(
        result.err(),
        Some(DomError::Config(in_range::Error::MissingElement(
            "#nowhere".to_string()
        )))
    );
}

#[wasm_bindgen_test]
fn destroy_detaches_every_listener() {
    let root = mount("destroyed", &bounds("0", "10"), SINGLE);
    let mut range = range_value("#destroyed", |args| args, Some(4.0)).expect("bound");
    let field = input("#destroyed [data-in-range-input]");

    range.destroy();
    type_value(&field, "8");
    click(&root, 90);
    assert_eq!(range.get_value(), 4.0);
    assert_eq!(
        element("#destroyed [data-in-range-thumb]")
            .get_attribute("style")
            .as_deref(),
        Some("--range-thumb-left:40%;")
    );
    root.remove();
}

#[wasm_bindgen_test]
fn range_min_max_binds_both_thumbs() {
    let mut attributes = bounds("0", "10").to_vec();
    attributes.push(("data-in-range-name", "price"));
    let root = mount("bind-dual", &attributes, DUAL);
    let range = range_min_max("#bind-dual", |args| args, MinMax::default()).expect("bound");
    let min = input(r#"#bind-dual [data-in-range-name="min"] [data-in-range-input]"#);
    let max = input(r#"#bind-dual [data-in-range-name="max"] [data-in-range-input]"#);
    let fill = element("#bind-dual [data-in-range-fill]");

    assert_eq!(range.get_value(), MinMax::new(0.0, 10.0));
    assert_eq!((min.value().as_str(), max.value().as_str()), ("0", "10"));
    assert_eq!(fill.get_attribute("style").as_deref(), Some("width:100%;left:0%;"));

    type_value(&min, "4");
    assert_eq!(range.get_value(), MinMax::new(4.0, 10.0));
    assert_eq!(fill.get_attribute("style").as_deref(), Some("width:60%;left:40%;"));

    type_value(&min, "10");
    assert_eq!(range.get_value(), MinMax::new(4.0, 10.0));
    assert_eq!(min.value(), "4");
    root.remove();
}

#[wasm_bindgen_test]
fn range_min_max_requires_a_name() {
    let root = mount("unnamed-dual", &bounds("0", "10"), DUAL);
    let result = range_min_max("#unnamed-dual", |args| args, MinMax::default());
    assert_eq!(
        result.err(),
        Some(DomError::Config(in_range::Error::MissingAttribute(
            "data-in-range-name"
        )))
    );
    root.remove();
}
