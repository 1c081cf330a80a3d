//! Walks a volume slider and a price interval through clicks, drags, typed
//! values and a window resize on a headless page.
//!
//! Run with `RUST_LOG=in_range=trace` to see every accepted and rejected
//! candidate.

use std::{error::Error, sync::Arc};

use in_range::{
    MinMax, RangeArgs, RangeMinMax, RangeMinMaxArgs, RangeValue, Rect,
    headless::{HeadlessDocument, HeadlessThumb},
    host::{DomEvent, EventKind, EventTarget, RangeHost},
    range::RESIZE_DEBOUNCE,
};
use tracing::info;

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("warn,example=info,in_range=debug") {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("info"),
        },
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn drag(doc: &HeadlessDocument, thumb: &HeadlessThumb, path: &[f64]) {
    thumb.fire(EventTarget::Thumb, EventKind::MouseDown, DomEvent::Plain);
    for client_x in path {
        doc.fire(
            EventTarget::Document,
            EventKind::MouseMove,
            DomEvent::pointer(*client_x),
        );
    }
    doc.fire(EventTarget::Document, EventKind::MouseUp, DomEvent::Plain);
}

fn volume(doc: &HeadlessDocument) -> Result<(), Box<dyn Error>> {
    let thumb = doc.thumb(Rect::new(40.0, 200.0));
    let fill = doc.fill();
    let mut range = RangeValue::new(
        Arc::new(thumb.clone()),
        Some(Arc::new(fill.clone())),
        RangeArgs::default()
            .name("volume")
            .max(10.0)
            .on_value_change(|event| info!(value = event.target.value, "volume changed")),
        Some(3.0),
    )?;

    thumb.fire(EventTarget::Root, EventKind::Click, DomEvent::pointer(140.0));
    drag(doc, &thumb, &[150.0, 170.0, 260.0]);
    thumb.type_value("loud");
    info!(
        value = range.get_value(),
        input = %thumb.input_value(),
        fill = ?fill.style(),
        "volume settled"
    );

    thumb.set_rect(Rect::new(40.0, 400.0));
    doc.fire(EventTarget::Window, EventKind::Resize, DomEvent::Plain);
    doc.advance(RESIZE_DEBOUNCE);
    thumb.fire(EventTarget::Root, EventKind::Click, DomEvent::pointer(140.0));
    info!(value = range.get_value(), "volume after resize");

    range.destroy();
    Ok(())
}

fn price(doc: &HeadlessDocument) -> Result<(), Box<dyn Error>> {
    let thumbs = MinMax::new(
        doc.thumb(Rect::new(0.0, 500.0)),
        doc.thumb(Rect::new(0.0, 500.0)),
    );
    let hosts: MinMax<Arc<dyn RangeHost>> =
        MinMax::new(Arc::new(thumbs.min.clone()), Arc::new(thumbs.max.clone()));
    let fill = doc.fill();
    let mut range = RangeMinMax::new(
        hosts,
        Some(Arc::new(fill.clone())),
        RangeMinMaxArgs::default()
            .name("price")
            .min(100.0)
            .max(600.0)
            .step(50.0)
            .on_value_change(|event| {
                let MinMax { min, max } = event.target.value;
                info!(min, max, "price changed");
            }),
        MinMax::new(Some(150.0), None),
    )?;

    drag(doc, &thumbs.min, &[100.0, 300.0, 600.0]);
    range.set_value(250.0, "max");
    range.set_value(400.0, "max");
    range.set_value(500.0, "median");
    let MinMax { min, max } = range.get_value();
    info!(min, max, fill = ?fill.style(), "price settled");

    range.destroy();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let doc = HeadlessDocument::new();
    volume(&doc)?;
    price(&doc)?;
    info!(
        listeners = doc.listener_count(),
        timers = doc.pending_timers(),
        "page torn down"
    );
    Ok(())
}
