use anyhow::Result;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::UiError;
use crate::utils::dom;

pub const CARD_SELECTOR: &str = ".reveal-card";
pub const REVEALED_CLASS: &str = "revealed";
/// Fires once a card is 50px above the bottom edge of the viewport.
pub const ROOT_MARGIN: &str = "0px 0px -50px 0px";
pub const THRESHOLD: f64 = 0.1;

/// Fades `.reveal-card` elements in the first time they scroll into view.
pub fn attach() -> Result<()> {
    let cards = dom::query_all(CARD_SELECTOR);
    if cards.is_empty() {
        return Ok(());
    }

    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    let card = entry.target();
                    dom::set_class(&card, REVEALED_CLASS, true);
                    observer.unobserve(&card);
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_root_margin(ROOT_MARGIN);
    options.set_threshold(&JsValue::from_f64(THRESHOLD));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
        .map_err(UiError::from)?;
    callback.forget();

    for card in &cards {
        observer.observe(card);
    }
    log::debug!("Watching {} reveal cards", cards.len());
    Ok(())
}
