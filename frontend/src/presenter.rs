//! Presentation port used by the controllers.
//!
//! Controllers never hold DOM nodes; they address elements by id through
//! [`Presenter`]. [`DomPresenter`] is the browser implementation, the test
//! suite records calls instead.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlFormElement, HtmlImageElement, HtmlInputElement};

use crate::error::UiError;
use crate::utils::dom;

/// Class toggled on overlays to show them.
pub const ACTIVE_CLASS: &str = "active";
pub const HIDDEN_CLASS: &str = "hidden";

pub trait Presenter {
    fn set_class(&self, id: &str, class: &str, on: bool);
    fn has_class(&self, id: &str, class: &str) -> bool;
    fn set_text(&self, id: &str, value: &str);
    fn set_html(&self, id: &str, html: &str);
    fn set_disabled(&self, id: &str, disabled: bool);
    fn set_image(&self, id: &str, src: &str);
    fn text(&self, id: &str) -> Option<String>;
    fn field_value(&self, id: &str) -> Option<String>;
    fn set_field_value(&self, id: &str, value: &str);
    fn reset_form(&self, id: &str);
    fn lock_scroll(&self, locked: bool);
    fn alert(&self, message: &str);

    fn show_modal(&self, id: &str) {
        self.set_class(id, ACTIVE_CLASS, true);
    }

    fn hide_modal(&self, id: &str) {
        self.set_class(id, ACTIVE_CLASS, false);
    }

    fn is_shown(&self, id: &str) -> bool {
        self.has_class(id, ACTIVE_CLASS)
    }
}

#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), UiError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DomPresenter;

impl Presenter for DomPresenter {
    fn set_class(&self, id: &str, class: &str, on: bool) {
        if let Some(el) = dom::by_id(id) {
            dom::set_class(&el, class, on);
        }
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        dom::by_id(id)
            .map(|el| dom::has_class(&el, class))
            .unwrap_or(false)
    }

    fn set_text(&self, id: &str, value: &str) {
        if let Some(el) = dom::by_id(id) {
            el.set_text_content(Some(value));
        }
    }

    fn set_html(&self, id: &str, html: &str) {
        if let Some(el) = dom::by_id(id) {
            el.set_inner_html(html);
        }
    }

    fn set_disabled(&self, id: &str, disabled: bool) {
        if let Some(el) = dom::by_id(id) {
            let _ = if disabled {
                el.set_attribute("disabled", "")
            } else {
                el.remove_attribute("disabled")
            };
        }
    }

    fn set_image(&self, id: &str, src: &str) {
        let Some(el) = dom::by_id(id) else {
            log::error!("Image target not found: {}", id);
            return;
        };
        if let Some(img) = el.dyn_ref::<HtmlImageElement>() {
            img.set_src(src);
            return;
        }
        // Markup may still carry a <canvas>; swap it for an <img> with the same id.
        let replaced = dom::document().and_then(|doc| {
            let img = doc
                .create_element("img")?
                .dyn_into::<HtmlImageElement>()
                .map_err(|_| UiError::Js("img cast".into()))?;
            img.set_id(id);
            img.set_class_name(&el.class_name());
            img.set_src(src);
            img.set_width(200);
            img.set_height(200);
            el.replace_with_with_node_1(&img)?;
            Ok(())
        });
        if let Err(err) = replaced {
            log::error!("Failed to place QR image in {}: {}", id, err);
        }
    }

    fn text(&self, id: &str) -> Option<String> {
        dom::by_id(id).and_then(|el| el.text_content())
    }

    fn field_value(&self, id: &str) -> Option<String> {
        dom::by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
    }

    fn set_field_value(&self, id: &str, value: &str) {
        if let Some(input) = dom::by_id(id).and_then(|el| el.dyn_into::<HtmlInputElement>().ok()) {
            input.set_value(value);
        }
    }

    fn reset_form(&self, id: &str) {
        if let Some(form) = dom::by_id(id).and_then(|el| el.dyn_into::<HtmlFormElement>().ok()) {
            form.reset();
        }
    }

    fn lock_scroll(&self, locked: bool) {
        if let Ok(body) = dom::body() {
            let style = body.style();
            let _ = if locked {
                style.set_property("overflow", "hidden")
            } else {
                style.remove_property("overflow").map(|_| ())
            };
        }
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClipboard;

impl Clipboard for BrowserClipboard {
    async fn write_text(&self, text: &str) -> Result<(), UiError> {
        let window = web_sys::window().ok_or(UiError::NoDocument)?;
        let promise = window.navigator().clipboard().write_text(text);
        JsFuture::from(promise).await?;
        Ok(())
    }
}
