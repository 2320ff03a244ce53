//! `#phone`: international number typed as `+` and digits only.

use anyhow::Result;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement};

use crate::utils::dom;

pub const PHONE_INPUT: &str = "phone";

/// Keeps the digits and puts a single `+` in front; nothing stays empty.
pub fn mask(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        String::new()
    } else {
        format!("+{}", digits)
    }
}

/// Value to show when the field gains focus, if it should change.
pub fn on_focus(current: &str) -> Option<String> {
    current.is_empty().then(|| "+".to_string())
}

/// A lone `+` left behind is cleared on blur.
pub fn on_blur(current: &str) -> Option<String> {
    (current == "+").then(String::new)
}

pub fn attach() -> Result<()> {
    let Some(input) = dom::by_id(PHONE_INPUT).and_then(|el| el.dyn_into::<HtmlInputElement>().ok()) else {
        return Ok(());
    };

    let field = input.clone();
    dom::listen(&input, "input", move |_: Event| {
        let masked = mask(&field.value());
        if masked != field.value() {
            field.set_value(&masked);
        }
    })?;

    let field = input.clone();
    dom::listen(&input, "focus", move |_: Event| {
        if let Some(next) = on_focus(&field.value()) {
            field.set_value(&next);
        }
    })?;

    let field = input.clone();
    dom::listen(&input, "blur", move |_: Event| {
        if let Some(next) = on_blur(&field.value()) {
            field.set_value(&next);
        }
    })?;
    Ok(())
}
