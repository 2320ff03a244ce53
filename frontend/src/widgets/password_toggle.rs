use anyhow::Result;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement};

use crate::presenter::HIDDEN_CLASS;
use crate::utils::dom;

/// Input type after a click on the eye button.
pub fn next_input_type(current: &str) -> &'static str {
    if current == "password" {
        "text"
    } else {
        "password"
    }
}

/// `.password-toggle` buttons reveal the sibling input and swap the eye icons.
pub fn attach() -> Result<()> {
    for button in dom::query_all(".password-toggle") {
        let toggle = button.clone();
        dom::listen(&button, "click", move |_: Event| {
            let Some(input) = toggle
                .parent_element()
                .and_then(|parent| dom::query_in(&parent, "input"))
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let next = next_input_type(&input.type_());
            input.set_type(next);
            let revealed = next == "text";
            if let Some(open) = dom::query_in(&toggle, ".eye-open") {
                dom::set_class(&open, HIDDEN_CLASS, !revealed);
            }
            if let Some(closed) = dom::query_in(&toggle, ".eye-closed") {
                dom::set_class(&closed, HIDDEN_CLASS, revealed);
            }
        })?;
    }
    Ok(())
}
