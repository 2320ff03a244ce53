//! Header dropdowns: the language switcher and the signed-in user menu.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlFormElement, KeyboardEvent, MouseEvent};

use crate::presenter::{DomPresenter, Presenter, HIDDEN_CLASS};
use crate::utils::dom;

pub const ARROW_OPEN_CLASS: &str = "rotate-180";

pub const LANG_FORM: &str = "language-form";
pub const LANG_INPUT: &str = "language-input";
pub const LANG_NEXT: &str = "language-next";

static LANG_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/(ru|ar|en)(/|$)").expect("language prefix pattern compiles"));

/// `/ru/units/` -> `/units/`, `/ar` -> `/`. The server re-adds the prefix of
/// the chosen language.
pub fn path_without_lang(path: &str) -> String {
    let stripped = LANG_PREFIX.replace(path, "/");
    if stripped.is_empty() {
        "/".to_string()
    } else {
        stripped.into_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown {
    pub toggle: &'static str,
    pub panel: &'static str,
    pub arrow: &'static str,
    pub close_on_escape: bool,
}

pub static LANGUAGE: Dropdown = Dropdown {
    toggle: "lang-toggle",
    panel: "lang-dropdown",
    arrow: "lang-arrow",
    close_on_escape: true,
};

pub static USER_MENU: Dropdown = Dropdown {
    toggle: "user-menu-toggle",
    panel: "user-menu-dropdown",
    arrow: "user-menu-arrow",
    close_on_escape: false,
};

impl Dropdown {
    pub fn is_open(&self, presenter: &dyn Presenter) -> bool {
        !presenter.has_class(self.panel, HIDDEN_CLASS)
    }

    pub fn toggle(&self, presenter: &dyn Presenter) {
        let open = !self.is_open(presenter);
        presenter.set_class(self.panel, HIDDEN_CLASS, !open);
        presenter.set_class(self.arrow, ARROW_OPEN_CLASS, open);
    }

    pub fn close(&self, presenter: &dyn Presenter) {
        presenter.set_class(self.panel, HIDDEN_CLASS, true);
        presenter.set_class(self.arrow, ARROW_OPEN_CLASS, false);
    }

    /// Toggle on click, close on any click outside toggle and panel.
    pub fn attach(&'static self) -> Result<()> {
        let (Some(toggle), Some(panel)) = (dom::by_id(self.toggle), dom::by_id(self.panel)) else {
            return Ok(());
        };
        dom::listen(&toggle, "click", move |event: MouseEvent| {
            event.stop_propagation();
            self.toggle(&DomPresenter);
        })?;

        let document = dom::document()?;
        dom::listen(&document, "click", move |event: MouseEvent| {
            let target = event.target();
            if !dom::contains_target(&panel, target.clone()) && !dom::contains_target(&toggle, target) {
                self.close(&DomPresenter);
            }
        })?;

        if self.close_on_escape {
            dom::listen(&document, "keydown", move |event: KeyboardEvent| {
                if event.key() == "Escape" {
                    self.close(&DomPresenter);
                }
            })?;
        }
        Ok(())
    }
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// Language options post the chosen code back with the unprefixed path.
pub fn attach_language_switcher() -> Result<()> {
    if dom::by_id(LANGUAGE.toggle).is_none() || dom::by_id(LANGUAGE.panel).is_none() {
        return Ok(());
    }
    LANGUAGE.attach().context("language dropdown")?;

    let presenter = DomPresenter;
    presenter.set_field_value(LANG_NEXT, &path_without_lang(&current_path()));

    for option in dom::query_all(".lang-option") {
        let code = dom::data(&option, "lang").unwrap_or_default();
        dom::listen(&option, "click", move |_: Event| {
            let Some(form) = dom::by_id(LANG_FORM).and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
            else {
                return;
            };
            if dom::by_id(LANG_INPUT).is_none() {
                return;
            }
            DomPresenter.set_field_value(LANG_INPUT, &code);
            DomPresenter.set_field_value(LANG_NEXT, &path_without_lang(&current_path()));
            log::debug!("Switching language to {}", code);
            if let Err(err) = form.submit() {
                log::warn!("Language form did not submit: {:?}", err);
            }
        })?;
    }
    Ok(())
}
