//! Booking form on unit pages. Anonymous visitors are asked to sign in
//! first; their selection waits in session storage and is posted once they
//! come back signed in.

use anyhow::{Context, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlFormElement, HtmlInputElement};

use super::modal::ModalController;
use crate::config;
use crate::error::UiError;
use crate::presenter::{DomPresenter, Presenter};
use crate::utils::cookies::{self, CSRF_FIELD_NAME};
use crate::utils::dom;
use crate::utils::storage::{BrowserStore, KeyValueStore};

pub const STORAGE_KEY: &str = "pendingBooking";
pub const SIGN_IN_MODAL: &str = "modal-sign-in";
pub const FORM_SELECTOR: &str = r#"form[action*="/booking/"]"#;
pub const SIGN_IN_LINKS: &str = ".btn-email-login, .btn-google-login, .btn-apple-login, .btn-register-link";

pub const MSG_NO_PERIOD: &str = "Please select a rental period";
pub const MSG_SESSION: &str = "Session error. Please try again.";

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBooking {
    pub url: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub addons: Vec<String>,
}

impl PendingBooking {
    pub fn stash(&self, store: &dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => store.set(STORAGE_KEY, &json),
            Err(err) => log::warn!("Cannot store pending booking: {}", err),
        }
    }

    /// Removes the stored selection and returns it when it names a period.
    pub fn take(store: &dyn KeyValueStore) -> Option<Self> {
        let raw = store.get(STORAGE_KEY)?;
        store.remove(STORAGE_KEY);
        match serde_json::from_str::<PendingBooking>(&raw) {
            Ok(pending) if !pending.period.is_empty() => Some(pending),
            Ok(_) => None,
            Err(err) => {
                log::warn!("Dropping unreadable pending booking: {}", err);
                None
            }
        }
    }

    /// Hidden fields of the replayed POST, in submit order.
    pub fn form_fields(&self, csrf_token: &str) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            (CSRF_FIELD_NAME, csrf_token.to_string()),
            ("period", self.period.clone()),
        ];
        fields.extend(self.addons.iter().map(|addon| ("addons", addon.clone())));
        fields
    }
}

/// Points a sign-in link back at `path` after login.
pub fn with_next(href: &str, path: &str) -> String {
    let base = href.split('?').next().unwrap_or_default();
    format!("{}?next={}", base, utf8_percent_encode(path, URI_COMPONENT))
}

fn checked_values(selector: &str) -> Vec<String> {
    dom::query_all(selector)
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlInputElement>().ok())
        .filter(HtmlInputElement::checked)
        .map(|input| input.value())
        .collect()
}

fn replay(pending: &PendingBooking) -> Result<(), UiError> {
    let Some(token) = cookies::read_cookie(&config::current().csrf_cookie) else {
        DomPresenter.alert(MSG_SESSION);
        return Ok(());
    };
    let document = dom::document()?;
    let form: HtmlFormElement = document
        .create_element("form")?
        .dyn_into()
        .map_err(|_| UiError::Js("form cast".into()))?;
    form.set_method("POST");
    form.set_action(&pending.url);
    form.style().set_property("display", "none")?;
    for (name, value) in pending.form_fields(&token) {
        let input = document.create_element("input")?;
        input.set_attribute("type", "hidden")?;
        input.set_attribute("name", name)?;
        input.set_attribute("value", &value)?;
        form.append_child(&input)?;
    }
    dom::body()?.append_child(&form)?;
    log::info!("Submitting booking saved before sign-in");
    form.submit()?;
    Ok(())
}

fn ask_to_sign_in(modals: &ModalController) {
    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string());
    if let Some(modal) = dom::by_id(SIGN_IN_MODAL) {
        for link in dom::query_all_in(&modal, SIGN_IN_LINKS) {
            if let Some(href) = link.get_attribute("href").filter(|h| !h.is_empty()) {
                let _ = link.set_attribute("href", &with_next(&href, &path));
            }
        }
        modals.open(SIGN_IN_MODAL, None);
    }
}

fn on_submit(form: &Element, event: &Event, authenticated: bool, modals: &ModalController) {
    let Some(period) = checked_values(r#"input[name="period"]"#).into_iter().next() else {
        event.prevent_default();
        DomPresenter.alert(MSG_NO_PERIOD);
        return;
    };
    if authenticated {
        return;
    }
    event.prevent_default();
    let pending = PendingBooking {
        url: form
            .dyn_ref::<HtmlFormElement>()
            .map(HtmlFormElement::action)
            .unwrap_or_default(),
        period,
        addons: checked_values(r#"input[name="addons"]:checked"#),
    };
    pending.stash(&BrowserStore::Session);
    ask_to_sign_in(modals);
}

pub fn attach(modals: &ModalController) -> Result<()> {
    let Some(form) = dom::query(FORM_SELECTOR) else {
        return Ok(());
    };
    let authenticated = config::is_authenticated();

    if authenticated {
        let store = BrowserStore::Session;
        if store.get(STORAGE_KEY).is_some() {
            if let Some(pending) = PendingBooking::take(&store) {
                replay(&pending).context("replaying pending booking")?;
            }
            return Ok(());
        }
    }

    let modals = modals.clone();
    let target = form.clone();
    dom::listen(&form, "submit", move |event: Event| {
        on_submit(&target, &event, authenticated, &modals)
    })?;
    Ok(())
}
