//! After a password reset the server redirects to `?reset=success`; the page
//! greets the user with a modal and drops the query from the address bar.

use anyhow::Result;
use percent_encoding::percent_decode_str;
use wasm_bindgen::JsValue;

use super::modal::ModalController;
use crate::error::UiError;

pub const SUCCESS_MODAL: &str = "modal-password-reset-success";

/// Value of `name` in a `?a=1&b=2` query string.
pub fn query_param(search: &str, name: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            percent_decode_str(&value.replace('+', " "))
                .decode_utf8_lossy()
                .into_owned()
        })
}

pub fn is_reset_success(search: &str) -> bool {
    query_param(search, "reset").as_deref() == Some("success")
}

pub fn attach(modals: &ModalController) -> Result<()> {
    let window = web_sys::window().ok_or(UiError::NoDocument)?;
    let location = window.location();
    let search = location.search().map_err(UiError::from)?;
    if !is_reset_success(&search) {
        return Ok(());
    }
    modals.open(SUCCESS_MODAL, None);
    let path = location.pathname().map_err(UiError::from)?;
    window
        .history()
        .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&path)))
        .map_err(UiError::from)?;
    Ok(())
}
