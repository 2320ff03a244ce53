use wasm_bindgen::prelude::wasm_bindgen;

rust_i18n::i18n!("locales", fallback = "en");

pub mod api;
pub mod boot;
pub mod config;
pub mod cooldown;
pub mod countdown;
pub mod error;
pub mod password_reset;
pub mod presenter;
pub mod qr;
pub mod utils;
pub mod validation;
pub mod widgets;

#[cfg(test)]
mod test_support;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = config::init();
    if let Err(err) = console_log::init_with_level(config.log_level()) {
        web_sys::console::warn_1(&format!("Logger already set: {}", err).into());
    }
    log::info!("Starting booking frontend (wasm)");

    if let Err(err) = boot::when_ready() {
        log::error!("Cannot attach page behaviour: {}", err);
    }
}
