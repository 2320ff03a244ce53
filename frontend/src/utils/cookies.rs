use percent_encoding::percent_decode_str;
use wasm_bindgen::JsCast;

pub const CSRF_FIELD_NAME: &str = "csrfmiddlewaretoken";

/// Finds `name` in a `document.cookie` style string and URL-decodes its value.
pub fn extract_cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').map(str::trim).find_map(|pair| {
        let value = pair.strip_prefix(name)?.strip_prefix('=')?;
        Some(percent_decode_str(value).decode_utf8_lossy().into_owned())
    })
}

pub fn read_cookie(name: &str) -> Option<String> {
    let document = web_sys::window()?
        .document()?
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()?;
    let cookies = document.cookie().ok()?;
    if cookies.is_empty() {
        return None;
    }
    extract_cookie_value(&cookies, name)
}

/// CSRF token from the hidden form field the server renders, else the cookie.
pub fn csrf_token(cookie_name: &str) -> Option<String> {
    let from_field = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| {
            d.query_selector(&format!("[name={}]", CSRF_FIELD_NAME))
                .ok()
                .flatten()
        })
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
        .filter(|value| !value.is_empty());
    from_field.or_else(|| read_cookie(cookie_name))
}
