use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures raised while touching the page itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UiError {
    #[error("element not found: {0}")]
    MissingElement(String),
    #[error("no window or document available")]
    NoDocument,
    #[error("browser call failed: {0}")]
    Js(String),
    #[error("QR rendering failed: {0}")]
    Qr(String),
}

impl From<JsValue> for UiError {
    fn from(value: JsValue) -> Self {
        let text = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &"message".into())
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{:?}", value));
        UiError::Js(text)
    }
}
