use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const CONFIG_GLOBAL: &str = "__BOOKING_CONFIG";
pub const AUTH_GLOBAL: &str = "isAuthenticated";

/// Page settings. Templates may override any field with
/// `window.__BOOKING_CONFIG = { ... }` before the module loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Origin requests are resolved against; the page origin when unset.
    pub api_base_url: Option<String>,
    pub visit_generate_url: String,
    pub visit_guest_url: String,
    pub csrf_cookie: String,
    pub resend_cooldown_ms: i64,
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            visit_generate_url: "/visit/generate/".into(),
            visit_guest_url: "/visit/generate-guest/".into(),
            csrf_cookie: "csrftoken".into(),
            resend_cooldown_ms: 3 * 60 * 1000,
            log_level: "info".into(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn base_url(&self) -> String {
        self.api_base_url
            .clone()
            .filter(|url| !url.is_empty())
            .or_else(page_origin)
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

static CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

fn snapshot_from_globals() -> Option<RuntimeConfig> {
    let window = web_sys::window()?;
    let any = js_sys::Reflect::get(&window, &CONFIG_GLOBAL.into()).ok()?;
    if any.is_undefined() || any.is_null() {
        return None;
    }
    let raw = js_sys::JSON::stringify(&any).ok()?.as_string()?;
    match RuntimeConfig::from_json(&raw) {
        Ok(cfg) => Some(cfg),
        Err(err) => {
            log::warn!("Ignoring malformed {}: {}", CONFIG_GLOBAL, err);
            None
        }
    }
}

/// Resolved once per page; later calls return the cached value.
pub fn current() -> RuntimeConfig {
    CONFIG
        .get_or_init(|| snapshot_from_globals().unwrap_or_default())
        .clone()
}

pub fn init() -> RuntimeConfig {
    current()
}

/// Templates set `isAuthenticated` for signed-in visitors.
pub fn is_authenticated() -> bool {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &AUTH_GLOBAL.into()).ok())
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}
