use web_sys::{Storage, Window};

pub fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "No window object".to_string())
}

pub fn local_storage() -> Result<Storage, String> {
    window()?
        .local_storage()
        .map_err(|_| "No localStorage".to_string())?
        .ok_or_else(|| "No localStorage".to_string())
}

pub fn session_storage() -> Result<Storage, String> {
    window()?
        .session_storage()
        .map_err(|_| "No sessionStorage".to_string())?
        .ok_or_else(|| "No sessionStorage".to_string())
}

/// String key/value persistence as offered by the Web Storage API.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `localStorage` or `sessionStorage`, resolved on every call so a page
/// without storage (private mode, sandboxed iframe) degrades to no-ops.
#[derive(Debug, Clone, Copy)]
pub enum BrowserStore {
    Local,
    Session,
}

impl BrowserStore {
    fn storage(&self) -> Option<Storage> {
        let resolved = match self {
            BrowserStore::Local => local_storage(),
            BrowserStore::Session => session_storage(),
        };
        match resolved {
            Ok(storage) => Some(storage),
            Err(err) => {
                log::warn!("{}", err);
                None
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = self.storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to persist {}", key);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.storage() {
            let _ = storage.remove_item(key);
        }
    }
}
