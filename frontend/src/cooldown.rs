//! Client-side wait between password-reset emails, per address.

use std::rc::Rc;

use crate::utils::{storage::KeyValueStore, time::format_clock, time::Clock};

pub const KEY_PREFIX: &str = "resend_cooldown_";
pub const DEFAULT_COOLDOWN_MS: i64 = 3 * 60 * 1000;

#[derive(Clone)]
pub struct ResendCooldown {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    cooldown_ms: i64,
}

impl ResendCooldown {
    pub fn new(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        Self::with_duration(store, clock, DEFAULT_COOLDOWN_MS)
    }

    pub fn with_duration(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>, cooldown_ms: i64) -> Self {
        Self {
            store,
            clock,
            cooldown_ms,
        }
    }

    pub fn key(email: &str) -> String {
        format!("{}{}", KEY_PREFIX, email)
    }

    pub fn set_cooldown(&self, email: &str) {
        let expiry = self.clock.now_millis() + self.cooldown_ms;
        self.store.set(&Self::key(email), &expiry.to_string());
        log::debug!("Resend cooldown set until {}", expiry);
    }

    /// Milliseconds left, 0 when there is no (readable) record.
    pub fn remaining_ms(&self, email: &str) -> i64 {
        let Some(expiry) = self
            .store
            .get(&Self::key(email))
            .and_then(|raw| raw.trim().parse::<i64>().ok())
        else {
            return 0;
        };
        (expiry - self.clock.now_millis()).max(0)
    }

    pub fn is_on_cooldown(&self, email: &str) -> bool {
        self.remaining_ms(email) > 0
    }

    /// Whole seconds left, rounded up so the button never unlocks early.
    pub fn remaining_seconds(&self, email: &str) -> u32 {
        let ms = self.remaining_ms(email);
        ((ms + 999) / 1000) as u32
    }
}

/// `M:SS` for a millisecond span.
pub fn format_remaining(ms: i64) -> String {
    format_clock((ms.max(0) / 1000) as u32)
}
