use rust_i18n::t;

use super::rules::RuleKind;

pub const SUPPORTED_LOCALES: [&str; 3] = ["en", "ru", "ar"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessages {
    pub required: String,
    pub min_length: String,
    pub password_match: String,
    pub password_weak: String,
    pub email: String,
    pub phone: String,
    pub no_digits: String,
}

impl ValidationMessages {
    /// Built-in texts for `locale`; unknown locales fall back to English.
    pub fn defaults_for(locale: &str) -> Self {
        let locale = normalize_locale(locale);
        Self {
            required: t!("validation.required", locale = locale).to_string(),
            min_length: t!("validation.min_length", locale = locale).to_string(),
            password_match: t!("validation.password_match", locale = locale).to_string(),
            password_weak: t!("validation.password_weak", locale = locale).to_string(),
            email: t!("validation.email", locale = locale).to_string(),
            phone: t!("validation.phone", locale = locale).to_string(),
            no_digits: t!("validation.no_digits", locale = locale).to_string(),
        }
    }

    /// Applies per-form overrides. `attr` receives the `data-msg-*` suffix
    /// (`required`, `min-length`, ...); empty values keep the default.
    pub fn with_overrides(mut self, attr: impl Fn(&str) -> Option<String>) -> Self {
        let apply = |key: &str, slot: &mut String| {
            if let Some(text) = attr(key).filter(|t| !t.is_empty()) {
                *slot = text;
            }
        };
        apply("required", &mut self.required);
        apply("min-length", &mut self.min_length);
        apply("password-match", &mut self.password_match);
        apply("password-weak", &mut self.password_weak);
        apply("email", &mut self.email);
        apply("phone", &mut self.phone);
        apply("no-digits", &mut self.no_digits);
        self
    }

    pub fn for_kind(&self, kind: RuleKind) -> &str {
        match kind {
            RuleKind::Required => &self.required,
            RuleKind::MinLength => &self.min_length,
            RuleKind::PasswordMatch => &self.password_match,
            RuleKind::PasswordWeak => &self.password_weak,
            RuleKind::Email => &self.email,
            RuleKind::Phone => &self.phone,
            RuleKind::NoDigits => &self.no_digits,
        }
    }
}

impl Default for ValidationMessages {
    fn default() -> Self {
        Self::defaults_for("en")
    }
}

/// `"ru-RU"` -> `"ru"`; anything unsupported -> `"en"`.
pub fn normalize_locale(raw: &str) -> &'static str {
    let primary = raw.split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase();
    SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|supported| *supported == primary)
        .unwrap_or("en")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn english_defaults() {
        let messages = ValidationMessages::default();
        assert_eq!(messages.required, "Required");
        assert_eq!(messages.min_length, "Too short");
        assert_eq!(messages.password_match, "Does not match");
        assert_eq!(messages.password_weak, "Too weak");
        assert_eq!(messages.email, "Invalid email");
        assert_eq!(messages.phone, "Invalid phone");
        assert_eq!(messages.no_digits, "Numbers not allowed");
    }

    #[test]
    fn localized_defaults() {
        let messages = ValidationMessages::defaults_for("ru-RU");
        assert_eq!(messages.required, "Обязательное поле");
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        assert_eq!(normalize_locale("de"), "en");
        assert_eq!(normalize_locale(""), "en");
        assert_eq!(normalize_locale("AR"), "ar");
    }

    #[test]
    fn overrides_replace_only_present_keys() {
        let attrs: HashMap<&str, &str> =
            [("required", "Обязательно"), ("email", "")].into_iter().collect();
        let messages = ValidationMessages::default()
            .with_overrides(|key| attrs.get(key).map(|v| v.to_string()));
        assert_eq!(messages.required, "Обязательно");
        assert_eq!(messages.email, "Invalid email");
        assert_eq!(messages.for_kind(RuleKind::Required), "Обязательно");
        assert_eq!(messages.for_kind(RuleKind::NoDigits), "Numbers not allowed");
    }
}
