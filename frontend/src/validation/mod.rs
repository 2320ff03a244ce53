//! Client-side form checks driven by `data-validate` markup.

pub mod form;
pub mod messages;
pub mod rules;

pub use form::{FieldBinding, FormValidator, ERROR_CLASS};
pub use messages::{normalize_locale, ValidationMessages};
pub use rules::{first_failure, parse_rules, parse_rules_lenient, Rule, RuleKind, RuleParseError};
