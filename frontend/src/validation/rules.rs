//! Field rules attached to inputs through `data-validate`.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[0-9]{7,15}$").expect("phone pattern compiles"));

/// Symbols accepted by the `password` rule. Kept exactly as published to
/// users; extending it changes which passwords pass.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>_-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    Min(usize),
    Password,
    /// Value must equal the current value of the field with this id.
    Match(String),
    Email,
    Phone,
    NoDigits,
}

/// Which message to show; one per rule variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Required,
    MinLength,
    PasswordWeak,
    PasswordMatch,
    Email,
    Phone,
    NoDigits,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    #[error("unknown validation rule `{0}`")]
    Unknown(String),
    #[error("rule `{rule}` needs a parameter")]
    MissingParam { rule: String },
    #[error("rule `min` expects a length, got `{0}`")]
    BadLength(String),
}

impl FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.splitn(2, ':');
        let name = parts.next().unwrap_or_default().trim();
        let param = parts.next().map(str::trim).filter(|p| !p.is_empty());
        match name {
            "required" => Ok(Rule::Required),
            "password" => Ok(Rule::Password),
            "email" => Ok(Rule::Email),
            "phone" => Ok(Rule::Phone),
            "nodigits" => Ok(Rule::NoDigits),
            "min" => {
                let param = param.ok_or_else(|| RuleParseError::MissingParam {
                    rule: name.to_string(),
                })?;
                param
                    .parse::<usize>()
                    .map(Rule::Min)
                    .map_err(|_| RuleParseError::BadLength(param.to_string()))
            }
            "match" => param
                .map(|id| Rule::Match(id.to_string()))
                .ok_or_else(|| RuleParseError::MissingParam {
                    rule: name.to_string(),
                }),
            other => Err(RuleParseError::Unknown(other.to_string())),
        }
    }
}

impl Rule {
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Required => RuleKind::Required,
            Rule::Min(_) => RuleKind::MinLength,
            Rule::Password => RuleKind::PasswordWeak,
            Rule::Match(_) => RuleKind::PasswordMatch,
            Rule::Email => RuleKind::Email,
            Rule::Phone => RuleKind::Phone,
            Rule::NoDigits => RuleKind::NoDigits,
        }
    }

    /// `lookup` resolves the current value of another field by id.
    pub fn passes(&self, value: &str, lookup: &dyn Fn(&str) -> Option<String>) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            // Browser string length counts UTF-16 units.
            Rule::Min(min) => value.encode_utf16().count() >= *min,
            Rule::Password => {
                value.chars().any(|c| c.is_ascii_digit())
                    && value.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
            }
            // A missing target never blocks the form.
            Rule::Match(target) => lookup(target).map_or(true, |other| other == value),
            Rule::Email => EMAIL_RE.is_match(value),
            Rule::Phone => {
                let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
                PHONE_RE.is_match(&compact)
            }
            Rule::NoDigits => !value.chars().any(|c| c.is_ascii_digit()),
        }
    }
}

/// Parses `"required|min:8|password"`, keeping order.
pub fn parse_rules(spec: &str) -> Result<Vec<Rule>, RuleParseError> {
    spec.split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

/// Like [`parse_rules`] but drops rules it cannot read.
pub fn parse_rules_lenient(spec: &str) -> Vec<Rule> {
    spec.split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| match part.parse::<Rule>() {
            Ok(rule) => Some(rule),
            Err(err) => {
                log::warn!("Skipping validation rule: {}", err);
                None
            }
        })
        .collect()
}

/// Runs `rules` against the trimmed `raw` value and returns the first failure.
pub fn first_failure(
    rules: &[Rule],
    raw: &str,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Option<RuleKind> {
    let value = raw.trim();
    rules
        .iter()
        .find(|rule| !rule.passes(value, lookup))
        .map(Rule::kind)
}
