//! Rental price summary next to the period and add-on pickers.

use anyhow::Result;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement};

use crate::presenter::{DomPresenter, Presenter, HIDDEN_CLASS};
use crate::utils::dom;

pub const TOTAL_PRICE: &str = "total-price";
pub const ORIGINAL_PRICE: &str = "original-price";
pub const CURRENCY: &str = "AED";

/// Leading integer of an attribute value, the way `parseInt` reads it:
/// `"120"` and `"120.50"` give 120, `"abc"` gives nothing.
pub fn parse_int(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Zero and unreadable both count as "not set".
fn nonzero(raw: Option<&str>) -> Option<i64> {
    raw.and_then(parse_int).filter(|n| *n != 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodPrice {
    pub price: i64,
    pub original: i64,
    pub discounted: bool,
}

impl PeriodPrice {
    /// From the `data-price`, `data-original` and `data-discount` attributes.
    pub fn from_attrs(price: Option<&str>, original: Option<&str>, discount: Option<&str>) -> Self {
        let price_value = nonzero(price);
        Self {
            price: price_value.unwrap_or(0),
            original: nonzero(original).or(price_value).unwrap_or(0),
            discounted: nonzero(discount).is_some_and(|d| d > 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub total: i64,
    pub original: i64,
    /// Strike-through original is only worth showing for a real discount.
    pub show_original: bool,
}

pub fn totals(period: Option<&PeriodPrice>, addons: &[i64]) -> Totals {
    let addon_sum: i64 = addons.iter().sum();
    let (total, original, discounted) = match period {
        Some(p) => (p.price + addon_sum, p.original + addon_sum, p.discounted),
        None => (addon_sum, addon_sum, false),
    };
    Totals {
        total,
        original,
        show_original: discounted && original > total,
    }
}

/// `AED 1,234`
pub fn format_aed(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{} {}{}", CURRENCY, sign, grouped)
}

pub fn render(presenter: &dyn Presenter, totals: &Totals) {
    presenter.set_text(TOTAL_PRICE, &format_aed(totals.total));
    if totals.show_original {
        presenter.set_text(ORIGINAL_PRICE, &format!("/ {}", format_aed(totals.original)));
        presenter.set_class(ORIGINAL_PRICE, HIDDEN_CLASS, false);
    } else {
        presenter.set_class(ORIGINAL_PRICE, HIDDEN_CLASS, true);
    }
}

fn checked(selector: &str) -> Vec<Element> {
    dom::query_all(selector)
        .into_iter()
        .filter(|el| {
            el.dyn_ref::<HtmlInputElement>()
                .map(HtmlInputElement::checked)
                .unwrap_or(false)
        })
        .collect()
}

fn recalculate() {
    let period = checked(r#"input[name="period"]"#).first().map(|el| {
        PeriodPrice::from_attrs(
            dom::data(el, "price").as_deref(),
            dom::data(el, "original").as_deref(),
            dom::data(el, "discount").as_deref(),
        )
    });
    let addons: Vec<i64> = checked(r#"input[name="addons"]"#)
        .iter()
        .map(|el| dom::data(el, "price").as_deref().and_then(parse_int).unwrap_or(0))
        .collect();
    render(&DomPresenter, &totals(period.as_ref(), &addons));
}

pub fn attach() -> Result<()> {
    if dom::by_id(TOTAL_PRICE).is_none() {
        return Ok(());
    }
    for input in dom::query_all(r#"input[name="period"], input[name="addons"]"#) {
        dom::listen(&input, "change", |_: Event| recalculate())?;
    }
    recalculate();
    Ok(())
}
