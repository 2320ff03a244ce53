//! Landing page effects: the hero logo growing as the page scrolls, and the
//! benefits block lighting up while its reserve button is hovered.

use anyhow::Result;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement};

use crate::presenter::ACTIVE_CLASS;
use crate::utils::dom;

pub const HERO: &str = "hero";
pub const HERO_LOGO: &str = "hero-logo";
pub const BENEFITS: &str = "benefits";
pub const MIN_SCALE: f64 = 0.7;

/// Logo scale for a hero scrolled `scrolled` px out of view. Reaches full
/// size when half the hero is gone.
pub fn logo_scale(scrolled: f64, hero_height: f64) -> f64 {
    let progress = if hero_height > 0.0 {
        (scrolled / hero_height * 2.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    MIN_SCALE + progress * (1.0 - MIN_SCALE)
}

fn paint_logo(hero: &HtmlElement, logo: &HtmlElement) {
    let scrolled = -hero.get_bounding_client_rect().top();
    let scale = logo_scale(scrolled, f64::from(hero.offset_height()));
    let _ = logo
        .style()
        .set_property("transform", &format!("scale({})", scale));
}

pub fn attach_logo() -> Result<()> {
    let hero = dom::by_id(HERO).and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let logo = dom::by_id(HERO_LOGO).and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let (Some(hero), Some(logo)) = (hero, logo) else {
        return Ok(());
    };
    let window = web_sys::window().ok_or(crate::error::UiError::NoDocument)?;
    paint_logo(&hero, &logo);
    dom::listen(&window, "scroll", move |_: Event| paint_logo(&hero, &logo))?;
    Ok(())
}

pub fn attach_benefits() -> Result<()> {
    let Some(section) = dom::by_id(BENEFITS) else {
        return Ok(());
    };
    let Some(button) = dom::query_in(&section, ".btn-default.primary") else {
        return Ok(());
    };
    for (event, on) in [("mouseenter", true), ("mouseleave", false)] {
        let section = section.clone();
        dom::listen(&button, event, move |_: Event| {
            dom::set_class(&section, ACTIVE_CLASS, on)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn starts_small_above_the_fold() {
        assert!(close(logo_scale(0.0, 800.0), 0.7));
        assert!(close(logo_scale(-120.0, 800.0), 0.7));
    }

    #[test]
    fn grows_twice_as_fast_as_scroll() {
        assert!(close(logo_scale(200.0, 800.0), 0.85));
        assert!(close(logo_scale(400.0, 800.0), 1.0));
        assert!(close(logo_scale(1600.0, 800.0), 1.0));
    }

    #[test]
    fn zero_height_hero_keeps_minimum() {
        assert!(close(logo_scale(50.0, 0.0), 0.7));
    }
}
