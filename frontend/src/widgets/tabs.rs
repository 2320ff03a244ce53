use anyhow::Result;
use web_sys::{Element, Event};

use crate::presenter::{ACTIVE_CLASS, HIDDEN_CLASS};
use crate::utils::dom;

/// Nearest ancestor that holds both the tab buttons and their panels.
pub const GROUP_SELECTOR: &str = ".flex.flex-col";

/// Marks `tab` active among its group and shows the matching panel.
pub fn activate(button: &Element) {
    let Some(tab) = dom::data(button, "tab") else {
        return;
    };
    let Some(group) = dom::closest(button, GROUP_SELECTOR) else {
        return;
    };
    for other in dom::query_all_in(&group, "[data-tab]") {
        dom::set_class(&other, ACTIVE_CLASS, false);
    }
    dom::set_class(button, ACTIVE_CLASS, true);

    for panel in dom::query_all_in(&group, "[data-tab-content]") {
        let matches = dom::data(&panel, "tab-content").as_deref() == Some(tab.as_str());
        dom::set_class(&panel, HIDDEN_CLASS, !matches);
    }
}

pub fn attach() -> Result<()> {
    for button in dom::query_all("[data-tab]") {
        let target = button.clone();
        dom::listen(&button, "click", move |_: Event| activate(&target))?;
    }
    Ok(())
}
