use anyhow::Result;
use web_sys::Event;

use crate::presenter::{DomPresenter, Presenter, HIDDEN_CLASS};
use crate::utils::dom;

pub const MENU: &str = "menu";
pub const OVERLAY: &str = "menu-overlay";
pub const TOGGLE: &str = "menu-toggle";
pub const CLOSE: &str = "menu-close";
/// Tailwind class that parks the drawer off-screen.
pub const OFFSCREEN_CLASS: &str = "-translate-x-full";

/// Slide-in navigation drawer.
pub struct SideMenu<'a> {
    presenter: &'a dyn Presenter,
}

impl<'a> SideMenu<'a> {
    pub fn new(presenter: &'a dyn Presenter) -> Self {
        Self { presenter }
    }

    pub fn open(&self) {
        self.presenter.set_class(MENU, OFFSCREEN_CLASS, false);
        self.presenter.set_class(OVERLAY, HIDDEN_CLASS, false);
        self.presenter.lock_scroll(true);
    }

    pub fn close(&self) {
        self.presenter.set_class(MENU, OFFSCREEN_CLASS, true);
        self.presenter.set_class(OVERLAY, HIDDEN_CLASS, true);
        self.presenter.lock_scroll(false);
    }
}

pub fn attach() -> Result<()> {
    if let Some(toggle) = dom::by_id(TOGGLE) {
        dom::listen(&toggle, "click", |_: Event| SideMenu::new(&DomPresenter).open())?;
    }
    for id in [CLOSE, OVERLAY] {
        if let Some(el) = dom::by_id(id) {
            dom::listen(&el, "click", |_: Event| SideMenu::new(&DomPresenter).close())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingPresenter;

    #[test]
    fn open_and_close_flip_drawer_and_overlay() {
        let presenter = RecordingPresenter::default()
            .with_class(MENU, OFFSCREEN_CLASS)
            .with_class(OVERLAY, HIDDEN_CLASS);
        let menu = SideMenu::new(&presenter);

        menu.open();
        assert!(presenter.scroll_locked());
        assert!(!presenter.has_class(MENU, OFFSCREEN_CLASS));
        assert!(!presenter.has_class(OVERLAY, HIDDEN_CLASS));

        menu.close();
        assert!(!presenter.scroll_locked());
        assert!(presenter.has_class(MENU, OFFSCREEN_CLASS));
        assert!(presenter.has_class(OVERLAY, HIDDEN_CLASS));
    }
}
