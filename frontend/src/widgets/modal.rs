//! `.modal-overlay` dialogs: open buttons, close buttons, backdrop clicks and
//! Escape. Other controllers subscribe to open/close of a given modal.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Result;
use web_sys::{Event, EventTarget, KeyboardEvent};

use crate::presenter::{Presenter, ACTIVE_CLASS};
use crate::utils::dom;

pub const OVERLAY_SELECTOR: &str = ".modal-overlay";

type Hook = Rc<dyn Fn()>;

#[derive(Default)]
struct Hooks {
    opened: HashMap<String, Vec<Hook>>,
    closed: HashMap<String, Vec<Hook>>,
}

#[derive(Clone)]
pub struct ModalController {
    presenter: Rc<dyn Presenter>,
    hooks: Rc<RefCell<Hooks>>,
}

impl ModalController {
    pub fn new(presenter: Rc<dyn Presenter>) -> Self {
        Self {
            presenter,
            hooks: Rc::new(RefCell::new(Hooks::default())),
        }
    }

    pub fn on_open(&self, id: &str, hook: impl Fn() + 'static) {
        self.hooks
            .borrow_mut()
            .opened
            .entry(id.to_string())
            .or_default()
            .push(Rc::new(hook));
    }

    pub fn on_close(&self, id: &str, hook: impl Fn() + 'static) {
        self.hooks
            .borrow_mut()
            .closed
            .entry(id.to_string())
            .or_default()
            .push(Rc::new(hook));
    }

    /// Opens `id`, first closing `from` when the trigger sits inside another
    /// modal.
    pub fn open(&self, id: &str, from: Option<&str>) {
        if let Some(current) = from.filter(|current| *current != id) {
            self.hide(current);
        }
        self.presenter.show_modal(id);
        self.presenter.lock_scroll(true);
        log::debug!("Modal opened: {}", id);
        self.fire(id, true);
    }

    pub fn close(&self, id: &str) {
        self.hide(id);
        self.presenter.lock_scroll(false);
    }

    /// Escape: every listed modal that is currently shown.
    pub fn close_all<'a>(&self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            self.hide(id);
        }
        self.presenter.lock_scroll(false);
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.presenter.is_shown(id)
    }

    fn hide(&self, id: &str) {
        let was_open = self.presenter.is_shown(id);
        self.presenter.hide_modal(id);
        if was_open {
            log::debug!("Modal closed: {}", id);
            self.fire(id, false);
        }
    }

    fn fire(&self, id: &str, opened: bool) {
        // Hooks may open or close modals themselves.
        let hooks: Vec<Hook> = {
            let hooks = self.hooks.borrow();
            let table = if opened { &hooks.opened } else { &hooks.closed };
            table.get(id).cloned().unwrap_or_default()
        };
        for hook in hooks {
            hook();
        }
    }

    /// Wires every `.modal-open`, `.modal-close` and overlay on the page.
    pub fn attach(&self) -> Result<()> {
        let document = dom::document()?;

        for (n, button) in dom::query_all(".modal-open[data-modal]").into_iter().enumerate() {
            let Some(target) = dom::data(&button, "modal") else {
                continue;
            };
            let from = dom::closest(&button, OVERLAY_SELECTOR)
                .map(|overlay| dom::ensure_id(&overlay, &format!("modal-overlay-{}", n)));
            let this = self.clone();
            dom::listen(&button, "click", move |_: Event| {
                this.open(&target, from.as_deref());
            })?;
        }

        for (n, button) in dom::query_all(".modal-close").into_iter().enumerate() {
            let Some(overlay) = dom::closest(&button, OVERLAY_SELECTOR) else {
                continue;
            };
            let id = dom::ensure_id(&overlay, &format!("modal-close-target-{}", n));
            let this = self.clone();
            dom::listen(&button, "click", move |_: Event| this.close(&id))?;
        }

        for (n, overlay) in dom::query_all(OVERLAY_SELECTOR).into_iter().enumerate() {
            let id = dom::ensure_id(&overlay, &format!("modal-backdrop-{}", n));
            let this = self.clone();
            let backdrop: EventTarget = overlay.clone().into();
            dom::listen(&overlay, "click", move |event: Event| {
                if event.target().as_ref() == Some(&backdrop) {
                    this.close(&id);
                }
            })?;
        }

        let this = self.clone();
        dom::listen(&document, "keydown", move |event: KeyboardEvent| {
            if event.key() != "Escape" {
                return;
            }
            let open: Vec<String> = dom::query_all(&format!("{}.{}", OVERLAY_SELECTOR, ACTIVE_CLASS))
                .iter()
                .map(|overlay| overlay.id())
                .filter(|id| !id.is_empty())
                .collect();
            this.close_all(open.iter().map(String::as_str));
        })?;

        Ok(())
    }
}
