//! `[data-copy-target]` buttons that copy another element's text.

use std::rc::Rc;

use anyhow::Result;
use web_sys::Event;

use crate::presenter::{BrowserClipboard, Clipboard, DomPresenter, Presenter};
use crate::utils::dom;
use crate::utils::timer::{BrowserScheduler, Scheduler};

pub const DEFAULT_SUCCESS: &str = "Copied!";
pub const FEEDBACK_MS: u32 = 2000;

pub struct CopyButton<C> {
    clipboard: Rc<C>,
    presenter: Rc<dyn Presenter>,
    scheduler: Rc<dyn Scheduler>,
}

impl<C: Clipboard> CopyButton<C> {
    pub fn new(clipboard: Rc<C>, presenter: Rc<dyn Presenter>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            clipboard,
            presenter,
            scheduler,
        }
    }

    /// Copies the trimmed text of `target`; the button shows `success` for a
    /// moment, then its previous label.
    pub async fn copy(&self, button: &str, target: &str, success: Option<&str>) {
        let Some(text) = self.presenter.text(target) else {
            return;
        };
        let original = self.presenter.text(button).unwrap_or_default();
        if let Err(err) = self.clipboard.write_text(text.trim()).await {
            log::warn!("Copy from {} failed: {}", target, err);
            return;
        }
        let success = success.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SUCCESS);
        self.presenter.set_text(button, success);

        let presenter = self.presenter.clone();
        let button = button.to_string();
        self.scheduler
            .timeout(
                FEEDBACK_MS,
                Box::new(move || presenter.set_text(&button, &original)),
            )
            .forget();
    }
}

pub fn attach() -> Result<()> {
    let copier = Rc::new(CopyButton::new(
        Rc::new(BrowserClipboard),
        Rc::new(DomPresenter),
        Rc::new(BrowserScheduler),
    ));
    for (n, el) in dom::query_all("[data-copy-target]").into_iter().enumerate() {
        let Some(target) = dom::data(&el, "copy-target") else {
            continue;
        };
        let button = dom::ensure_id(&el, &format!("copy-button-{}", n));
        let success = dom::data(&el, "copy-success");
        let copier = copier.clone();
        dom::listen(&el, "click", move |_: Event| {
            let copier = copier.clone();
            let button = button.clone();
            let target = target.clone();
            let success = success.clone();
            wasm_bindgen_futures::spawn_local(async move {
                copier.copy(&button, &target, success.as_deref()).await;
            });
        })?;
    }
    Ok(())
}
