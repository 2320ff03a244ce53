//! Contact form in `#modal-feedback`, posted in the background.

use std::rc::Rc;

use anyhow::Result;
use wasm_bindgen::JsCast;
use web_sys::{Event, FormData, HtmlFormElement};

use crate::api::{ApiClient, FeedbackApi};
use crate::error::UiError;
use crate::presenter::{DomPresenter, Presenter};
use crate::utils::dom;

pub const FORM_ID: &str = "feedback-form";
pub const FORM_MODAL: &str = "modal-feedback";
pub const SUCCESS_MODAL: &str = "modal-feedback-success";
pub const ERROR_MODAL: &str = "modal-feedback-error";
pub const RETRY_BUTTON: &str = "btn-retry-feedback";

pub const SPINNER_HTML: &str = r#"<svg class="animate-spin h-5 w-5 mx-auto" viewBox="0 0 24 24"><circle class="opacity-25" cx="12" cy="12" r="10" stroke="currentColor" stroke-width="4" fill="none"></circle><path class="opacity-75" fill="currentColor" d="M4 12a8 8 0 018-8V0C5.373 0 0 5.373 0 12h4zm2 5.291A7.962 7.962 0 014 12H0c0 3.042 1.135 5.824 3 7.938l3-2.647z"></path></svg>"#;

pub struct FeedbackForm<A> {
    api: Rc<A>,
    presenter: Rc<dyn Presenter>,
}

impl<A: FeedbackApi> FeedbackForm<A> {
    pub fn new(api: Rc<A>, presenter: Rc<dyn Presenter>) -> Self {
        Self { api, presenter }
    }

    /// `button_html` is what the submit button showed before the spinner.
    pub async fn submit(&self, url: &str, fields: &[(String, String)], button: &str, button_html: &str) {
        let presenter = &self.presenter;
        presenter.set_disabled(button, true);
        presenter.set_html(button, SPINNER_HTML);

        let result = self.api.submit_feedback(url, fields).await;
        presenter.hide_modal(FORM_MODAL);
        match result {
            Ok(()) => {
                log::debug!("Feedback sent");
                presenter.show_modal(SUCCESS_MODAL);
                presenter.reset_form(FORM_ID);
            }
            Err(err) => {
                log::warn!("Feedback not accepted: {}", err);
                presenter.show_modal(ERROR_MODAL);
            }
        }

        presenter.set_disabled(button, false);
        presenter.set_html(button, button_html);
    }

    /// Back from the error modal to the filled-in form.
    pub fn retry(&self) {
        self.presenter.hide_modal(ERROR_MODAL);
        self.presenter.show_modal(FORM_MODAL);
    }
}

/// Text fields of a form; file inputs are not part of the contact form.
fn form_fields(form: &HtmlFormElement) -> Result<Vec<(String, String)>, UiError> {
    let data = FormData::new_with_form(form)?;
    let mut fields = Vec::new();
    let entries = js_sys::try_iter(&data)?.ok_or_else(|| UiError::Js("FormData is not iterable".into()))?;
    for entry in entries {
        let pair: js_sys::Array = entry?.dyn_into()?;
        if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
            fields.push((name, value));
        }
    }
    Ok(fields)
}

pub fn attach() -> Result<()> {
    let controller = Rc::new(FeedbackForm::new(Rc::new(ApiClient::new()), Rc::new(DomPresenter)));

    if let Some(form) = dom::by_id(FORM_ID).and_then(|el| el.dyn_into::<HtmlFormElement>().ok()) {
        let button = dom::query_in(&form, r#"button[type="submit"]"#)
            .map(|el| dom::ensure_id(&el, "feedback-submit"));
        let url = form.get_attribute("data-url").unwrap_or_default();
        let controller = controller.clone();
        let target = form.clone();
        dom::listen(&form, "submit", move |event: Event| {
            event.prevent_default();
            let fields = match form_fields(&target) {
                Ok(fields) => fields,
                Err(err) => {
                    log::error!("Cannot read feedback form: {}", err);
                    return;
                }
            };
            let button = button.clone().unwrap_or_default();
            let button_html = dom::by_id(&button).map(|el| el.inner_html()).unwrap_or_default();
            let controller = controller.clone();
            let url = url.clone();
            wasm_bindgen_futures::spawn_local(async move {
                controller.submit(&url, &fields, &button, &button_html).await;
            });
        })?;
    }

    if let Some(retry) = dom::by_id(RETRY_BUTTON) {
        dom::listen(&retry, "click", move |_: Event| controller.retry())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::test_support::{RecordingPresenter, ScriptedApi};
    use futures::executor::block_on;

    fn fields() -> Vec<(String, String)> {
        vec![
            ("name".into(), "Layla".into()),
            ("message".into(), "Is the unit climate controlled?".into()),
        ]
    }

    fn form(api: ScriptedApi) -> (FeedbackForm<ScriptedApi>, Rc<ScriptedApi>, Rc<RecordingPresenter>) {
        let api = Rc::new(api);
        let presenter = Rc::new(RecordingPresenter::default().with_class(FORM_MODAL, "active"));
        (FeedbackForm::new(api.clone(), presenter.clone()), api, presenter)
    }

    #[test]
    fn success_swaps_to_thank_you_modal() {
        let (form, api, presenter) = form(ScriptedApi::default().on_feedback(Ok(())));
        block_on(form.submit("/feedback/", &fields(), "feedback-submit", "Send"));
        assert_eq!(api.calls(), vec!["feedback:/feedback/:2".to_string()]);
        assert!(!presenter.is_active(FORM_MODAL));
        assert!(presenter.is_active(SUCCESS_MODAL));
        assert_eq!(presenter.resets(), vec![FORM_ID.to_string()]);
        assert!(!presenter.is_disabled("feedback-submit"));
        assert_eq!(presenter.html_of("feedback-submit").as_deref(), Some("Send"));
    }

    #[test]
    fn rejection_shows_error_modal_and_keeps_input() {
        let (form, _, presenter) = form(ScriptedApi::default().on_feedback(Err(ApiError::server(None))));
        block_on(form.submit("/feedback/", &fields(), "feedback-submit", "Send"));
        assert!(presenter.is_active(ERROR_MODAL));
        assert!(!presenter.is_active(SUCCESS_MODAL));
        assert!(presenter.resets().is_empty());
        assert_eq!(presenter.html_of("feedback-submit").as_deref(), Some("Send"));
    }

    #[test]
    fn transport_failure_also_shows_error_modal() {
        let (form, _, presenter) = form(ScriptedApi::default());
        block_on(form.submit("/feedback/", &fields(), "feedback-submit", "Send"));
        assert!(presenter.is_active(ERROR_MODAL));
        assert!(!presenter.is_active(FORM_MODAL));
    }

    #[test]
    fn retry_reopens_the_form() {
        let (form, _, presenter) = form(ScriptedApi::default());
        block_on(form.submit("/feedback/", &fields(), "feedback-submit", "Send"));
        form.retry();
        assert!(!presenter.is_active(ERROR_MODAL));
        assert!(presenter.is_active(FORM_MODAL));
    }
}
