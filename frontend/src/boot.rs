//! Attaches every controller to the server-rendered page.
//!
//! Each widget is wired independently: a widget whose markup is missing or
//! broken is logged and skipped, the rest of the page keeps working.

use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlFormElement, MouseEvent};

use crate::api::ApiClient;
use crate::config::{self, RuntimeConfig};
use crate::cooldown::ResendCooldown;
use crate::password_reset::{self, PasswordResetController, ResetForm};
use crate::presenter::{BrowserClipboard, DomPresenter, Presenter};
use crate::qr::{self, QrSessionController};
use crate::utils::dom;
use crate::utils::storage::BrowserStore;
use crate::utils::time::SystemClock;
use crate::utils::timer::{BrowserScheduler, Scheduler};
use crate::validation::{parse_rules_lenient, FieldBinding, FormValidator, ValidationMessages};
use crate::widgets::{self, ModalController};

const FIELD_WRAPPER: &str = ".flex.flex-col.gap-2";
const FLOATING_LABEL: &str = ".input-floating";

type ResetController = PasswordResetController<ApiClient>;
type QrController = QrSessionController<ApiClient, BrowserClipboard>;

/// Runs [`attach_all`] now, or once the document has finished parsing.
pub fn when_ready() -> Result<()> {
    let document = dom::document()?;
    if document.ready_state() != "loading" {
        attach_all();
        return Ok(());
    }
    dom::listen(&document, "DOMContentLoaded", |_: Event| attach_all())?;
    Ok(())
}

fn run(name: &str, step: impl FnOnce() -> Result<()>) {
    if let Err(err) = step() {
        log::warn!("{} not attached: {:#}", name, err);
    }
}

fn page_locale() -> String {
    dom::document()
        .ok()
        .and_then(|doc| doc.document_element())
        .and_then(|html| html.get_attribute("lang"))
        .unwrap_or_else(|| "en".to_string())
}

pub fn attach_all() {
    let config = config::current();
    let presenter: Rc<dyn Presenter> = Rc::new(DomPresenter);
    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler);
    let api = Rc::new(ApiClient::new());
    let modals = ModalController::new(presenter.clone());

    run("modals", || modals.attach());
    run("side menu", widgets::menu::attach);
    run("language switcher", widgets::dropdown::attach_language_switcher);
    run("user menu", || widgets::dropdown::USER_MENU.attach());
    run("hero logo", widgets::hero::attach_logo);
    run("benefits", widgets::hero::attach_benefits);
    run("gallery slider", || {
        if let Some(root) = dom::query(".gallery-slider") {
            widgets::slider::GallerySlider::attach(root)?;
        }
        Ok(())
    });
    run("car slider", || match dom::query(".car-slider-container") {
        Some(container) => widgets::slider::attach_car_slider(container),
        None => Ok(()),
    });
    run("calculator", widgets::calculator::attach);
    run("tabs", widgets::tabs::attach);
    run("copy buttons", widgets::copy_button::attach);
    run("phone mask", widgets::phone_mask::attach);
    run("password toggle", widgets::password_toggle::attach);
    run("reset notice", || widgets::reset_notice::attach(&modals));
    run("feedback form", widgets::feedback::attach);
    run("booking form", || widgets::booking::attach(&modals));
    run("scroll reveal", widgets::reveal::attach);

    let qr = QrSessionController::new(
        api.clone(),
        Rc::new(BrowserClipboard),
        presenter.clone(),
        scheduler.clone(),
    );
    run("visit passes", || attach_qr(&qr, &modals));

    let reset = reset_controller(&config, api, presenter.clone(), scheduler);
    if let Some(reset) = &reset {
        run("resend button", || attach_resend(reset, &modals));
    }
    let locale = page_locale();
    run("form validation", || attach_forms(&locale, presenter, reset));

    log::info!("Page behaviour attached (locale {})", locale);
}

fn attach_qr(qr: &QrController, modals: &ModalController) -> Result<()> {
    let document = dom::document()?;
    let controller = qr.clone();
    dom::listen(&document, "click", move |event: MouseEvent| {
        let Some(button) = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| dom::closest(&el, ".btn-show-qr"))
        else {
            return;
        };
        let Some(booking) = dom::data(&button, "booking").filter(|b| !b.is_empty()) else {
            return;
        };
        let controller = controller.clone();
        wasm_bindgen_futures::spawn_local(async move { controller.show_unit_qr(&booking).await });
    })?;

    if let Some(share) = dom::by_id("btn-share-guest") {
        let controller = qr.clone();
        dom::listen(&share, "click", move |_: Event| {
            let controller = controller.clone();
            wasm_bindgen_futures::spawn_local(async move { controller.show_guest_qr().await });
        })?;
    }

    if let Some(copy) = dom::by_id(qr::COPY_BUTTON) {
        let controller = qr.clone();
        dom::listen(&copy, "click", move |_: Event| {
            let controller = controller.clone();
            wasm_bindgen_futures::spawn_local(async move { controller.copy_guest_link().await });
        })?;
    }

    let controller = qr.clone();
    modals.on_close(qr::UNIT_MODAL, move || controller.close_unit_qr());
    let controller = qr.clone();
    modals.on_close(qr::GUEST_MODAL, move || controller.close_guest_qr());
    Ok(())
}

fn reset_controller(
    config: &RuntimeConfig,
    api: Rc<ApiClient>,
    presenter: Rc<dyn Presenter>,
    scheduler: Rc<dyn Scheduler>,
) -> Option<ResetController> {
    let form = dom::by_id(password_reset::FORM_ID)?;
    let ids = match reset_form_ids(&form) {
        Ok(ids) => ids,
        Err(err) => {
            log::warn!("Password reset form unusable: {:#}", err);
            return None;
        }
    };
    let cooldown = ResendCooldown::with_duration(
        Rc::new(BrowserStore::Local),
        Rc::new(SystemClock),
        config.resend_cooldown_ms,
    );
    Some(PasswordResetController::new(api, presenter, scheduler, cooldown, ids))
}

fn reset_form_ids(form: &Element) -> Result<ResetForm> {
    let action_url = dom::data(form, "action").ok_or_else(|| anyhow!("missing data-action"))?;
    let email = dom::query_in(form, r#"input[type="email"]"#).context("no email input")?;
    let button = dom::query_in(form, r#"button[type="submit"]"#).context("no submit button")?;
    let part = |selector: &str, fallback: &str| {
        dom::query_in(&button, selector).map(|el| dom::ensure_id(&el, fallback))
    };
    Ok(ResetForm {
        action_url,
        email_input: dom::ensure_id(&email, "forgot-password-email"),
        submit_button: dom::ensure_id(&button, "forgot-password-submit"),
        button_text: part(".btn-text", "forgot-password-submit-text"),
        button_loader: part(".btn-loader", "forgot-password-submit-loader"),
        error_slot: dom::query_in(form, ".input-error")
            .map(|el| dom::ensure_id(&el, "forgot-password-error")),
    })
}

fn attach_resend(reset: &ResetController, modals: &ModalController) -> Result<()> {
    if let Some(button) = dom::by_id(password_reset::RESEND_BUTTON) {
        let controller = reset.clone();
        dom::listen(&button, "click", move |_: Event| {
            let controller = controller.clone();
            wasm_bindgen_futures::spawn_local(async move { controller.resend().await });
        })?;
    }
    let controller = reset.clone();
    modals.on_open(password_reset::CHECK_EMAIL_MODAL, move || {
        controller.on_check_email_opened()
    });
    Ok(())
}

/// Field bindings read from `data-validate` inputs inside `form`.
fn bindings(form: &Element, form_key: &str) -> Vec<FieldBinding> {
    dom::query_all_in(form, "[data-validate]")
        .into_iter()
        .enumerate()
        .map(|(n, input)| {
            let input_id = dom::ensure_id(&input, &format!("{}-field-{}", form_key, n));
            let rules = parse_rules_lenient(&dom::data(&input, "validate").unwrap_or_default());
            let mut binding = FieldBinding::new(input_id.clone(), rules);
            if let Some(slot) = dom::closest(&input, FIELD_WRAPPER)
                .and_then(|wrapper| dom::query_in(&wrapper, ".input-error"))
            {
                binding = binding.with_error_slot(dom::ensure_id(&slot, &format!("{}-error", input_id)));
            }
            if let Some(container) = dom::closest(&input, FLOATING_LABEL) {
                binding = binding.with_container(dom::ensure_id(&container, &format!("{}-wrap", input_id)));
            }
            binding
        })
        .collect()
}

fn attach_forms(locale: &str, presenter: Rc<dyn Presenter>, reset: Option<ResetController>) -> Result<()> {
    for (n, form) in dom::query_all("form[data-msg-required]").into_iter().enumerate() {
        let form_key = dom::ensure_id(&form, &format!("validated-form-{}", n));
        let messages = ValidationMessages::defaults_for(locale)
            .with_overrides(|key| dom::data(&form, &format!("msg-{}", key)));
        let validator = Rc::new(FormValidator::new(presenter.clone(), bindings(&form, &form_key), messages));

        for field in validator.fields() {
            let Some(input) = dom::by_id(&field.input_id) else {
                continue;
            };
            let (v, id) = (validator.clone(), field.input_id.clone());
            dom::listen(&input, "blur", move |_: Event| v.on_blur(&id))?;
            let (v, id) = (validator.clone(), field.input_id.clone());
            dom::listen(&input, "input", move |_: Event| v.on_input(&id))?;
        }

        let reset_flow = reset
            .clone()
            .filter(|_| form_key == password_reset::FORM_ID);
        let target = form.clone();
        dom::listen(&form, "submit", move |event: Event| {
            event.prevent_default();
            if !validator.validate() {
                return;
            }
            if let Some(controller) = reset_flow.clone() {
                wasm_bindgen_futures::spawn_local(async move { controller.submit().await });
                return;
            }
            match target.dyn_ref::<HtmlFormElement>().map(HtmlFormElement::submit) {
                Some(Err(err)) => log::error!("Form did not submit: {:?}", err),
                Some(Ok(())) | None => {}
            }
        })?;
        log::debug!("Validation attached to {}", form_key);
    }
    Ok(())
}
