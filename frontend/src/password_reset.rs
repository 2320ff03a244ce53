//! "Forgot password" modal flow: request the email, switch to the
//! check-your-inbox modal, and gate the resend button behind a cooldown.

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{ApiError, PasswordResetApi};
use crate::cooldown::ResendCooldown;
use crate::countdown::Countdown;
use crate::presenter::{Presenter, HIDDEN_CLASS};
use crate::utils::time::format_clock;
use crate::utils::timer::{Scheduler, TimerHandle};

pub const FORM_ID: &str = "forgot-password-form";
pub const REQUEST_MODAL: &str = "modal-forgot-password";
pub const CHECK_EMAIL_MODAL: &str = "modal-check-email";
pub const SENT_EMAIL: &str = "sent-email";
pub const RESEND_BUTTON: &str = "resend-email";

pub const MSG_SERVER_FALLBACK: &str = "Something went wrong";
pub const MSG_NETWORK: &str = "Network error. Please try again.";
pub const RESEND_READY: &str = "Didn't receive? Resend";
pub const RESEND_SENDING: &str = "Sending...";
pub const RESEND_SENT: &str = "Email sent!";
pub const RESEND_FAILED: &str = "Error. Try again";

/// Pause on "Email sent!" before the countdown takes over the button.
pub const RESEND_RESTART_MS: u32 = 1500;

/// Element ids inside the request form. Boot assigns ids to the pieces the
/// markup leaves anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetForm {
    pub action_url: String,
    pub email_input: String,
    pub submit_button: String,
    pub button_text: Option<String>,
    pub button_loader: Option<String>,
    pub error_slot: Option<String>,
}

pub fn resend_label(seconds: u32) -> String {
    format!("Resend in {}", format_clock(seconds))
}

struct Inner<A> {
    api: Rc<A>,
    presenter: Rc<dyn Presenter>,
    scheduler: Rc<dyn Scheduler>,
    cooldown: ResendCooldown,
    resend_timer: Countdown,
    form: ResetForm,
    restart: RefCell<Option<TimerHandle>>,
}

pub struct PasswordResetController<A> {
    inner: Rc<Inner<A>>,
}

impl<A> Clone for PasswordResetController<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A> PasswordResetController<A>
where
    A: PasswordResetApi + 'static,
{
    pub fn new(
        api: Rc<A>,
        presenter: Rc<dyn Presenter>,
        scheduler: Rc<dyn Scheduler>,
        cooldown: ResendCooldown,
        form: ResetForm,
    ) -> Self {
        let resend_timer =
            Countdown::with_format(presenter.clone(), scheduler.clone(), RESEND_BUTTON, resend_label);
        Self {
            inner: Rc::new(Inner {
                api,
                presenter,
                scheduler,
                cooldown,
                resend_timer,
                form,
                restart: RefCell::new(None),
            }),
        }
    }

    pub fn form(&self) -> &ResetForm {
        &self.inner.form
    }

    /// Sends the reset request for the address typed into the form. The
    /// caller has already run field validation.
    pub async fn submit(&self) {
        let form = &self.inner.form;
        let presenter = &self.inner.presenter;
        let email = presenter
            .field_value(&form.email_input)
            .unwrap_or_default()
            .trim()
            .to_string();

        self.set_busy(true);
        let result = self
            .inner
            .api
            .request_password_reset(&form.action_url, &email)
            .await;
        match result {
            Ok(()) => {
                log::debug!("Password reset email requested");
                self.inner.cooldown.set_cooldown(&email);
                presenter.set_text(SENT_EMAIL, &email);
                presenter.hide_modal(REQUEST_MODAL);
                presenter.show_modal(CHECK_EMAIL_MODAL);
                self.start_resend_timer(&email);
                presenter.reset_form(FORM_ID);
            }
            Err(err) => self.show_failure(&err),
        }
        self.set_busy(false);
    }

    /// Paints the resend button from the stored cooldown for `email`. Each
    /// tick reads the record again, so a tab that slept past the expiry
    /// unlocks on its next tick.
    pub fn start_resend_timer(&self, email: &str) {
        if !self.inner.cooldown.is_on_cooldown(email) {
            self.inner.resend_timer.stop();
            self.resend_ready();
            return;
        }
        self.inner.presenter.set_disabled(RESEND_BUTTON, true);
        let cooldown = self.inner.cooldown.clone();
        let address = email.to_string();
        let this = self.clone();
        self.inner.resend_timer.track(
            move || cooldown.remaining_seconds(&address),
            move || this.resend_ready(),
        );
    }

    /// The check-email modal became visible.
    pub fn on_check_email_opened(&self) {
        if let Some(email) = self.sent_email() {
            self.start_resend_timer(&email);
        }
    }

    pub async fn resend(&self) {
        let Some(email) = self.sent_email() else {
            return;
        };
        if self.inner.cooldown.is_on_cooldown(&email) {
            log::debug!("Resend ignored, cooldown active");
            return;
        }
        let presenter = &self.inner.presenter;
        self.inner.resend_timer.stop();
        presenter.set_disabled(RESEND_BUTTON, true);
        presenter.set_text(RESEND_BUTTON, RESEND_SENDING);

        let result = self
            .inner
            .api
            .request_password_reset(&self.inner.form.action_url, &email)
            .await;
        match result {
            Ok(()) => {
                self.inner.cooldown.set_cooldown(&email);
                presenter.set_text(RESEND_BUTTON, RESEND_SENT);
                let this = self.clone();
                let handle = self.inner.scheduler.timeout(
                    RESEND_RESTART_MS,
                    Box::new(move || this.start_resend_timer(&email)),
                );
                let previous = self.inner.restart.borrow_mut().replace(handle);
                drop(previous);
            }
            Err(err) => {
                log::warn!("Resend failed: {}", err);
                presenter.set_text(RESEND_BUTTON, RESEND_FAILED);
                presenter.set_disabled(RESEND_BUTTON, false);
            }
        }
    }

    pub fn is_counting(&self) -> bool {
        self.inner.resend_timer.is_running()
    }

    fn sent_email(&self) -> Option<String> {
        self.inner
            .presenter
            .text(SENT_EMAIL)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }

    fn resend_ready(&self) {
        self.inner.presenter.set_disabled(RESEND_BUTTON, false);
        self.inner.presenter.set_text(RESEND_BUTTON, RESEND_READY);
    }

    fn show_failure(&self, err: &ApiError) {
        let message = if err.is_server() {
            log::warn!("Password reset refused: {}", err);
            err.server_message().unwrap_or(MSG_SERVER_FALLBACK)
        } else {
            log::error!("Password reset request failed: {}", err);
            MSG_NETWORK
        };
        if let Some(slot) = &self.inner.form.error_slot {
            self.inner.presenter.set_text(slot, message);
            self.inner.presenter.set_class(slot, HIDDEN_CLASS, false);
        }
    }

    fn set_busy(&self, busy: bool) {
        let form = &self.inner.form;
        let presenter = &self.inner.presenter;
        if let Some(text) = &form.button_text {
            presenter.set_class(text, HIDDEN_CLASS, busy);
        }
        if let Some(loader) = &form.button_loader {
            presenter.set_class(loader, HIDDEN_CLASS, !busy);
        }
        presenter.set_disabled(&form.submit_button, busy);
    }
}
