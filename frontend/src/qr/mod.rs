//! Visit pass modals: the booker's own QR with an expiry countdown, and a
//! shareable guest QR issued for the same booking.

mod render;

pub use render::{render_data_url, render_svg, svg_to_data_url};

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{ApiError, VisitApi, VisitPass};
use crate::countdown::Countdown;
use crate::presenter::{Clipboard, Presenter};
use crate::utils::timer::{Scheduler, TimerHandle};

pub const UNIT_MODAL: &str = "modal-qr-code";
pub const GUEST_MODAL: &str = "modal-guest-qr";
pub const UNIT_NUMBER: &str = "qr-unit-number";
pub const UNIT_IMAGE: &str = "qr-canvas";
pub const UNIT_TIMER: &str = "qr-minutes";
pub const GUEST_NUMBER: &str = "guest-unit-number";
pub const GUEST_EXPIRES: &str = "guest-expires-in";
pub const GUEST_IMAGE: &str = "guest-qr-canvas";
pub const COPY_BUTTON: &str = "btn-copy-guest-link";

/// Gives the modal transition time before the image is drawn.
pub const RENDER_DELAY_MS: u32 = 100;
pub const COPY_FEEDBACK_MS: u32 = 2000;

pub const MSG_UNIT_FAILED: &str = "Failed to generate QR code";
pub const MSG_GUEST_FAILED: &str = "Failed to generate guest QR";
pub const MSG_NO_BOOKING: &str = "No booking selected";
pub const MSG_EXPIRED: &str = "QR code expired. Please generate a new one.";
pub const MSG_COPY_FAILED: &str = "Failed to copy link";

const COPY_DONE_HTML: &str = r#"
    <svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
        <polyline points="20 6 9 17 4 12"></polyline>
    </svg>
    Copied!
"#;

const COPY_IDLE_HTML: &str = r#"
    <svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
        <path d="M10 13a5 5 0 0 0 7.54.54l3-3a5 5 0 0 0-7.07-7.07l-1.72 1.71"></path>
        <path d="M14 11a5 5 0 0 0-7.54-.54l-3 3a5 5 0 0 0 7.07 7.07l1.71-1.71"></path>
    </svg>
    Copy link
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QrStage {
    #[default]
    Idle,
    UnitShown,
    GuestShown,
}

#[derive(Debug, Default)]
struct QrSession {
    booking_id: Option<String>,
    guest_link: Option<String>,
    stage: QrStage,
    pending_render: Option<TimerHandle>,
}

struct Inner<A, C> {
    api: Rc<A>,
    clipboard: Rc<C>,
    presenter: Rc<dyn Presenter>,
    scheduler: Rc<dyn Scheduler>,
    countdown: Countdown,
    session: RefCell<QrSession>,
}

pub struct QrSessionController<A, C> {
    inner: Rc<Inner<A, C>>,
}

impl<A, C> Clone for QrSessionController<A, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A, C> QrSessionController<A, C>
where
    A: VisitApi + 'static,
    C: Clipboard + 'static,
{
    pub fn new(
        api: Rc<A>,
        clipboard: Rc<C>,
        presenter: Rc<dyn Presenter>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let countdown = Countdown::new(presenter.clone(), scheduler.clone(), UNIT_TIMER);
        Self {
            inner: Rc::new(Inner {
                api,
                clipboard,
                presenter,
                scheduler,
                countdown,
                session: RefCell::new(QrSession::default()),
            }),
        }
    }

    pub fn stage(&self) -> QrStage {
        self.inner.session.borrow().stage
    }

    pub fn booking_id(&self) -> Option<String> {
        self.inner.session.borrow().booking_id.clone()
    }

    pub fn guest_link(&self) -> Option<String> {
        self.inner.session.borrow().guest_link.clone()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.inner.countdown
    }

    pub async fn show_unit_qr(&self, booking_id: &str) {
        self.inner.session.borrow_mut().booking_id = Some(booking_id.to_string());
        log::debug!("Requesting unit QR for booking {}", booking_id);
        match self.inner.api.generate_unit_token(booking_id).await {
            Ok(pass) => self.open_unit(pass),
            Err(err) => self.report(&err, MSG_UNIT_FAILED),
        }
    }

    pub async fn show_guest_qr(&self) {
        let Some(booking_id) = self.booking_id() else {
            self.inner.presenter.alert(MSG_NO_BOOKING);
            return;
        };
        match self.inner.api.generate_guest_token(&booking_id).await {
            Ok(pass) => self.open_guest(pass),
            Err(err) => self.report(&err, MSG_GUEST_FAILED),
        }
    }

    pub async fn copy_guest_link(&self) {
        let Some(link) = self.guest_link() else {
            self.inner.presenter.alert(MSG_COPY_FAILED);
            return;
        };
        match self.inner.clipboard.write_text(&link).await {
            Ok(()) => {
                let presenter = self.inner.presenter.clone();
                presenter.set_html(COPY_BUTTON, COPY_DONE_HTML);
                self.inner
                    .scheduler
                    .timeout(
                        COPY_FEEDBACK_MS,
                        Box::new(move || presenter.set_html(COPY_BUTTON, COPY_IDLE_HTML)),
                    )
                    .forget();
            }
            Err(err) => {
                log::warn!("Clipboard write failed: {}", err);
                self.inner.presenter.alert(MSG_COPY_FAILED);
            }
        }
    }

    /// The unit modal was dismissed: no ticking or late drawing afterwards.
    pub fn close_unit_qr(&self) {
        self.inner.countdown.stop();
        let pending = {
            let mut session = self.inner.session.borrow_mut();
            if session.stage == QrStage::UnitShown {
                session.stage = QrStage::Idle;
            }
            session.pending_render.take()
        };
        drop(pending);
        self.inner.presenter.lock_scroll(false);
    }

    pub fn close_guest_qr(&self) {
        let pending = {
            let mut session = self.inner.session.borrow_mut();
            if session.stage == QrStage::GuestShown {
                session.stage = QrStage::Idle;
            }
            session.pending_render.take()
        };
        drop(pending);
    }

    fn report(&self, err: &ApiError, fallback: &str) {
        if err.is_server() {
            log::warn!("Visit pass refused: {}", err);
        } else {
            log::error!("Visit pass request failed: {}", err);
        }
        self.inner
            .presenter
            .alert(err.server_message().unwrap_or(fallback));
    }

    fn open_unit(&self, pass: VisitPass) {
        self.inner.countdown.stop();
        let presenter = &self.inner.presenter;
        presenter.set_text(UNIT_NUMBER, &pass.full_code);
        presenter.show_modal(UNIT_MODAL);
        presenter.lock_scroll(true);

        let this = self.clone();
        let handle = self.inner.scheduler.timeout(
            RENDER_DELAY_MS,
            Box::new(move || this.render_unit(&pass)),
        );
        self.replace_pending(QrStage::UnitShown, handle);
    }

    fn render_unit(&self, pass: &VisitPass) {
        if self.stage() != QrStage::UnitShown {
            return;
        }
        self.draw(UNIT_IMAGE, &pass.token);
        let this = self.clone();
        self.inner
            .countdown
            .start(pass.expires_in_seconds(), move || this.expire_unit());
    }

    fn expire_unit(&self) {
        log::debug!("Unit QR expired");
        self.inner.presenter.alert(MSG_EXPIRED);
        self.inner.presenter.hide_modal(UNIT_MODAL);
        self.inner.presenter.lock_scroll(false);
        let mut session = self.inner.session.borrow_mut();
        if session.stage == QrStage::UnitShown {
            session.stage = QrStage::Idle;
        }
    }

    fn open_guest(&self, pass: VisitPass) {
        // Only one pass is on screen at a time.
        self.inner.countdown.stop();
        let presenter = &self.inner.presenter;
        presenter.set_text(GUEST_NUMBER, &pass.full_code);
        presenter.set_text(GUEST_EXPIRES, &pass.expires_in_label());
        presenter.hide_modal(UNIT_MODAL);
        presenter.show_modal(GUEST_MODAL);
        self.inner.session.borrow_mut().guest_link = pass.guest_link.clone();

        let this = self.clone();
        let token = pass.token;
        let handle = self.inner.scheduler.timeout(
            RENDER_DELAY_MS,
            Box::new(move || {
                if this.stage() == QrStage::GuestShown {
                    this.draw(GUEST_IMAGE, &token);
                }
            }),
        );
        self.replace_pending(QrStage::GuestShown, handle);
    }

    fn replace_pending(&self, stage: QrStage, handle: TimerHandle) {
        let previous = {
            let mut session = self.inner.session.borrow_mut();
            session.stage = stage;
            session.pending_render.replace(handle)
        };
        drop(previous);
    }

    fn draw(&self, target: &str, token: &str) {
        match render_data_url(token) {
            Ok(url) => self.inner.presenter.set_image(target, &url),
            Err(err) => log::error!("Cannot draw QR into {}: {}", target, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pass, FakeClipboard, ManualScheduler, RecordingPresenter, ScriptedApi};
    use futures::executor::block_on;

    struct Fixture {
        controller: QrSessionController<ScriptedApi, FakeClipboard>,
        presenter: Rc<RecordingPresenter>,
        scheduler: Rc<ManualScheduler>,
        clipboard: Rc<FakeClipboard>,
        api: Rc<ScriptedApi>,
    }

    fn fixture(api: ScriptedApi) -> Fixture {
        let api = Rc::new(api);
        let presenter = Rc::new(RecordingPresenter::default());
        let scheduler = Rc::new(ManualScheduler::new());
        let clipboard = Rc::new(FakeClipboard::default());
        let controller = QrSessionController::new(
            api.clone(),
            clipboard.clone(),
            presenter.clone(),
            scheduler.clone(),
        );
        Fixture {
            controller,
            presenter,
            scheduler,
            clipboard,
            api,
        }
    }

    fn guest_pass() -> VisitPass {
        VisitPass {
            guest_link: Some("https://book.example/visit/guest/g1/".into()),
            ..pass("A-101", "g1", 1440.0)
        }
    }

    #[test]
    fn unit_qr_opens_and_counts_down() {
        let f = fixture(ScriptedApi::default().on_unit(Ok(pass("A-101", "xyz", 2.0))));
        block_on(f.controller.show_unit_qr("42"));

        assert!(f.presenter.is_active(UNIT_MODAL));
        assert!(f.presenter.scroll_locked());
        assert_eq!(f.presenter.text_of(UNIT_NUMBER).as_deref(), Some("A-101"));
        assert_eq!(f.controller.stage(), QrStage::UnitShown);
        assert_eq!(f.api.calls(), vec!["unit:42".to_string()]);

        f.scheduler.advance(u64::from(RENDER_DELAY_MS));
        assert!(f
            .presenter
            .image_of(UNIT_IMAGE)
            .unwrap()
            .starts_with("data:image/svg+xml;base64,"));
        assert_eq!(f.presenter.text_of(UNIT_TIMER).as_deref(), Some("2:00"));

        f.scheduler.advance(1000);
        assert_eq!(f.presenter.text_of(UNIT_TIMER).as_deref(), Some("1:59"));
    }

    #[test]
    fn server_refusal_alerts_its_text_and_keeps_modal_closed() {
        let f = fixture(
            ScriptedApi::default().on_unit(Err(ApiError::server(Some("Booking not found".into())))),
        );
        block_on(f.controller.show_unit_qr("42"));
        assert_eq!(f.presenter.alerts(), vec!["Booking not found".to_string()]);
        assert!(!f.presenter.is_active(UNIT_MODAL));
        assert_eq!(f.controller.stage(), QrStage::Idle);
    }

    #[test]
    fn transport_failure_alerts_generic_text() {
        let f = fixture(ScriptedApi::default());
        block_on(f.controller.show_unit_qr("42"));
        assert_eq!(f.presenter.alerts(), vec![MSG_UNIT_FAILED.to_string()]);
        assert!(!f.presenter.is_active(UNIT_MODAL));
    }

    #[test]
    fn server_refusal_without_text_uses_fallback() {
        let f = fixture(ScriptedApi::default().on_unit(Err(ApiError::server(None))));
        block_on(f.controller.show_unit_qr("42"));
        assert_eq!(f.presenter.alerts(), vec![MSG_UNIT_FAILED.to_string()]);
    }

    #[test]
    fn expiry_alerts_and_closes_modal() {
        let f = fixture(ScriptedApi::default().on_unit(Ok(pass("A-101", "xyz", 1.0 / 60.0))));
        block_on(f.controller.show_unit_qr("42"));
        f.scheduler.advance(100);
        assert_eq!(f.presenter.text_of(UNIT_TIMER).as_deref(), Some("0:01"));
        f.scheduler.advance(1000);
        assert_eq!(f.presenter.alerts(), vec![MSG_EXPIRED.to_string()]);
        assert!(!f.presenter.is_active(UNIT_MODAL));
        assert!(!f.presenter.scroll_locked());
        assert_eq!(f.controller.stage(), QrStage::Idle);
        f.scheduler.advance(10_000);
        assert_eq!(f.presenter.alerts().len(), 1);
    }

    #[test]
    fn closing_unit_modal_stops_countdown() {
        let f = fixture(ScriptedApi::default().on_unit(Ok(pass("A-101", "xyz", 2.0))));
        block_on(f.controller.show_unit_qr("42"));
        f.scheduler.advance(100);
        f.controller.close_unit_qr();
        assert!(!f.controller.countdown().is_running());
        f.scheduler.advance(200_000);
        assert!(f.presenter.alerts().is_empty());
        assert_eq!(f.presenter.text_of(UNIT_TIMER).as_deref(), Some("2:00"));
        assert_eq!(f.scheduler.active_tasks(), 0);
    }

    #[test]
    fn closing_before_render_skips_drawing() {
        let f = fixture(ScriptedApi::default().on_unit(Ok(pass("A-101", "xyz", 2.0))));
        block_on(f.controller.show_unit_qr("42"));
        f.controller.close_unit_qr();
        f.scheduler.advance(500);
        assert_eq!(f.presenter.image_of(UNIT_IMAGE), None);
        assert!(!f.controller.countdown().is_running());
    }

    #[test]
    fn second_unit_request_replaces_countdown() {
        let f = fixture(
            ScriptedApi::default()
                .on_unit(Ok(pass("A-101", "one", 2.0)))
                .on_unit(Ok(pass("A-102", "two", 5.0))),
        );
        block_on(f.controller.show_unit_qr("42"));
        f.scheduler.advance(100);
        block_on(f.controller.show_unit_qr("43"));
        f.scheduler.advance(100);
        assert_eq!(f.presenter.text_of(UNIT_TIMER).as_deref(), Some("5:00"));
        assert_eq!(f.controller.booking_id().as_deref(), Some("43"));
        assert_eq!(f.scheduler.active_tasks(), 1);
    }

    #[test]
    fn guest_qr_requires_a_booking() {
        let f = fixture(ScriptedApi::default());
        block_on(f.controller.show_guest_qr());
        assert_eq!(f.presenter.alerts(), vec![MSG_NO_BOOKING.to_string()]);
        assert!(f.api.calls().is_empty());
    }

    #[test]
    fn guest_qr_swaps_modals_and_draws_without_timer() {
        let f = fixture(
            ScriptedApi::default()
                .on_unit(Ok(pass("A-101", "xyz", 2.0)))
                .on_guest(Ok(guest_pass())),
        );
        block_on(f.controller.show_unit_qr("42"));
        f.scheduler.advance(100);
        block_on(f.controller.show_guest_qr());

        assert!(!f.presenter.is_active(UNIT_MODAL));
        assert!(f.presenter.is_active(GUEST_MODAL));
        assert_eq!(f.controller.stage(), QrStage::GuestShown);
        assert_eq!(f.presenter.text_of(GUEST_NUMBER).as_deref(), Some("A-101"));
        assert_eq!(f.presenter.text_of(GUEST_EXPIRES).as_deref(), Some("1440"));
        assert_eq!(
            f.controller.guest_link().as_deref(),
            Some("https://book.example/visit/guest/g1/")
        );
        assert!(!f.controller.countdown().is_running());
        assert_eq!(f.api.calls()[1], "guest:42");

        f.scheduler.advance(100);
        assert!(f.presenter.image_of(GUEST_IMAGE).is_some());
        f.scheduler.advance(300_000);
        assert!(f.presenter.alerts().is_empty());
    }

    #[test]
    fn guest_failure_alerts_server_text() {
        let f = fixture(
            ScriptedApi::default()
                .on_unit(Ok(pass("A-101", "xyz", 2.0)))
                .on_guest(Err(ApiError::server(Some("No storage unit assigned.".into())))),
        );
        block_on(f.controller.show_unit_qr("42"));
        block_on(f.controller.show_guest_qr());
        assert_eq!(
            f.presenter.alerts(),
            vec!["No storage unit assigned.".to_string()]
        );
        assert!(!f.presenter.is_active(GUEST_MODAL));
    }

    #[test]
    fn copy_link_shows_feedback_then_reverts() {
        let f = fixture(
            ScriptedApi::default()
                .on_unit(Ok(pass("A-101", "xyz", 2.0)))
                .on_guest(Ok(guest_pass())),
        );
        block_on(f.controller.show_unit_qr("42"));
        block_on(f.controller.show_guest_qr());
        block_on(f.controller.copy_guest_link());

        assert_eq!(
            f.clipboard.written(),
            vec!["https://book.example/visit/guest/g1/".to_string()]
        );
        assert!(f.presenter.html_of(COPY_BUTTON).unwrap().contains("Copied!"));
        f.scheduler.advance(u64::from(COPY_FEEDBACK_MS));
        assert!(f.presenter.html_of(COPY_BUTTON).unwrap().contains("Copy link"));
    }

    #[test]
    fn copy_failure_alerts() {
        let f = fixture(
            ScriptedApi::default()
                .on_unit(Ok(pass("A-101", "xyz", 2.0)))
                .on_guest(Ok(guest_pass())),
        );
        f.clipboard.fail.set(true);
        block_on(f.controller.show_unit_qr("42"));
        block_on(f.controller.show_guest_qr());
        block_on(f.controller.copy_guest_link());
        assert_eq!(f.presenter.alerts(), vec![MSG_COPY_FAILED.to_string()]);
    }
}
