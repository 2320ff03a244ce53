//! In-memory stand-ins for the browser ports.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::rc::Rc;

use crate::api::{ApiError, FeedbackApi, PasswordResetApi, VisitApi, VisitPass};
use crate::error::UiError;
use crate::presenter::{Clipboard, Presenter, ACTIVE_CLASS};
use crate::utils::storage::KeyValueStore;
use crate::utils::time::Clock;
use crate::utils::timer::{Scheduler, TimerHandle};

/// Arbitrary fixed wall-clock origin for tests.
pub const EPOCH_MS: i64 = 1_767_225_600_000;

#[derive(Debug, Clone, Default)]
pub struct ElementState {
    pub classes: BTreeSet<String>,
    pub text: Option<String>,
    pub html: Option<String>,
    pub disabled: bool,
    pub image: Option<String>,
    pub value: Option<String>,
}

/// Remembers every presenter call per element id.
#[derive(Default)]
pub struct RecordingPresenter {
    elements: RefCell<HashMap<String, ElementState>>,
    alerts: RefCell<Vec<String>>,
    resets: RefCell<Vec<String>>,
    scroll_locked: Cell<bool>,
}

impl RecordingPresenter {
    fn update(&self, id: &str, f: impl FnOnce(&mut ElementState)) {
        let mut elements = self.elements.borrow_mut();
        f(elements.entry(id.to_string()).or_default());
    }

    fn read<T>(&self, id: &str, f: impl FnOnce(&ElementState) -> T) -> Option<T> {
        self.elements.borrow().get(id).map(f)
    }

    pub fn with_value(self, id: &str, value: &str) -> Self {
        self.set_field_value(id, value);
        self
    }

    pub fn with_text(self, id: &str, value: &str) -> Self {
        self.set_text(id, value);
        self
    }

    pub fn with_class(self, id: &str, class: &str) -> Self {
        self.set_class(id, class, true);
        self
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.has_class(id, ACTIVE_CLASS)
    }

    pub fn text_of(&self, id: &str) -> Option<String> {
        self.read(id, |el| el.text.clone()).flatten()
    }

    pub fn html_of(&self, id: &str) -> Option<String> {
        self.read(id, |el| el.html.clone()).flatten()
    }

    pub fn image_of(&self, id: &str) -> Option<String> {
        self.read(id, |el| el.image.clone()).flatten()
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.read(id, |el| el.disabled).unwrap_or(false)
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn resets(&self) -> Vec<String> {
        self.resets.borrow().clone()
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked.get()
    }
}

impl Presenter for RecordingPresenter {
    fn set_class(&self, id: &str, class: &str, on: bool) {
        self.update(id, |el| {
            if on {
                el.classes.insert(class.to_string());
            } else {
                el.classes.remove(class);
            }
        });
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.read(id, |el| el.classes.contains(class)).unwrap_or(false)
    }

    fn set_text(&self, id: &str, value: &str) {
        self.update(id, |el| el.text = Some(value.to_string()));
    }

    fn set_html(&self, id: &str, html: &str) {
        self.update(id, |el| el.html = Some(html.to_string()));
    }

    fn set_disabled(&self, id: &str, disabled: bool) {
        self.update(id, |el| el.disabled = disabled);
    }

    fn set_image(&self, id: &str, src: &str) {
        self.update(id, |el| el.image = Some(src.to_string()));
    }

    fn text(&self, id: &str) -> Option<String> {
        self.text_of(id)
    }

    fn field_value(&self, id: &str) -> Option<String> {
        self.read(id, |el| el.value.clone()).flatten()
    }

    fn set_field_value(&self, id: &str, value: &str) {
        self.update(id, |el| el.value = Some(value.to_string()));
    }

    fn reset_form(&self, id: &str) {
        self.resets.borrow_mut().push(id.to_string());
    }

    fn lock_scroll(&self, locked: bool) {
        self.scroll_locked.set(locked);
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

enum TaskKind {
    Every {
        period: u64,
        tick: Rc<RefCell<Box<dyn FnMut()>>>,
    },
    Once(Option<Box<dyn FnOnce()>>),
}

struct Task {
    id: u64,
    due: u64,
    kind: TaskKind,
    cancelled: Rc<Cell<bool>>,
}

struct Cancel(Rc<Cell<bool>>);

impl Drop for Cancel {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

/// Virtual time: nothing runs until [`ManualScheduler::advance`]. Also serves
/// as the wall clock, starting at [`EPOCH_MS`].
pub struct ManualScheduler {
    now: Cell<u64>,
    next_id: Cell<u64>,
    tasks: RefCell<Vec<Task>>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0),
            next_id: Cell::new(0),
            tasks: RefCell::new(Vec::new()),
        }
    }

    pub fn elapsed(&self) -> u64 {
        self.now.get()
    }

    pub fn active_tasks(&self) -> usize {
        self.tasks
            .borrow()
            .iter()
            .filter(|t| !t.cancelled.get())
            .count()
    }

    fn push(&self, millis: u32, kind: TaskKind) -> TimerHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let cancelled = Rc::new(Cell::new(false));
        self.tasks.borrow_mut().push(Task {
            id,
            due: self.now.get() + u64::from(millis),
            kind,
            cancelled: cancelled.clone(),
        });
        TimerHandle::new(Cancel(cancelled))
    }

    /// Runs every callback due within the next `millis`, in time order.
    pub fn advance(&self, millis: u64) {
        let target = self.now.get() + millis;
        loop {
            let job = {
                let mut tasks = self.tasks.borrow_mut();
                tasks.retain(|t| !t.cancelled.get());
                let Some(task) = tasks
                    .iter_mut()
                    .filter(|t| t.due <= target)
                    .min_by_key(|t| (t.due, t.id))
                else {
                    break;
                };
                self.now.set(task.due);
                match &mut task.kind {
                    TaskKind::Every { period, tick } => {
                        task.due += *period;
                        Job::Every(tick.clone())
                    }
                    TaskKind::Once(done) => {
                        task.cancelled.set(true);
                        Job::Once(done.take())
                    }
                }
            };
            match job {
                Job::Every(tick) => (tick.borrow_mut())(),
                Job::Once(Some(done)) => done(),
                Job::Once(None) => {}
            }
        }
        self.now.set(target);
    }
}

enum Job {
    Every(Rc<RefCell<Box<dyn FnMut()>>>),
    Once(Option<Box<dyn FnOnce()>>),
}

impl Scheduler for ManualScheduler {
    fn interval(&self, millis: u32, tick: Box<dyn FnMut()>) -> TimerHandle {
        self.push(
            millis,
            TaskKind::Every {
                period: u64::from(millis.max(1)),
                tick: Rc::new(RefCell::new(tick)),
            },
        )
    }

    fn timeout(&self, millis: u32, done: Box<dyn FnOnce()>) -> TimerHandle {
        self.push(millis, TaskKind::Once(Some(done)))
    }
}

impl Clock for ManualScheduler {
    fn now_millis(&self) -> i64 {
        EPOCH_MS + self.now.get() as i64
    }
}

#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

#[derive(Default)]
pub struct FakeClipboard {
    pub fail: Cell<bool>,
    written: RefCell<Vec<String>>,
}

impl FakeClipboard {
    pub fn written(&self) -> Vec<String> {
        self.written.borrow().clone()
    }
}

impl Clipboard for FakeClipboard {
    async fn write_text(&self, text: &str) -> Result<(), UiError> {
        if self.fail.get() {
            return Err(UiError::Js("NotAllowedError".into()));
        }
        self.written.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// Replies queued per endpoint; an empty queue answers with a transport error.
#[derive(Default)]
pub struct ScriptedApi {
    unit: RefCell<VecDeque<Result<VisitPass, ApiError>>>,
    guest: RefCell<VecDeque<Result<VisitPass, ApiError>>>,
    reset: RefCell<VecDeque<Result<(), ApiError>>>,
    feedback: RefCell<VecDeque<Result<(), ApiError>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedApi {
    pub fn on_unit(self, reply: Result<VisitPass, ApiError>) -> Self {
        self.unit.borrow_mut().push_back(reply);
        self
    }

    pub fn on_guest(self, reply: Result<VisitPass, ApiError>) -> Self {
        self.guest.borrow_mut().push_back(reply);
        self
    }

    pub fn on_reset(self, reply: Result<(), ApiError>) -> Self {
        self.reset.borrow_mut().push_back(reply);
        self
    }

    pub fn on_feedback(self, reply: Result<(), ApiError>) -> Self {
        self.feedback.borrow_mut().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn next<T>(&self, queue: &RefCell<VecDeque<Result<T, ApiError>>>, call: String) -> Result<T, ApiError> {
        self.calls.borrow_mut().push(call);
        queue
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::request_failed("no scripted reply")))
    }
}

impl VisitApi for ScriptedApi {
    async fn generate_unit_token(&self, booking_id: &str) -> Result<VisitPass, ApiError> {
        self.next(&self.unit, format!("unit:{}", booking_id))
    }

    async fn generate_guest_token(&self, booking_id: &str) -> Result<VisitPass, ApiError> {
        self.next(&self.guest, format!("guest:{}", booking_id))
    }
}

impl PasswordResetApi for ScriptedApi {
    async fn request_password_reset(&self, action_url: &str, email: &str) -> Result<(), ApiError> {
        self.next(&self.reset, format!("reset:{}:{}", action_url, email))
    }
}

impl FeedbackApi for ScriptedApi {
    async fn submit_feedback(&self, url: &str, fields: &[(String, String)]) -> Result<(), ApiError> {
        self.next(&self.feedback, format!("feedback:{}:{}", url, fields.len()))
    }
}

pub fn pass(full_code: &str, token: &str, minutes: f64) -> VisitPass {
    VisitPass {
        full_code: full_code.into(),
        token: token.into(),
        expires_in_minutes: minutes,
        guest_link: None,
    }
}
