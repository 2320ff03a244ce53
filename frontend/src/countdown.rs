//! One-second countdown painted into a single element.
//!
//! Each [`Countdown`] owns at most one running interval. `start` always drops
//! the previous interval before scheduling the next, so two runs never tick
//! at once and a superseded expiry callback never fires.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::presenter::Presenter;
use crate::utils::time::format_clock;
use crate::utils::timer::{Scheduler, TimerHandle};

pub const TICK_MS: u32 = 1000;

type Formatter = Rc<dyn Fn(u32) -> String>;

/// Where each tick gets the seconds it paints.
enum Remaining {
    /// Counts down from the start value, one per tick.
    Counter(i64),
    /// Read again on every tick.
    Live(Box<dyn Fn() -> u32>),
}

struct Run {
    generation: u64,
    remaining: Remaining,
    on_expire: Option<Box<dyn FnOnce()>>,
    handle: Option<TimerHandle>,
}

struct Inner {
    presenter: Rc<dyn Presenter>,
    scheduler: Rc<dyn Scheduler>,
    display_id: String,
    format: Formatter,
    run: RefCell<Option<Run>>,
    generation: Cell<u64>,
}

#[derive(Clone)]
pub struct Countdown {
    inner: Rc<Inner>,
}

impl Countdown {
    /// Paints `M:SS` into `display_id`.
    pub fn new(presenter: Rc<dyn Presenter>, scheduler: Rc<dyn Scheduler>, display_id: impl Into<String>) -> Self {
        Self::with_format(presenter, scheduler, display_id, format_clock)
    }

    pub fn with_format(
        presenter: Rc<dyn Presenter>,
        scheduler: Rc<dyn Scheduler>,
        display_id: impl Into<String>,
        format: impl Fn(u32) -> String + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                presenter,
                scheduler,
                display_id: display_id.into(),
                format: Rc::new(format),
                run: RefCell::new(None),
                generation: Cell::new(0),
            }),
        }
    }

    pub fn start(&self, seconds: u32, on_expire: impl FnOnce() + 'static) {
        self.begin(Remaining::Counter(i64::from(seconds)), Box::new(on_expire));
    }

    /// Like [`Countdown::start`], but every tick paints `remaining()` and the
    /// run expires the first time it reads 0.
    pub fn track(&self, remaining: impl Fn() -> u32 + 'static, on_expire: impl FnOnce() + 'static) {
        self.begin(Remaining::Live(Box::new(remaining)), Box::new(on_expire));
    }

    fn begin(&self, remaining: Remaining, on_expire: Box<dyn FnOnce()>) {
        self.stop();
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);
        *self.inner.run.borrow_mut() = Some(Run {
            generation,
            remaining,
            on_expire: Some(on_expire),
            handle: None,
        });

        // First paint happens now, not one tick later.
        Inner::tick(&self.inner, generation);

        let weak = Rc::downgrade(&self.inner);
        let handle = self.inner.scheduler.interval(
            TICK_MS,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Inner::tick(&inner, generation);
                }
            }),
        );
        let stale = {
            let mut run = self.inner.run.borrow_mut();
            match run.as_mut() {
                Some(current) if current.generation == generation => {
                    current.handle = Some(handle);
                    None
                }
                // Expired on the first paint or restarted from the callback.
                _ => Some(handle),
            }
        };
        drop(stale);
    }

    /// Cancels the tick without firing the callback. Safe when idle.
    pub fn stop(&self) {
        let previous = self.inner.run.borrow_mut().take();
        drop(previous);
    }

    pub fn is_running(&self) -> bool {
        self.inner.run.borrow().is_some()
    }
}

impl Inner {
    fn tick(inner: &Rc<Inner>, generation: u64) {
        let (text, expired) = {
            let mut guard = inner.run.borrow_mut();
            let Some(run) = guard.as_mut().filter(|run| run.generation == generation) else {
                return;
            };
            let left = match &mut run.remaining {
                Remaining::Counter(counter) => {
                    let left = (*counter).max(0);
                    *counter -= 1;
                    left
                }
                Remaining::Live(read) => i64::from(read()),
            };
            ((inner.format)(left as u32), left <= 0)
        };
        inner.presenter.set_text(&inner.display_id, &text);

        if expired {
            let finished = inner.run.borrow_mut().take();
            if let Some(mut run) = finished {
                let on_expire = run.on_expire.take();
                drop(run);
                if let Some(callback) = on_expire {
                    callback();
                }
            }
        }
    }
}
