//! Landing page sliders: the "take a look inside" gallery and the rotating
//! car images.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Result;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlImageElement, KeyboardEvent, TouchEvent};

use crate::error::UiError;
use crate::presenter::ACTIVE_CLASS;
use crate::utils::dom;
use crate::utils::timer::{BrowserScheduler, Scheduler, TimerHandle};

pub const GALLERY_AUTOPLAY_MS: u32 = 5000;
pub const CAR_ROTATION_MS: u32 = 4000;
/// Horizontal travel (px) before a touch counts as a swipe.
pub const SWIPE_THRESHOLD: f64 = 50.0;

/// Wrap-around position among `len` slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderState {
    index: usize,
    len: usize,
}

impl SliderState {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Jumps to `target`; `-1` lands on the last slide, `len` on the first.
    pub fn go_to(&mut self, target: isize) -> usize {
        if self.len == 0 {
            return 0;
        }
        let len = self.len as isize;
        self.index = if target < 0 {
            (len - 1) as usize
        } else if target >= len {
            0
        } else {
            target as usize
        };
        self.index
    }

    pub fn next(&mut self) -> usize {
        self.go_to(self.index as isize + 1)
    }

    pub fn prev(&mut self) -> usize {
        self.go_to(self.index as isize - 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Next,
    Prev,
}

/// Finger moving left (start right of end) advances.
pub fn swipe_direction(start_x: f64, end_x: f64) -> Option<Swipe> {
    let diff = start_x - end_x;
    if diff.abs() <= SWIPE_THRESHOLD {
        None
    } else if diff > 0.0 {
        Some(Swipe::Next)
    } else {
        Some(Swipe::Prev)
    }
}

struct GalleryInner {
    root: Element,
    slides: Vec<Element>,
    titles: Vec<Element>,
    state: RefCell<SliderState>,
    autoplay: RefCell<Option<TimerHandle>>,
    touch_start: Cell<f64>,
    scheduler: Rc<dyn Scheduler>,
}

#[derive(Clone)]
pub struct GallerySlider {
    inner: Rc<GalleryInner>,
}

impl GallerySlider {
    pub fn attach(root: Element) -> Result<Option<Self>> {
        let slides = dom::query_all_in(&root, ".gallery-slide");
        if slides.is_empty() {
            return Ok(None);
        }
        let titles = dom::query_all_in(&root, ".gallery-title");
        let slider = Self {
            inner: Rc::new(GalleryInner {
                state: RefCell::new(SliderState::new(slides.len())),
                root,
                slides,
                titles,
                autoplay: RefCell::new(None),
                touch_start: Cell::new(0.0),
                scheduler: Rc::new(BrowserScheduler),
            }),
        };
        slider.mark_indices();
        slider.build_dots()?;
        slider.bind_controls()?;
        slider.restart_autoplay();
        log::debug!("Gallery slider with {} slides", slider.inner.slides.len());
        Ok(Some(slider))
    }

    fn mark_indices(&self) {
        for items in [&self.inner.slides, &self.inner.titles] {
            for (i, el) in items.iter().enumerate() {
                let _ = el.set_attribute("data-index", &i.to_string());
            }
        }
        self.paint(0);
    }

    fn build_dots(&self) -> Result<()> {
        let Some(container) = dom::query_in(&self.inner.root, ".gallery-dots") else {
            return Ok(());
        };
        let document = dom::document()?;
        container.set_inner_html("");
        for i in 0..self.inner.slides.len() {
            let dot = document.create_element("button").map_err(UiError::from)?;
            dot.set_class_name(if i == 0 { "gallery-dot active" } else { "gallery-dot" });
            dot.set_attribute("data-index", &i.to_string())
                .map_err(UiError::from)?;
            dot.set_attribute("aria-label", &format!("Go to slide {}", i + 1))
                .map_err(UiError::from)?;
            let this = self.clone();
            dom::listen(&dot, "click", move |_: Event| this.interact(|s| s.go_to(i as isize)))?;
            container
                .append_child(&dot)
                .map_err(UiError::from)?;
        }
        Ok(())
    }

    fn bind_controls(&self) -> Result<()> {
        let root = &self.inner.root;
        if let Some(prev) = dom::query_in(root, ".gallery-control.prev") {
            let this = self.clone();
            dom::listen(&prev, "click", move |_: Event| this.interact(SliderState::prev))?;
        }
        if let Some(next) = dom::query_in(root, ".gallery-control.next") {
            let this = self.clone();
            dom::listen(&next, "click", move |_: Event| this.interact(SliderState::next))?;
        }

        let this = self.clone();
        dom::listen_passive(root, "touchstart", move |event: TouchEvent| {
            if let Some(touch) = event.changed_touches().get(0) {
                this.inner.touch_start.set(f64::from(touch.screen_x()));
            }
        })?;
        let this = self.clone();
        dom::listen_passive(root, "touchend", move |event: TouchEvent| {
            let Some(touch) = event.changed_touches().get(0) else {
                return;
            };
            match swipe_direction(this.inner.touch_start.get(), f64::from(touch.screen_x())) {
                Some(Swipe::Next) => this.interact(SliderState::next),
                Some(Swipe::Prev) => this.interact(SliderState::prev),
                None => {}
            }
        })?;

        let _ = root.set_attribute("tabindex", "0");
        let this = self.clone();
        dom::listen(root, "keydown", move |event: KeyboardEvent| match event.key().as_str() {
            "ArrowLeft" => this.interact(SliderState::prev),
            "ArrowRight" => this.interact(SliderState::next),
            _ => {}
        })?;
        Ok(())
    }

    /// User-driven move: the autoplay clock starts over.
    fn interact(&self, step: impl FnOnce(&mut SliderState) -> usize) {
        self.step(step);
        self.restart_autoplay();
    }

    fn step(&self, step: impl FnOnce(&mut SliderState) -> usize) {
        let index = step(&mut *self.inner.state.borrow_mut());
        self.paint(index);
    }

    fn paint(&self, index: usize) {
        let activate = |items: &[Element]| {
            for (i, el) in items.iter().enumerate() {
                dom::set_class(el, ACTIVE_CLASS, i == index);
            }
        };
        activate(&self.inner.slides);
        activate(&self.inner.titles);
        activate(&dom::query_all_in(&self.inner.root, ".gallery-dot"));
    }

    fn restart_autoplay(&self) {
        let weak = Rc::downgrade(&self.inner);
        let handle = self.inner.scheduler.interval(
            GALLERY_AUTOPLAY_MS,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    GallerySlider { inner }.step(SliderState::next);
                }
            }),
        );
        let previous = self.inner.autoplay.borrow_mut().replace(handle);
        drop(previous);
    }
}

/// Rotates `.car-slide` images every few seconds once all of them loaded.
pub fn attach_car_slider(container: Element) -> Result<()> {
    let slides = dom::query_all_in(&container, ".car-slide");
    if slides.len() < 2 {
        return Ok(());
    }
    let slides = Rc::new(slides);
    let pending = Rc::new(Cell::new(slides.len()));

    let start = {
        let slides = slides.clone();
        let container = container.clone();
        Rc::new(move || {
            dom::set_class(&container, "loaded", true);
            for (i, slide) in slides.iter().enumerate() {
                dom::set_class(slide, ACTIVE_CLASS, i == 0);
            }
            let state = RefCell::new(SliderState::new(slides.len()));
            let slides = slides.clone();
            BrowserScheduler
                .interval(
                    CAR_ROTATION_MS,
                    Box::new(move || {
                        let index = state.borrow_mut().next();
                        for (i, slide) in slides.iter().enumerate() {
                            dom::set_class(slide, ACTIVE_CLASS, i == index);
                        }
                    }),
                )
                .forget();
        })
    };

    for slide in slides.iter() {
        let loaded = slide
            .dyn_ref::<HtmlImageElement>()
            .map(|img| img.complete() && img.natural_height() != 0)
            .unwrap_or(true);
        if loaded {
            pending.set(pending.get() - 1);
            continue;
        }
        // A broken image must not stall the rotation.
        let counted = Rc::new(Cell::new(false));
        for event in ["load", "error"] {
            let pending = pending.clone();
            let start = start.clone();
            let counted = counted.clone();
            dom::listen(slide, event, move |_: Event| {
                if counted.replace(true) {
                    return;
                }
                pending.set(pending.get().saturating_sub(1));
                if pending.get() == 0 {
                    (*start)();
                }
            })?;
        }
    }
    if pending.get() == 0 {
        (*start)();
    }
    Ok(())
}
