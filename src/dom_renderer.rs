//! Writes carousel state onto the live DOM.
//!
//! Committed offsets write through immediately. Live drag offsets are
//! batched onto the next animation frame; only the most recent pending
//! value is flushed, and a committed write cancels anything still pending
//! so a stale frame can never land after the gesture settles.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlButtonElement, HtmlElement};

use crate::slide_store::SlideStore;
use vitrine_core::{ControlState, SlideRenderer};

const ACTIVE_CLASS: &str = "is-active";
const DRAGGING_CLASS: &str = "is-dragging";
const TOUCHING_CLASS: &str = "is-touching";

pub struct DomRenderer {
    root: Element,
    store: SlideStore,
    dragging: bool,
    pending_offset: Rc<Cell<Option<f64>>>,
    frame: Rc<RefCell<Option<AnimationFrame>>>,
}

impl DomRenderer {
    pub fn new(root: Element, store: SlideStore) -> Self {
        Self {
            root,
            store,
            dragging: false,
            pending_offset: Rc::new(Cell::new(None)),
            frame: Rc::new(RefCell::new(None)),
        }
    }
}

impl SlideRenderer for DomRenderer {
    fn set_offset(&mut self, percent: f64) {
        let Some(container) = self.store.container.clone() else {
            return;
        };
        if !self.dragging {
            self.frame.borrow_mut().take();
            self.pending_offset.set(None);
            write_offset(&container, percent);
            return;
        }
        self.pending_offset.set(Some(percent));
        if self.frame.borrow().is_some() {
            return;
        }
        let pending = Rc::clone(&self.pending_offset);
        let frame = Rc::clone(&self.frame);
        let handle = request_animation_frame(move |_| {
            frame.borrow_mut().take();
            if let Some(percent) = pending.take() {
                write_offset(&container, percent);
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn set_transition_enabled(&mut self, enabled: bool) {
        let Some(container) = self.store.container.as_ref() else {
            return;
        };
        if enabled {
            let _ = container.style().remove_property("transition");
        } else {
            let _ = container.style().set_property("transition", "none");
        }
    }

    fn set_active_slide(&mut self, index: usize) {
        for (i, slide) in self.store.slides.iter().enumerate() {
            let _ = slide.class_list().toggle_with_force(ACTIVE_CLASS, i == index);
        }
        for (i, dot) in self.store.dots.iter().enumerate() {
            let _ = dot.class_list().toggle_with_force(ACTIVE_CLASS, i == index);
        }
    }

    fn set_controls(&mut self, controls: &ControlState) {
        set_button(self.store.prev_button.as_ref(), controls.visible, controls.prev_enabled);
        set_button(self.store.next_button.as_ref(), controls.visible, controls.next_enabled);
        if let Some(dots_container) = self.store.dots_container.as_ref() {
            set_display(dots_container, controls.visible);
        } else {
            for dot in &self.store.dots {
                set_display(dot, controls.visible);
            }
        }
    }

    fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
        if let Some(container) = self.store.container.as_ref() {
            let _ = container
                .class_list()
                .toggle_with_force(DRAGGING_CLASS, dragging);
        }
        let _ = self
            .root
            .class_list()
            .toggle_with_force(TOUCHING_CLASS, dragging);
    }
}

fn write_offset(container: &HtmlElement, percent: f64) {
    let _ = container
        .style()
        .set_property("transform", &format!("translateX({percent}%)"));
}

fn set_button(button: Option<&Element>, visible: bool, enabled: bool) {
    let Some(button) = button else {
        return;
    };
    set_display(button, visible);
    if let Some(button) = button.dyn_ref::<HtmlButtonElement>() {
        button.set_disabled(!enabled);
    }
}

fn set_display(element: &Element, visible: bool) {
    let Some(element) = element.dyn_ref::<HtmlElement>() else {
        return;
    };
    if visible {
        let _ = element.style().remove_property("display");
    } else {
        let _ = element.style().set_property("display", "none");
    }
}
