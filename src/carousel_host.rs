//! Binds one carousel state machine to a mounted DOM subtree.
//!
//! The host owns the listeners, the discovered slide store, and the DOM
//! renderer. Card and product galleries share this type; the differences
//! between them are carried entirely by [`CarouselOptions`].

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use gloo::console;
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use js_sys::Date;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlImageElement, HtmlLinkElement, MouseEvent, TouchEvent};

use crate::dom_renderer::DomRenderer;
use crate::slide_store::{SelectorSet, SlideStore, CARD_SELECTORS, PRODUCT_SELECTORS};
use vitrine_core::{Carousel, PointerKind};

#[derive(Clone, Copy)]
pub struct CarouselOptions {
    pub infinite: bool,
    pub preload_adjacent: bool,
    pub selectors: SelectorSet,
}

impl CarouselOptions {
    /// Collection-card galleries: clamped navigation, no preloading.
    pub fn card() -> Self {
        Self {
            infinite: false,
            preload_adjacent: false,
            selectors: CARD_SELECTORS,
        }
    }

    /// Product-page galleries: wrapping navigation plus adjacent-image
    /// preloading.
    pub fn product() -> Self {
        Self {
            infinite: true,
            preload_adjacent: true,
            selectors: PRODUCT_SELECTORS,
        }
    }
}

pub struct CarouselHost {
    root: Element,
    options: CarouselOptions,
    carousel: RefCell<Carousel>,
    store: RefCell<SlideStore>,
    renderer: RefCell<DomRenderer>,
    listeners: RefCell<Vec<EventListener>>,
    preloaded: RefCell<HashSet<String>>,
    preload_frame: RefCell<Option<AnimationFrame>>,
}

impl CarouselHost {
    pub fn mount(root: Element, options: CarouselOptions) -> Rc<Self> {
        let store = SlideStore::discover(&root, &options.selectors);
        let slide_count = store.slide_count();
        let renderer = DomRenderer::new(root.clone(), store.clone());
        let host = Rc::new(Self {
            root,
            options,
            carousel: RefCell::new(Carousel::new(slide_count, options.infinite)),
            store: RefCell::new(store),
            renderer: RefCell::new(renderer),
            listeners: RefCell::new(Vec::new()),
            preloaded: RefCell::new(HashSet::new()),
            preload_frame: RefCell::new(None),
        });
        {
            let mut renderer = host.renderer.borrow_mut();
            host.carousel.borrow().sync(&mut *renderer);
        }
        host.install_listeners();
        host.schedule_adjacent_preload();
        console::log!(
            "carousel mounted",
            host.root.tag_name().to_lowercase(),
            slide_count as u32
        );
        host
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn current_index(&self) -> usize {
        self.carousel.borrow().current_index()
    }

    /// Content-swap entry point: rediscover the slide store from the (new)
    /// subtree, reset the state machine, and rewire listeners. Safe to call
    /// repeatedly; handlers are never double-registered.
    pub fn reinitialize(self: &Rc<Self>) {
        self.listeners.borrow_mut().clear();
        self.preload_frame.borrow_mut().take();
        let store = SlideStore::discover(&self.root, &self.options.selectors);
        let slide_count = store.slide_count();
        *self.renderer.borrow_mut() = DomRenderer::new(self.root.clone(), store.clone());
        *self.store.borrow_mut() = store;
        {
            let mut renderer = self.renderer.borrow_mut();
            self.carousel
                .borrow_mut()
                .reinitialize(slide_count, &mut *renderer);
        }
        self.install_listeners();
        self.schedule_adjacent_preload();
        console::log!("carousel reinitialized", slide_count as u32);
    }

    /// Releases every listener and pending frame. The host keeps its state
    /// but stops reacting to the page.
    pub fn unmount(&self) {
        self.listeners.borrow_mut().clear();
        self.preload_frame.borrow_mut().take();
    }

    fn install_listeners(self: &Rc<Self>) {
        let mut listeners = Vec::new();
        if self.carousel.borrow().disabled() {
            // Nothing to navigate; the sync above already hid the controls.
            *self.listeners.borrow_mut() = listeners;
            return;
        }
        let store = self.store.borrow().clone();

        if let Some(button) = store.prev_button.clone() {
            let host = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                &button,
                "click",
                active_options(),
                move |event: &Event| {
                    event.prevent_default();
                    event.stop_propagation();
                    host.go_previous();
                },
            ));
            let host = Rc::clone(self);
            listeners.push(EventListener::new(&button, "mouseenter", move |_event| {
                let (prev, _) = host.carousel.borrow().adjacent_indices();
                host.preload_slide_image(prev, false);
            }));
        }

        if let Some(button) = store.next_button.clone() {
            let host = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                &button,
                "click",
                active_options(),
                move |event: &Event| {
                    event.prevent_default();
                    event.stop_propagation();
                    host.go_next();
                },
            ));
            let host = Rc::clone(self);
            listeners.push(EventListener::new(&button, "mouseenter", move |_event| {
                let (_, next) = host.carousel.borrow().adjacent_indices();
                host.preload_slide_image(next, false);
            }));
        }

        for (index, dot) in store.dots.iter().enumerate() {
            let host = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                dot,
                "click",
                active_options(),
                move |event: &Event| {
                    event.prevent_default();
                    event.stop_propagation();
                    host.go_to(index);
                },
            ));
        }

        if let Some(container) = store.container.clone() {
            let host = Rc::clone(self);
            listeners.push(EventListener::new(&container, "touchstart", move |event: &Event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                let Some(touch) = event.touches().item(0) else {
                    return;
                };
                host.begin_drag(PointerKind::Touch, f64::from(touch.client_x()));
            }));

            let host = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                &container,
                "touchmove",
                active_options(),
                move |event: &Event| {
                    let Some(touch_event) = event.dyn_ref::<TouchEvent>() else {
                        return;
                    };
                    let Some(touch) = touch_event.touches().item(0) else {
                        return;
                    };
                    // Past the slop the swipe owns the gesture; keep the
                    // page from scrolling vertically underneath it.
                    if host.move_drag(f64::from(touch.client_x())) {
                        event.prevent_default();
                    }
                },
            ));

            let host = Rc::clone(self);
            listeners.push(EventListener::new(&container, "touchend", move |_event| {
                host.end_drag();
            }));

            let host = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                &container,
                "mousedown",
                active_options(),
                move |event: &Event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    if host.begin_drag(PointerKind::Mouse, f64::from(event.client_x())) {
                        event.prevent_default();
                    }
                },
            ));

            let host = Rc::clone(self);
            listeners.push(EventListener::new(&container, "mousemove", move |event: &Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                host.move_drag(f64::from(event.client_x()));
            }));

            for event_type in ["mouseup", "mouseleave"] {
                let host = Rc::clone(self);
                listeners.push(EventListener::new(&container, event_type, move |_event| {
                    host.end_drag();
                }));
            }
        } else {
            console::warn!("carousel has no slides container; gestures disabled");
        }

        *self.listeners.borrow_mut() = listeners;
    }

    fn go_previous(self: &Rc<Self>) {
        let mut renderer = self.renderer.borrow_mut();
        let moved = self
            .carousel
            .borrow_mut()
            .go_to_previous(Date::now(), &mut *renderer);
        drop(renderer);
        if moved {
            self.schedule_adjacent_preload();
        }
    }

    fn go_next(self: &Rc<Self>) {
        let mut renderer = self.renderer.borrow_mut();
        let moved = self
            .carousel
            .borrow_mut()
            .go_to_next(Date::now(), &mut *renderer);
        drop(renderer);
        if moved {
            self.schedule_adjacent_preload();
        }
    }

    fn go_to(self: &Rc<Self>, index: usize) {
        let mut renderer = self.renderer.borrow_mut();
        let moved = self
            .carousel
            .borrow_mut()
            .go_to_slide(index, Date::now(), &mut *renderer);
        drop(renderer);
        if moved {
            self.schedule_adjacent_preload();
        }
    }

    fn begin_drag(&self, kind: PointerKind, x: f64) -> bool {
        let extent = self.store.borrow().extent_px();
        let mut renderer = self.renderer.borrow_mut();
        self.carousel
            .borrow_mut()
            .pointer_down(kind, x, extent, viewport_width(), &mut *renderer)
    }

    fn move_drag(&self, x: f64) -> bool {
        let mut renderer = self.renderer.borrow_mut();
        self.carousel.borrow_mut().pointer_move(x, &mut *renderer)
    }

    fn end_drag(self: &Rc<Self>) {
        let was_dragging = self.carousel.borrow().is_dragging();
        let mut renderer = self.renderer.borrow_mut();
        self.carousel
            .borrow_mut()
            .pointer_up(Date::now(), &mut *renderer);
        drop(renderer);
        if was_dragging {
            self.schedule_adjacent_preload();
        }
    }

    /// Defers the preload scan to the next frame so it never competes with
    /// the navigation's own style writes.
    fn schedule_adjacent_preload(self: &Rc<Self>) {
        if !self.options.preload_adjacent {
            return;
        }
        if self.preload_frame.borrow().is_some() {
            return;
        }
        let host = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            host.preload_frame.borrow_mut().take();
            host.preload_adjacent_slides();
        });
        *self.preload_frame.borrow_mut() = Some(handle);
    }

    fn preload_adjacent_slides(&self) {
        let (prev, next) = self.carousel.borrow().adjacent_indices();
        self.preload_slide_image(prev, true);
        self.preload_slide_image(next, true);
    }

    /// Warms the image of `index` by appending a preload hint to `<head>`.
    /// `lazy_only` restricts the scan to images the browser would otherwise
    /// defer; hover preloads warm eagerly.
    fn preload_slide_image(&self, index: Option<usize>, lazy_only: bool) {
        let Some(index) = index else {
            return;
        };
        let store = self.store.borrow();
        let Some(slide) = store.slides.get(index) else {
            return;
        };
        let Some(image) = slide
            .query_selector("img")
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlImageElement>().ok())
        else {
            return;
        };
        let loading = js_sys::Reflect::get(&image, &wasm_bindgen::JsValue::from_str("loading"))
            .ok()
            .and_then(|value| value.as_string())
            .unwrap_or_default();
        if lazy_only && loading != "lazy" {
            return;
        }
        self.preload_image(&image);
    }

    fn preload_image(&self, image: &HtmlImageElement) {
        let src = image.src();
        if src.is_empty() || !self.preloaded.borrow_mut().insert(src.clone()) {
            return;
        }
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        let Ok(link) = document.create_element("link") else {
            return;
        };
        let Ok(link) = link.dyn_into::<HtmlLinkElement>() else {
            return;
        };
        link.set_rel("preload");
        link.set_as("image");
        link.set_href(&src);
        let srcset = image.srcset();
        if !srcset.is_empty() {
            let _ = link.set_attribute("imagesrcset", &srcset);
        }
        if let Some(head) = document.head() {
            let _ = head.append_child(&link);
        }
    }
}

// Click and drag handlers need preventDefault, so they cannot be passive.
fn active_options() -> EventListenerOptions {
    EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive: false,
    }
}

fn viewport_width() -> f64 {
    web_sys::window()
        .and_then(|window| window.inner_width().ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0)
}
