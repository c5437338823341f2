//! Discovers the carousel's collaborating elements from a mount root.
//!
//! Discovery always runs fresh against the root: after a variant swap the
//! subtree may have been replaced wholesale, so nothing cached here is
//! trusted across a re-initialization.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, NodeList};

/// Class namespace for one carousel context. The product namespace carries
/// fallback selectors for themes that render the bare media list without
/// the carousel classes.
#[derive(Clone, Copy, Debug)]
pub struct SelectorSet {
    pub container: &'static str,
    pub container_fallback: Option<&'static str>,
    pub slide: &'static str,
    pub slide_fallback: Option<&'static str>,
    pub prev_button: &'static str,
    pub next_button: &'static str,
    pub dot: &'static str,
    pub dots_container: Option<&'static str>,
}

pub const CARD_SELECTORS: SelectorSet = SelectorSet {
    container: ".card__media-slides",
    container_fallback: None,
    slide: ".card__media-slide",
    slide_fallback: None,
    prev_button: ".card__carousel-nav--prev",
    next_button: ".card__carousel-nav--next",
    dot: ".card__carousel-dot",
    dots_container: None,
};

pub const PRODUCT_SELECTORS: SelectorSet = SelectorSet {
    container: ".product-carousel__slides",
    container_fallback: Some(".product__media-list"),
    slide: ".product-carousel__slide",
    slide_fallback: Some("li.product__media-item"),
    prev_button: ".product-carousel__nav--prev",
    next_button: ".product-carousel__nav--next",
    dot: ".product-carousel__dot",
    dots_container: Some(".product-carousel__dots"),
};

/// Element handles for one carousel instance. Every field is optional or
/// may be empty: missing buttons, dots, or even the slides container are
/// degraded-but-valid configurations, never failures.
#[derive(Clone, Default)]
pub struct SlideStore {
    pub container: Option<HtmlElement>,
    pub slides: Vec<Element>,
    pub prev_button: Option<Element>,
    pub next_button: Option<Element>,
    pub dots: Vec<Element>,
    pub dots_container: Option<Element>,
}

impl SlideStore {
    pub fn discover(root: &Element, selectors: &SelectorSet) -> Self {
        let container = query(root, selectors.container)
            .or_else(|| {
                selectors
                    .container_fallback
                    .and_then(|selector| query(root, selector))
            })
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());

        let mut slides = query_all(root, selectors.slide);
        if slides.is_empty() {
            if let (Some(container), Some(fallback)) =
                (container.as_ref(), selectors.slide_fallback)
            {
                slides = query_all(container, fallback);
            }
        }

        Self {
            container,
            slides,
            prev_button: query(root, selectors.prev_button),
            next_button: query(root, selectors.next_button),
            dots: query_all(root, selectors.dot),
            dots_container: selectors
                .dots_container
                .and_then(|selector| query(root, selector)),
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Container width in CSS pixels; zero when the container is missing
    /// or not laid out yet.
    pub fn extent_px(&self) -> f64 {
        self.container
            .as_ref()
            .map(|container| f64::from(container.offset_width()))
            .unwrap_or(0.0)
    }
}

fn query(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    match root.query_selector_all(selector) {
        Ok(list) => collect_elements(&list),
        Err(_) => Vec::new(),
    }
}

pub(crate) fn collect_elements(list: &NodeList) -> Vec<Element> {
    let mut elements = Vec::with_capacity(list.length() as usize);
    for index in 0..list.length() {
        if let Some(element) = list
            .item(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        {
            elements.push(element);
        }
    }
    elements
}
