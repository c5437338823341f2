//! Console audit of the hover-swap image effect on product cards.
//!
//! Diagnostic only: walks every hover-effect media container, reports
//! whether the second image actually made it into the markup, probes the
//! CSS by simulating a hover, and counts the matching stylesheet rules.
//! Enabled by a body attribute or query flag; inert otherwise.

use gloo::console;
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{CssStyleRule, Document, Element, Event, EventInit, HtmlImageElement, Window};

const HOVER_CONTAINER_SELECTOR: &str = ".media.media--hover-effect";
const CARD_WRAPPER_SELECTOR: &str = ".card-wrapper, .product-card-wrapper";
const DEBUG_FLAG_ATTR: &str = "data-vitrine-debug";
const DEBUG_FLAG_QUERY: &str = "vitrine_debug";
const HOVER_PROBE_DELAY_MS: u32 = 100;

pub fn run_if_enabled(window: &Window, document: &Document) {
    if !debug_enabled(window, document) {
        return;
    }
    audit(window, document);
}

fn debug_enabled(window: &Window, document: &Document) -> bool {
    if document
        .body()
        .map(|body| body.has_attribute(DEBUG_FLAG_ATTR))
        .unwrap_or(false)
    {
        return true;
    }
    window
        .location()
        .search()
        .map(|search| search.contains(DEBUG_FLAG_QUERY))
        .unwrap_or(false)
}

fn audit(window: &Window, document: &Document) {
    console::log!("hover image audit start");
    let containers = containers(document);
    console::log!("hover effect containers", containers.len() as u32);

    for (index, container) in containers.iter().enumerate() {
        let images = container_images(container);
        console::log!(
            "container",
            (index + 1) as u32,
            "images",
            images.len() as u32,
            "classes",
            container.class_name()
        );
        for image in images.iter().take(2) {
            console::log!(
                "  image",
                image.src(),
                "alt",
                image.alt(),
                "opacity",
                computed_opacity(window, image)
            );
        }
        let wrapper = container.closest(CARD_WRAPPER_SELECTOR).ok().flatten();
        console::log!(
            "  card wrapper",
            if wrapper.is_some() { "found" } else { "not found" }
        );

        if images.len() < 2 {
            console::warn!(
                "container",
                (index + 1) as u32,
                "has",
                images.len() as u32,
                "image(s); hover effect needs 2"
            );
            continue;
        }
        if let Some(wrapper) = wrapper {
            probe_hover(window, &wrapper, index + 1, images);
        }
    }

    console::log!("hover css rules", count_hover_rules(document));
    console::log!("hover image audit end");
}

fn containers(document: &Document) -> Vec<Element> {
    match document.query_selector_all(HOVER_CONTAINER_SELECTOR) {
        Ok(list) => crate::slide_store::collect_elements(&list),
        Err(_) => Vec::new(),
    }
}

fn container_images(container: &Element) -> Vec<HtmlImageElement> {
    match container.query_selector_all("img") {
        Ok(list) => crate::slide_store::collect_elements(&list)
            .into_iter()
            .filter_map(|element| element.dyn_into::<HtmlImageElement>().ok())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Dispatches a synthetic `mouseenter` on the card wrapper and re-reads the
/// image opacities once the transition has had a moment to apply.
fn probe_hover(window: &Window, wrapper: &Element, label: usize, images: Vec<HtmlImageElement>) {
    let init = EventInit::new();
    init.set_bubbles(true);
    let Ok(event) = Event::new_with_event_init_dict("mouseenter", &init) else {
        return;
    };
    let _ = wrapper.dispatch_event(&event);

    let window = window.clone();
    Timeout::new(HOVER_PROBE_DELAY_MS, move || {
        let first = computed_opacity(&window, &images[0]);
        let second = computed_opacity(&window, &images[1]);
        console::log!(
            "container",
            label as u32,
            "after hover: first opacity",
            first,
            "second opacity",
            second
        );
    })
    .forget();
}

fn computed_opacity(window: &Window, image: &HtmlImageElement) -> String {
    window
        .get_computed_style(image)
        .ok()
        .flatten()
        .and_then(|style| style.get_property_value("opacity").ok())
        .unwrap_or_default()
}

fn count_hover_rules(document: &Document) -> u32 {
    let sheets = document.style_sheets();
    let mut found = 0;
    for sheet_index in 0..sheets.length() {
        let Some(sheet) = sheets.item(sheet_index) else {
            continue;
        };
        let Ok(sheet) = sheet.dyn_into::<web_sys::CssStyleSheet>() else {
            continue;
        };
        // Cross-origin stylesheets throw on rule access; skip them.
        let Ok(rules) = sheet.css_rules() else {
            continue;
        };
        for rule_index in 0..rules.length() {
            let Some(rule) = rules.item(rule_index) else {
                continue;
            };
            let Some(rule) = rule.dyn_ref::<CssStyleRule>() else {
                continue;
            };
            let selector = rule.selector_text();
            if selector.contains("media--hover-effect") && selector.contains("hover") {
                found += 1;
                console::log!("hover css rule", selector);
            }
        }
    }
    found
}
