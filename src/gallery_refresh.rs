//! Refetches and splices the product gallery when the selected variant
//! changes.
//!
//! The carousel itself never sees the network: this service fetches the
//! replacement markup, swaps the affected subtrees, and only on success
//! asks the mounted carousels to re-initialize. Any failure leaves the
//! page, and the carousel state, exactly as it was.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use gloo::console;
use gloo::events::EventListener;
use gloo::net::http::Request;
use gloo::timers::callback::Timeout;
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    CustomEvent, Document, DomParser, Element, Event, HtmlInputElement, HtmlSelectElement,
    SupportedType, Url,
};

pub const VARIANT_CHANGE_EVENT: &str = "variant:change";

const GALLERY_SELECTOR: &str = "media-gallery[data-variant-gallery=\"true\"]";
const PRODUCT_FORM_SELECTOR: &str = "product-form";
const SECTION_ID_ATTR: &str = "data-section-id";
// The variant picker rewrites its hidden id field shortly after the change
// event fires; wait it out before reading the final value.
const VARIANT_DEBOUNCE_MS: u32 = 100;

#[derive(Debug)]
pub enum RefreshError {
    Network(gloo::net::Error),
    Status(u16),
    Parse(String),
    MissingFragment(String),
}

impl fmt::Display for RefreshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshError::Network(err) => write!(f, "network error: {err}"),
            RefreshError::Status(status) => write!(f, "unexpected response status {status}"),
            RefreshError::Parse(message) => write!(f, "could not parse response: {message}"),
            RefreshError::MissingFragment(id) => {
                write!(f, "gallery fragment '{id}' missing from response")
            }
        }
    }
}

impl std::error::Error for RefreshError {}

pub struct GalleryRefresher {
    gallery: Element,
    section_id: String,
    listeners: RefCell<Vec<EventListener>>,
    debounce: RefCell<Option<Timeout>>,
}

impl GalleryRefresher {
    /// Arms the service when the page carries a variant-driven gallery and
    /// a product form. Returns `None` otherwise; most pages have neither.
    pub fn start(document: &Document) -> Option<Rc<Self>> {
        let gallery = document.query_selector(GALLERY_SELECTOR).ok().flatten()?;
        let section_id = gallery.get_attribute(SECTION_ID_ATTR)?;
        let form = document
            .query_selector(PRODUCT_FORM_SELECTOR)
            .ok()
            .flatten()?;

        let refresher = Rc::new(Self {
            gallery,
            section_id,
            listeners: RefCell::new(Vec::new()),
            debounce: RefCell::new(None),
        });

        let mut listeners = Vec::new();

        let host = Rc::clone(&refresher);
        let form_for_read = form.clone();
        listeners.push(EventListener::new(&form, "change", move |event: &Event| {
            let Some(target) = event.target() else {
                return;
            };
            let Some(name) = field_name(&target) else {
                return;
            };
            if !is_variant_field(&name) {
                return;
            }
            let inner = Rc::clone(&host);
            let form = form_for_read.clone();
            let timeout = Timeout::new(VARIANT_DEBOUNCE_MS, move || {
                inner.debounce.borrow_mut().take();
                if let Some(variant_id) = selected_variant_id(&form) {
                    inner.refresh(variant_id);
                }
            });
            *host.debounce.borrow_mut() = Some(timeout);
        }));

        let host = Rc::clone(&refresher);
        listeners.push(EventListener::new(
            document,
            VARIANT_CHANGE_EVENT,
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<CustomEvent>() else {
                    return;
                };
                if let Some(variant_id) = variant_id_from_detail(&event.detail()) {
                    host.refresh(variant_id);
                }
            },
        ));

        *refresher.listeners.borrow_mut() = listeners;
        console::log!("variant gallery refresh armed", refresher.section_id.clone());
        Some(refresher)
    }

    fn refresh(self: &Rc<Self>, variant_id: String) {
        let host = Rc::clone(self);
        spawn_local(async move {
            match host.fetch_and_splice(&variant_id).await {
                Ok(updated_url) => {
                    replace_history_url(&updated_url);
                    crate::refresh_hosts_under(&host.gallery);
                    console::log!("gallery refreshed for variant", variant_id);
                }
                Err(err) => {
                    // Leave the carousel in its last valid state.
                    console::error!("gallery refresh failed", err.to_string());
                }
            }
        });
    }

    async fn fetch_and_splice(&self, variant_id: &str) -> Result<String, RefreshError> {
        let window = web_sys::window().ok_or_else(|| RefreshError::Parse("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| RefreshError::Parse("no document".into()))?;
        let href = window
            .location()
            .href()
            .map_err(|err| RefreshError::Parse(js_error_string(&err)))?;
        let url =
            Url::new(&href).map_err(|err| RefreshError::Parse(js_error_string(&err)))?;
        url.search_params().set("variant", variant_id);

        let request_path = refresh_request_path(&url.pathname(), variant_id, &self.section_id);
        let response = Request::get(&request_path)
            .send()
            .await
            .map_err(RefreshError::Network)?;
        if !response.ok() {
            return Err(RefreshError::Status(response.status()));
        }
        let html = response.text().await.map_err(RefreshError::Network)?;

        let parser =
            DomParser::new().map_err(|err| RefreshError::Parse(js_error_string(&err)))?;
        let fetched = parser
            .parse_from_string(&html, SupportedType::TextHtml)
            .map_err(|err| RefreshError::Parse(js_error_string(&err)))?;

        // The viewer is the one fragment that must exist on both sides;
        // thumbnails and the zoom modal are spliced opportunistically.
        let viewer_id = format!("GalleryViewer-{}", self.section_id);
        let new_viewer = fetched
            .get_element_by_id(&viewer_id)
            .ok_or_else(|| RefreshError::MissingFragment(viewer_id.clone()))?;
        let current_viewer = document
            .get_element_by_id(&viewer_id)
            .ok_or_else(|| RefreshError::MissingFragment(viewer_id.clone()))?;
        current_viewer.set_inner_html(&new_viewer.inner_html());

        splice_by_id(
            &fetched,
            &document,
            &format!("Slider-Thumbnails-{}", self.section_id),
        );
        splice_by_selector(
            &fetched,
            &document,
            &format!(
                "#ProductModal-{} .product-media-modal__content",
                self.section_id
            ),
        );

        Ok(url.href())
    }
}

fn field_name(target: &web_sys::EventTarget) -> Option<String> {
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        return Some(input.name());
    }
    if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
        return Some(select.name());
    }
    None
}

fn is_variant_field(name: &str) -> bool {
    name == "id" || name.starts_with("options")
}

fn selected_variant_id(form: &Element) -> Option<String> {
    let input = form.query_selector("input[name=\"id\"]").ok().flatten()?;
    let input = input.dyn_into::<HtmlInputElement>().ok()?;
    let value = input.value();
    (!value.is_empty()).then_some(value)
}

fn variant_id_from_detail(detail: &JsValue) -> Option<String> {
    let variant = Reflect::get(detail, &JsValue::from_str("variant")).ok()?;
    let id = Reflect::get(&variant, &JsValue::from_str("id")).ok()?;
    if let Some(id) = id.as_string() {
        return (!id.is_empty()).then_some(id);
    }
    id.as_f64().map(|id| format!("{}", id as u64))
}

fn refresh_request_path(pathname: &str, variant_id: &str, section_id: &str) -> String {
    format!("{pathname}?variant={variant_id}&section_id={section_id}")
}

fn splice_by_id(fetched: &Document, live: &Document, id: &str) {
    if let (Some(new_fragment), Some(current)) =
        (fetched.get_element_by_id(id), live.get_element_by_id(id))
    {
        current.set_inner_html(&new_fragment.inner_html());
    }
}

fn splice_by_selector(fetched: &Document, live: &Document, selector: &str) {
    if let (Ok(Some(new_fragment)), Ok(Some(current))) = (
        fetched.query_selector(selector),
        live.query_selector(selector),
    ) {
        current.set_inner_html(&new_fragment.inner_html());
    }
}

fn replace_history_url(url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(url));
    }
}

fn js_error_string(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
