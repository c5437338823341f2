//! Interactive gallery widgets for a storefront theme.
//!
//! Compiled to WebAssembly and loaded as a theme asset: on startup the
//! crate scans the server-rendered document, mounts a carousel on every
//! `card-carousel` and `product-carousel` element, arms the variant-change
//! gallery refresh when the page carries one, and (when the debug flag is
//! set) runs the hover-image audit. The carousel state machine itself
//! lives in `vitrine_core` and never touches the DOM.

use std::cell::RefCell;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{Document, Element, Node};

pub mod carousel_host;
pub mod dom_renderer;
pub mod gallery_refresh;
pub mod hover_debug;
pub mod slide_store;

use carousel_host::{CarouselHost, CarouselOptions};
use gallery_refresh::GalleryRefresher;

const CARD_CAROUSEL_TAG: &str = "card-carousel";
const PRODUCT_CAROUSEL_TAG: &str = "product-carousel";

thread_local! {
    static HOSTS: RefCell<Vec<Rc<CarouselHost>>> = RefCell::new(Vec::new());
    static REFRESHER: RefCell<Option<Rc<GalleryRefresher>>> = RefCell::new(None);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    boot();
}

pub fn boot() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    mount_all(&document, CARD_CAROUSEL_TAG, CarouselOptions::card());
    mount_all(&document, PRODUCT_CAROUSEL_TAG, CarouselOptions::product());
    if let Some(refresher) = GalleryRefresher::start(&document) {
        REFRESHER.with(|slot| *slot.borrow_mut() = Some(refresher));
    }
    hover_debug::run_if_enabled(&window, &document);
}

fn mount_all(document: &Document, tag: &str, options: CarouselOptions) {
    let Ok(list) = document.query_selector_all(tag) else {
        return;
    };
    for element in slide_store::collect_elements(&list) {
        register_host(CarouselHost::mount(element, options));
    }
}

pub(crate) fn register_host(host: Rc<CarouselHost>) {
    HOSTS.with(|hosts| hosts.borrow_mut().push(host));
}

/// Re-binds every carousel under `root` after its markup was replaced:
/// surviving hosts rediscover their slide store, elements the splice
/// introduced wholesale get a fresh mount, and hosts whose element left
/// the document are unmounted and dropped.
pub(crate) fn refresh_hosts_under(root: &Element) {
    HOSTS.with(|hosts| {
        let mut hosts = hosts.borrow_mut();
        hosts.retain(|host| {
            let connected = host.root().is_connected();
            if !connected {
                host.unmount();
            }
            connected
        });
        for host in hosts.iter() {
            let node: &Node = host.root();
            if root.contains(Some(node)) {
                host.reinitialize();
            }
        }
        let Ok(list) = root.query_selector_all(PRODUCT_CAROUSEL_TAG) else {
            return;
        };
        for element in slide_store::collect_elements(&list) {
            let node: &Node = &element;
            let known = hosts
                .iter()
                .any(|host| host.root().is_same_node(Some(node)));
            if !known {
                hosts.push(CarouselHost::mount(element, CarouselOptions::product()));
            }
        }
    });
}
