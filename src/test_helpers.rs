//! Shared test utilities for the simple-lightbox test suite.
//!
//! Provides page builders, a load probe the test controls, a callback
//! recorder, and bulk extractors over catalogues.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let doc = plain_page(&["a.jpg", "b.jpg"]);
//! let recorder = Recorder::default();
//! let mut gallery = Gallery::new(settings_with(&recorder, "autoplaySpeed = 0"));
//! block_on(gallery.refresh(&doc, &doc));
//!
//! assert_eq!(entry_ids(gallery.session().catalogue()), vec!["element0", "element1"]);
//! ```

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::catalogue::{Catalogue, CatalogueEntry, entry_id};
use crate::dom::{Document, ElementSpec, LoadState, MediaKind, NodeId};
use crate::events::LightboxEvent;
use crate::ready::{LoadOutcome, LoadProbe};
use crate::settings::{Callbacks, Overrides, Settings, merge};

// =========================================================================
// Pages
// =========================================================================

fn photo(src: &str, index: usize) -> ElementSpec {
    ElementSpec::new("img")
        .attr("src", src)
        .attr("alt", &format!("Photo {index}"))
        .natural(800, 600)
}

/// A `<div>` of loaded `<img>` elements, captioned `Photo N`.
pub fn plain_page(sources: &[&str]) -> Document {
    let root = sources
        .iter()
        .enumerate()
        .fold(ElementSpec::new("div"), |root, (i, src)| {
            root.child(photo(src, i))
        });
    Document::from_spec(root)
}

/// One marked anchor per `(href, thumbnail)` pair, each wrapping a loaded
/// thumbnail image.
pub fn linked_page(links: &[(&str, &str)]) -> Document {
    let root = links
        .iter()
        .enumerate()
        .fold(ElementSpec::new("div"), |root, (i, (href, thumb))| {
            root.child(
                ElementSpec::new("a")
                    .attr("href", href)
                    .attr("data-attribute", "SRL")
                    .child(photo(thumb, i)),
            )
        });
    Document::from_spec(root)
}

/// Plain images `img0.jpg`, `img1.jpg`, ... in the given load states.
pub fn page_with_states(states: &[LoadState]) -> Document {
    let root = states
        .iter()
        .enumerate()
        .fold(ElementSpec::new("div"), |root, (i, state)| {
            root.child(photo(&format!("img{i}.jpg"), i).load(*state))
        });
    Document::from_spec(root)
}

// =========================================================================
// Load probe
// =========================================================================

/// A probe whose nodes settle only when the test says so.
///
/// A node whose waiter is dropped without being resolved settles as
/// detached.
#[derive(Default)]
pub struct ManualProbe {
    waiting: RefCell<HashMap<NodeId, Vec<oneshot::Sender<LoadOutcome>>>>,
}

impl ManualProbe {
    /// Settle every pending wait on `node` with `outcome`.
    pub fn resolve(&self, node: NodeId, outcome: LoadOutcome) {
        let senders = self.waiting.borrow_mut().remove(&node).unwrap_or_default();
        assert!(!senders.is_empty(), "nothing is waiting on {node}");
        for tx in senders {
            let _ = tx.send(outcome);
        }
    }
}

impl LoadProbe for ManualProbe {
    fn settle(&self, node: NodeId) -> LocalBoxFuture<'_, LoadOutcome> {
        let (tx, rx) = oneshot::channel();
        self.waiting.borrow_mut().entry(node).or_default().push(tx);
        rx.map(|r| r.unwrap_or(LoadOutcome::Detached)).boxed_local()
    }
}

// =========================================================================
// Callbacks
// =========================================================================

/// Records every callback invocation as the event that caused it.
#[derive(Default, Clone)]
pub struct Recorder {
    log: Rc<RefCell<Vec<LightboxEvent>>>,
}

impl Recorder {
    /// Callbacks that append to this recorder. Each call builds fresh
    /// closures, so two calls never compare as the same callbacks.
    pub fn callbacks(&self) -> Callbacks {
        let slide = self.log.clone();
        let opened = self.log.clone();
        let closed = self.log.clone();
        let count = self.log.clone();
        Callbacks::default()
            .on_slide_change(move |i| slide.borrow_mut().push(LightboxEvent::SlideChange(i)))
            .on_lightbox_opened(move || opened.borrow_mut().push(LightboxEvent::LightboxOpened))
            .on_lightbox_closed(move || closed.borrow_mut().push(LightboxEvent::LightboxClosed))
            .on_count_slides(move |n| count.borrow_mut().push(LightboxEvent::CountSlides(n)))
    }

    pub fn events(&self) -> Vec<LightboxEvent> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

/// Stock settings with `options` (TOML) merged in and the recorder's
/// callbacks installed.
pub fn settings_with(recorder: &Recorder, options: &str) -> Settings {
    let overrides = Overrides {
        options: toml::from_str(options).unwrap(),
        callbacks: recorder.callbacks(),
    };
    merge(&Settings::default(), &overrides).unwrap()
}

// =========================================================================
// Catalogues
// =========================================================================

/// `n` image entries `element0..element{n-1}` with sources `img{i}.jpg`.
pub fn catalogue_of(n: usize) -> Catalogue {
    Catalogue::new(
        (0..n)
            .map(|i| CatalogueEntry {
                id: entry_id(i),
                kind: MediaKind::Image,
                source: format!("img{i}.jpg"),
                thumbnail: format!("img{i}.jpg"),
                caption: Some(format!("Photo {i}")),
                dimensions: None,
            })
            .collect(),
    )
}

/// Find an entry by id. Panics with the available ids if missing.
pub fn find_entry<'a>(catalogue: &'a Catalogue, id: &str) -> &'a CatalogueEntry {
    catalogue.find(id).unwrap_or_else(|| {
        panic!(
            "entry '{}' not found. Available: {:?}",
            id,
            entry_ids(catalogue)
        )
    })
}

/// Entry ids in catalogue order.
pub fn entry_ids(catalogue: &Catalogue) -> Vec<&str> {
    catalogue.iter().map(|e| e.id.as_str()).collect()
}

/// Entry sources in catalogue order.
pub fn sources(catalogue: &Catalogue) -> Vec<&str> {
    catalogue.iter().map(|e| e.source.as_str()).collect()
}
