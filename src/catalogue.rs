//! Catalogue entries and the builder that produces them.
//!
//! Each scanned node that finished loading becomes one [`CatalogueEntry`].
//! Nodes that never loaded (broken URL, network error) are dropped silently:
//! a gallery with some broken media simply shows fewer entries.
//!
//! ## Field resolution
//!
//! | Field | Plain node | Linked node |
//! |-------|-----------|-------------|
//! | `source` | resolved source → declared source | anchor `href` |
//! | `thumbnail` | resolved source → `source` | inner media's resolved source → `source` |
//! | `caption` | `alt` → text content | inner `alt` → inner text content |
//! | `dimensions` | intrinsic size if loaded | unknown until the overlay loads the target |
//!
//! Ids are `element{N}` where `N` is the node's position in the scan, counted
//! before failed nodes are dropped. A three-image page whose second image is
//! broken yields `element0` and `element2`.
//!
//! Entries are immutable. When anything changes (a re-scan, a dimension
//! back-fill) a new [`Catalogue`] value replaces the old one.

use crate::dom::{Dimensions, HostDocument, MediaKind, MediaView, NodeId};
use crate::ready::ReadyReport;
use crate::scan::Category;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

const IMAGE_EXTENSIONS: &[&str] = &["gif", "jpg", "jpeg", "tiff", "png", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "ogv", "mov"];

/// One displayable unit of the gallery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogueEntry {
    pub id: String,
    pub kind: MediaKind,
    pub source: String,
    pub thumbnail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

/// Ordered entries in document order. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalogue {
    entries: Vec<CatalogueEntry>,
}

impl Catalogue {
    /// Build a catalogue, keeping the first entry for any repeated id.
    pub fn new(entries: Vec<CatalogueEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|e| {
                let fresh = seen.insert(e.id.clone());
                if !fresh {
                    tracing::warn!(id = %e.id, "dropping catalogue entry with duplicate id");
                }
                fresh
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogueEntry> {
        self.entries.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&CatalogueEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogueEntry> {
        self.entries.iter()
    }

    /// A copy of this catalogue with `id`'s dimensions set.
    /// `None` if no entry has that id.
    pub fn with_dimensions(&self, id: &str, dimensions: Dimensions) -> Option<Self> {
        let index = self.position(id)?;
        let mut entries = self.entries.clone();
        entries[index].dimensions = Some(dimensions);
        Some(Self { entries })
    }

    /// Carry measured dimensions over from `previous` onto entries that have
    /// none, when the entry with the same id there has the same source.
    pub fn keep_dimensions_from(mut self, previous: &Catalogue) -> Self {
        for entry in self.entries.iter_mut().filter(|e| e.dimensions.is_none()) {
            entry.dimensions = previous
                .find(&entry.id)
                .filter(|old| old.source == entry.source)
                .and_then(|old| old.dimensions);
        }
        self
    }
}

/// Click bindings from scanned nodes to the entry each one opens.
///
/// Rebuilt with every catalogue, so a node is bound at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickBindings {
    bindings: BTreeMap<NodeId, String>,
}

impl ClickBindings {
    pub fn entry_id(&self, node: NodeId) -> Option<&str> {
        self.bindings.get(&node).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Deterministic entry id for the `index`-th scanned node.
pub fn entry_id(index: usize) -> String {
    format!("element{index}")
}

/// First non-empty value, trimmed.
fn first_present(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|c| c.map(str::trim).filter(|s| !s.is_empty()))
        .map(String::from)
        .next()
}

fn has_extension(url: &str, extensions: &[&str]) -> bool {
    url.rsplit_once('.')
        .map(|(_, ext)| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Normalize one media view into an entry.
///
/// Returns `None` when the node did not load or no source URL can be derived.
pub fn entry_from_view(
    view: &MediaView,
    category: Category,
    index: usize,
    loaded: bool,
) -> Option<CatalogueEntry> {
    if !loaded {
        return None;
    }
    let resolved = first_present(&[view.current_src.as_deref(), view.src.as_deref()]);
    let caption = first_present(&[view.alt.as_deref(), view.text.as_deref()]);

    match category {
        Category::Plain => {
            let source = resolved?;
            Some(CatalogueEntry {
                id: entry_id(index),
                kind: view.kind,
                thumbnail: source.clone(),
                source,
                caption,
                dimensions: view.intrinsic,
            })
        }
        Category::Linked => {
            let source = first_present(&[view.link_href.as_deref()])?;
            let kind = if has_extension(&source, IMAGE_EXTENSIONS) {
                MediaKind::Image
            } else if has_extension(&source, VIDEO_EXTENSIONS) {
                MediaKind::Video
            } else {
                view.kind
            };
            Some(CatalogueEntry {
                id: entry_id(index),
                kind,
                thumbnail: resolved.unwrap_or_else(|| source.clone()),
                source,
                caption,
                dimensions: None,
            })
        }
    }
}

/// Build the entry for `node` from the host document.
pub fn build<D: HostDocument + ?Sized>(
    doc: &D,
    node: NodeId,
    category: Category,
    index: usize,
    loaded: bool,
) -> Option<CatalogueEntry> {
    let view = doc.media_view(node)?;
    entry_from_view(&view, category, index, loaded)
}

/// Build a whole catalogue and its click bindings from a readiness report.
pub fn build_catalogue<D: HostDocument + ?Sized>(
    doc: &D,
    report: &ReadyReport,
) -> (Catalogue, ClickBindings) {
    let category = report.snapshot.category;
    let mut entries = Vec::with_capacity(report.per_node.len());
    let mut bindings = ClickBindings::default();

    for (index, readiness) in report.per_node.iter().enumerate() {
        match build(doc, readiness.node, category, index, readiness.loaded()) {
            Some(entry) => {
                bindings.bindings.insert(readiness.node, entry.id.clone());
                entries.push(entry);
            }
            None => {
                tracing::debug!(node = %readiness.node, index, "omitting unresolvable media");
            }
        }
    }

    (Catalogue::new(entries), bindings)
}
