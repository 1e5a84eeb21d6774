//! Discovery: find the gallery's candidate nodes under a container.
//!
//! A scan runs two independent queries over the container:
//!
//! - **Plain nodes**: every `img`/`video` anywhere under the root, wrapped or not.
//! - **Linked nodes**: every anchor carrying the gallery [`Marker`]
//!   (`data-attribute="SRL"` by default). The anchor's `href` is the
//!   full-resolution media and its inner element is the thumbnail.
//!
//! The two lists are separate categories, never merged. A single catalogue
//! pass is built from exactly one of them: the linked nodes when the page
//! marks any anchor, the plain nodes otherwise. That choice plus the node
//! list is the [`Snapshot`] the readiness gate and the staleness check work on.
//!
//! Scanning is a pure read of the document. Calling it again on an unchanged
//! page returns an equal result, so hosts re-scan freely whenever the
//! container's children or the settings change.

use crate::dom::{HostDocument, Marker, NodeId};
use serde::Serialize;

/// Which query a catalogue pass is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Plain,
    Linked,
}

/// Result of one scan over the container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub plain_nodes: Vec<NodeId>,
    pub linked_nodes: Vec<NodeId>,
}

/// The node set one catalogue pass is built from.
///
/// Two snapshots are equal iff they come from the same scan generation and
/// select the same category and the same nodes in the same order. Two scans
/// of an unchanged page find the same nodes but still differ in generation,
/// because load states may have changed in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Scan counter of the owner that issued this snapshot. `0` for a bare
    /// [`scan`].
    pub generation: u64,
    pub category: Category,
    pub nodes: Vec<NodeId>,
}

impl Snapshot {
    /// Whether both snapshots select the same nodes, ignoring generation.
    pub fn same_nodes(&self, other: &Snapshot) -> bool {
        self.category == other.category && self.nodes == other.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.plain_nodes.is_empty() && self.linked_nodes.is_empty()
    }

    /// Pick the category a catalogue is built from: linked if the page tags
    /// any anchor, plain otherwise.
    pub fn snapshot(&self) -> Snapshot {
        if self.linked_nodes.is_empty() {
            Snapshot {
                generation: 0,
                category: Category::Plain,
                nodes: self.plain_nodes.clone(),
            }
        } else {
            Snapshot {
                generation: 0,
                category: Category::Linked,
                nodes: self.linked_nodes.clone(),
            }
        }
    }
}

/// Scan `root` for plain media and marker-tagged anchors.
pub fn scan<D: HostDocument + ?Sized>(doc: &D, root: NodeId, marker: &Marker) -> ScanResult {
    ScanResult {
        plain_nodes: doc.media_elements(root),
        linked_nodes: doc.marked_anchors(root, marker),
    }
}
