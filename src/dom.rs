//! Host document contract and an in-memory document.
//!
//! The engine never touches a real DOM. Everything it needs from the page is
//! expressed by [`HostDocument`]: two queries ("every media element under a
//! root", "every marker-tagged anchor under a root"), a snapshot of a media
//! node's attributes, and a liveness check. A browser binding implements the
//! trait over its own node handles; this crate ships [`Document`], an
//! arena-backed tree that is good enough for the CLI and for tests.
//!
//! ## Page fixtures
//!
//! A [`Document`] is described as nested JSON:
//!
//! ```json
//! {
//!   "tag": "div",
//!   "children": [
//!     { "tag": "img", "attrs": { "src": "a.jpg", "alt": "Dawn" },
//!       "natural_width": 1600, "natural_height": 1067 },
//!     { "tag": "a", "attrs": { "href": "full/b.jpg", "data-attribute": "SRL" },
//!       "children": [ { "tag": "img", "attrs": { "src": "thumbs/b.jpg" } } ] },
//!     { "tag": "img", "attrs": { "src": "broken.jpg" }, "load": "error" }
//!   ]
//! }
//! ```
//!
//! `load` is `loaded` (default), `error` or `pending`. Until a node is loaded
//! its resolved source (`current_src`) is empty, the way a browser reports it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Page fixture parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),
    #[error("Node {0} is no longer attached to the document")]
    Detached(NodeId),
}

/// Opaque handle to a node of a host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Intrinsic pixel size of a media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Load progress of a media element as the host reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Loaded,
    Error,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Attribute that tags an anchor as a gallery link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub attribute: String,
    pub value: String,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            attribute: "data-attribute".to_string(),
            value: "SRL".to_string(),
        }
    }
}

/// Snapshot of the attributes the catalogue builder reads from one media node.
///
/// For an anchor, the view describes the anchor's first inner media element
/// and `link_href` is the anchor's target. For a bare media element,
/// `link_href` is the target of the enclosing anchor, if there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaView {
    /// The media element itself (the inner element when viewing an anchor).
    pub node: NodeId,
    pub kind: MediaKind,
    /// Source the host actually resolved and displays. Empty until loaded.
    pub current_src: Option<String>,
    /// Declared source attribute.
    pub src: Option<String>,
    pub alt: Option<String>,
    /// Text content (fallback text of a `<video>`).
    pub text: Option<String>,
    /// Natural size (images) or video size, known once loaded.
    pub intrinsic: Option<Dimensions>,
    pub load: LoadState,
    pub link_href: Option<String>,
}

/// What the engine needs from the page that hosts the gallery.
pub trait HostDocument {
    /// The gallery container.
    fn root(&self) -> NodeId;

    /// Every `img`/`video` under `root`, in document order.
    fn media_elements(&self, root: NodeId) -> Vec<NodeId>;

    /// Every anchor under `root` carrying `marker`, in document order.
    fn marked_anchors(&self, root: NodeId, marker: &Marker) -> Vec<NodeId>;

    /// Attribute snapshot of a media node or a marker-tagged anchor.
    /// `None` if the node is gone or holds no media.
    fn media_view(&self, node: NodeId) -> Option<MediaView>;

    /// Whether `node` is still attached to the document.
    fn contains(&self, node: NodeId) -> bool;
}

/// Nested element description used by page fixtures and [`Document::append`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub load: LoadState,
    #[serde(default)]
    pub natural_width: Option<u32>,
    #[serde(default)]
    pub natural_height: Option<u32>,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn load(mut self, load: LoadState) -> Self {
        self.load = load;
        self
    }

    pub fn natural(mut self, width: u32, height: u32) -> Self {
        self.natural_width = Some(width);
        self.natural_height = Some(height);
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    load: LoadState,
    natural: Option<Dimensions>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attached: bool,
}

/// Arena-backed element tree.
///
/// Removed nodes keep their slot (so stale [`NodeId`]s never alias a newer
/// node) but are no longer reachable from the root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: NodeId,
}

impl Document {
    pub fn from_spec(spec: ElementSpec) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.insert(spec, None);
        doc
    }

    pub fn from_json(json: &str) -> Result<Self, DomError> {
        let spec: ElementSpec = serde_json::from_str(json)?;
        Ok(Self::from_spec(spec))
    }

    /// Load a JSON page fixture from disk.
    pub fn load(path: &Path) -> Result<Self, DomError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn insert(&mut self, spec: ElementSpec, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let natural = match (spec.natural_width, spec.natural_height) {
            (Some(width), Some(height)) => Some(Dimensions { width, height }),
            _ => None,
        };
        self.nodes.push(Element {
            tag: spec.tag.to_ascii_lowercase(),
            attrs: spec.attrs,
            text: spec.text,
            load: spec.load,
            natural,
            parent,
            children: Vec::new(),
            attached: true,
        });
        for child in spec.children {
            let child_id = self.insert(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    fn element(&self, node: NodeId) -> Result<&Element, DomError> {
        self.nodes.get(node.0).ok_or(DomError::UnknownNode(node))
    }

    fn attached_element_mut(&mut self, node: NodeId) -> Result<&mut Element, DomError> {
        let el = self
            .nodes
            .get_mut(node.0)
            .ok_or(DomError::UnknownNode(node))?;
        if !el.attached {
            return Err(DomError::Detached(node));
        }
        Ok(el)
    }

    /// Append a subtree as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, spec: ElementSpec) -> Result<NodeId, DomError> {
        self.attached_element_mut(parent)?;
        let id = self.insert(spec, Some(parent));
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Detach `node` and its subtree from the document.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        if node == self.root {
            return Err(DomError::UnknownNode(node));
        }
        let parent = self.attached_element_mut(node)?.parent;
        if let Some(parent) = parent {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let el = &mut self.nodes[id.0];
            el.attached = false;
            stack.extend(el.children.iter().copied());
        }
        Ok(())
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.attached_element_mut(node)?
            .attrs
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn set_load(&mut self, node: NodeId, load: LoadState) -> Result<(), DomError> {
        self.attached_element_mut(node)?.load = load;
        Ok(())
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|el| el.tag.as_str())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node.0)
            .and_then(|el| el.attrs.get(name))
            .map(String::as_str)
    }

    /// First attached node whose `id` attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.attr(*n, "id") == Some(id))
    }

    /// Attached descendants of `root` in pre-order, `root` excluded.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Ok(el) = self.element(root) else {
            return out;
        };
        if !el.attached {
            return out;
        }
        let mut stack: Vec<NodeId> = el.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut text = self.nodes[node.0].text.clone();
        for child in self.descendants(node) {
            text.push_str(&self.nodes[child.0].text);
        }
        text
    }

    fn is_media(&self, node: NodeId) -> bool {
        matches!(self.tag(node), Some("img") | Some("video"))
    }

    /// Declared source: the `src` attribute, or a `<video>`'s first `<source>`.
    fn declared_src(&self, node: NodeId) -> Option<String> {
        if let Some(src) = self.attr(node, "src").filter(|s| !s.is_empty()) {
            return Some(src.to_string());
        }
        self.nodes[node.0]
            .children
            .iter()
            .find(|c| self.tag(**c) == Some("source"))
            .and_then(|c| self.attr(*c, "src"))
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    fn view_of_media(&self, node: NodeId, link_href: Option<String>) -> MediaView {
        let el = &self.nodes[node.0];
        let kind = if el.tag == "video" {
            MediaKind::Video
        } else {
            MediaKind::Image
        };
        let src = self.declared_src(node);
        let loaded = el.load == LoadState::Loaded;
        let text = self.text_content(node);
        MediaView {
            node,
            kind,
            current_src: if loaded { src.clone() } else { None },
            src,
            alt: el.attrs.get("alt").cloned(),
            text: (!text.trim().is_empty()).then_some(text),
            intrinsic: if loaded { el.natural } else { None },
            load: el.load,
            link_href,
        }
    }
}

impl HostDocument for Document {
    fn root(&self) -> NodeId {
        self.root
    }

    fn media_elements(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|n| self.is_media(*n))
            .collect()
    }

    fn marked_anchors(&self, root: NodeId, marker: &Marker) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|n| {
                self.tag(*n) == Some("a")
                    && self.attr(*n, &marker.attribute) == Some(marker.value.as_str())
            })
            .collect()
    }

    fn media_view(&self, node: NodeId) -> Option<MediaView> {
        if !self.contains(node) {
            return None;
        }
        if self.is_media(node) {
            let parent_href = self.nodes[node.0]
                .parent
                .filter(|p| self.tag(*p) == Some("a"))
                .and_then(|p| self.attr(p, "href"))
                .map(String::from);
            return Some(self.view_of_media(node, parent_href));
        }
        if self.tag(node) == Some("a") {
            let inner = self
                .descendants(node)
                .into_iter()
                .find(|n| self.is_media(*n))?;
            let href = self.attr(node, "href").map(String::from);
            return Some(self.view_of_media(inner, href));
        }
        None
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).is_some_and(|el| el.attached)
    }
}
