//! Node storage
//!
//! A node is parent/sibling/child links plus a [`NodeData`] payload.
//! Links use the `NodeId::NONE` sentinel instead of `Option` to keep the
//! struct compact, matching the arena layout.

use crate::NodeId;

/// A single tree node.
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or the document node).
    pub parent: NodeId,
    /// First child.
    pub first_child: NodeId,
    /// Last child (for O(1) append).
    pub last_child: NodeId,
    /// Previous sibling.
    pub prev_sibling: NodeId,
    /// Next sibling.
    pub next_sibling: NodeId,
    /// Node-specific payload.
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Check if this is an element.
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Get element data if this is an element.
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data.
#[derive(Debug)]
pub enum NodeData {
    /// Document root (node 0; never an element).
    Document,
    /// DOCTYPE declaration.
    Doctype { name: String },
    /// Element.
    Element(ElementData),
    /// Text content.
    Text(String),
    /// Comment.
    Comment(String),
    /// Data node: raw contents of script/style elements.
    Data(String),
    /// XML declaration.
    XmlDecl(String),
}

/// Element-specific data.
#[derive(Debug)]
pub struct ElementData {
    /// Tag name (as written plus normalized form).
    pub name: TagName,
    /// Attributes, in insertion order.
    pub attrs: Vec<Attribute>,
    /// Set on pseudo elements created by the `:matchText` prepare pass.
    pub pseudo: bool,
}

impl ElementData {
    pub fn new(name: TagName) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            pseudo: false,
        }
    }

    /// Get an attribute value by case-insensitive key.
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(key))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing any existing value under the same key.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        for attr in self.attrs.iter_mut() {
            if attr.name.eq_ignore_ascii_case(key) {
                attr.value = value.to_string();
                return;
            }
        }
        self.attrs.push(Attribute {
            name: key.to_string(),
            value: value.to_string(),
        });
    }
}

/// An element attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Tag name, carrying both the name as written and its normalized
/// (lowercased) form. Tag equality for of-type selectors is by the
/// normalized name.
#[derive(Debug, Clone)]
pub struct TagName {
    name: String,
    normal: String,
    block: bool,
}

// Tags that introduce a text boundary in normalized text output.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "div", "dl", "dt", "fieldset",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "html", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tbody", "td", "th", "thead", "tr", "ul",
];

impl TagName {
    pub fn new(name: &str) -> Self {
        let normal = name.trim().to_ascii_lowercase();
        let block = BLOCK_TAGS.binary_search(&normal.as_str()).is_ok();
        Self {
            name: name.to_string(),
            normal,
            block,
        }
    }

    /// Tag name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized (lowercased, trimmed) tag name.
    pub fn normal(&self) -> &str {
        &self.normal
    }

    /// Whether this is a block-level tag.
    pub fn is_block(&self) -> bool {
        self.block
    }
}

impl PartialEq for TagName {
    fn eq(&self, other: &Self) -> bool {
        self.normal == other.normal
    }
}

impl Eq for TagName {}
