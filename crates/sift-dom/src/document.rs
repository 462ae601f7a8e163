//! Document arena
//!
//! Owns every node in one `Vec`; structural links are `NodeId` handles.
//! Node 0 is always the synthetic document node. Detached nodes stay in
//! the arena but are unreachable from the document node.

use crate::node::{Attribute, ElementData, Node, NodeData, TagName};
use crate::{NodeId, strings};

const NO_ATTRS: &[Attribute] = &[];

/// An in-memory, ordered, rooted tree of nodes.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new document holding only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    /// The synthetic document node (always id 0).
    #[inline]
    pub fn document_node(&self) -> NodeId {
        NodeId(0)
    }

    /// The document's root element: its first element child, if any.
    pub fn root_element(&self) -> Option<NodeId> {
        self.first_element_child(self.document_node())
    }

    /// Get a node by id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// Number of nodes ever allocated (including detached ones).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // --- construction ---

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(TagName::new(name))))
    }

    /// Create a detached element with attributes.
    pub fn create_element_with(&mut self, name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut el = ElementData::new(TagName::new(name));
        for (k, v) in attrs {
            el.set_attr(k, v);
        }
        self.push(NodeData::Element(el))
    }

    /// Create a detached pseudo element mirroring the tag name and
    /// attributes of `like`. Used by the `:matchText` prepare pass.
    pub fn create_pseudo_element(&mut self, like: NodeId) -> NodeId {
        let src = self
            .node(like)
            .as_element()
            .expect("pseudo element source must be an element");
        let mut el = ElementData::new(src.name.clone());
        el.attrs = src.attrs.clone();
        el.pseudo = true;
        self.push(NodeData::Element(el))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Text(content.to_string()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Comment(content.to_string()))
    }

    /// Create a detached data node (script/style contents).
    pub fn create_data(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Data(content.to_string()))
    }

    /// Create a detached DOCTYPE node.
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(NodeData::Doctype {
            name: name.to_string(),
        })
    }

    /// Create a detached XML declaration node.
    pub fn create_xml_decl(&mut self, content: &str) -> NodeId {
        self.push(NodeData::XmlDecl(content.to_string()))
    }

    /// Set an attribute on an element.
    pub fn set_attr(&mut self, id: NodeId, key: &str, value: &str) {
        if let NodeData::Element(el) = &mut self.node_mut(id).data {
            el.set_attr(key, value);
        }
    }

    // --- mutation ---

    /// Unlink a node from its parent and siblings. The node and its
    /// subtree stay allocated but become unreachable from the document.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let n = self.node(id);
            (n.parent, n.prev_sibling, n.next_sibling)
        };
        if !prev.is_none() {
            self.node_mut(prev).next_sibling = next;
        } else if !parent.is_none() {
            self.node_mut(parent).first_child = next;
        }
        if !next.is_none() {
            self.node_mut(next).prev_sibling = prev;
        } else if !parent.is_none() {
            self.node_mut(parent).last_child = prev;
        }
        let n = self.node_mut(id);
        n.parent = NodeId::NONE;
        n.prev_sibling = NodeId::NONE;
        n.next_sibling = NodeId::NONE;
    }

    /// Append `child` as the last child of `parent`, detaching it from
    /// any previous position first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.node(parent).last_child;
        {
            let c = self.node_mut(child);
            c.parent = parent;
            c.prev_sibling = last;
        }
        if last.is_none() {
            self.node_mut(parent).first_child = child;
        } else {
            self.node_mut(last).next_sibling = child;
        }
        self.node_mut(parent).last_child = child;
    }

    /// Replace `old` with `new` in the tree; `old` ends up detached.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) {
        self.detach(new);
        let (parent, prev, next) = {
            let n = self.node(old);
            (n.parent, n.prev_sibling, n.next_sibling)
        };
        {
            let n = self.node_mut(new);
            n.parent = parent;
            n.prev_sibling = prev;
            n.next_sibling = next;
        }
        if !prev.is_none() {
            self.node_mut(prev).next_sibling = new;
        } else if !parent.is_none() {
            self.node_mut(parent).first_child = new;
        }
        if !next.is_none() {
            self.node_mut(next).prev_sibling = new;
        } else if !parent.is_none() {
            self.node_mut(parent).last_child = new;
        }
        let o = self.node_mut(old);
        o.parent = NodeId::NONE;
        o.prev_sibling = NodeId::NONE;
        o.next_sibling = NodeId::NONE;
    }

    // --- structure queries ---

    /// Is this node an element?
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// Is this node the synthetic document node?
    pub fn is_document(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Document))
    }

    /// Is this element a pseudo element from the `:matchText` pass?
    pub fn is_pseudo_element(&self, id: NodeId) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|e| e.pseudo)
    }

    /// Normalized tag name; empty for non-elements.
    pub fn normal_name(&self, id: NodeId) -> &str {
        self.get(id)
            .and_then(Node::as_element)
            .map_or("", |e| e.name.normal())
    }

    /// Tag identity: same normalized name.
    pub fn tag_eq(&self, a: NodeId, b: NodeId) -> bool {
        match (
            self.get(a).and_then(Node::as_element),
            self.get(b).and_then(Node::as_element),
        ) {
            (Some(ea), Some(eb)) => ea.name == eb.name,
            _ => false,
        }
    }

    /// Parent node, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent.checked()
    }

    /// All child nodes, in order.
    pub fn child_nodes(&self, id: NodeId) -> ChildNodes<'_> {
        ChildNodes {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    /// Element children, in order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            inner: self.child_nodes(id),
        }
    }

    /// Number of element children.
    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// First element child, if any.
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).next()
    }

    /// 0-based position among element siblings. 0 when detached.
    pub fn element_sibling_index(&self, id: NodeId) -> usize {
        let mut index = 0;
        let mut prev = self.node(id).prev_sibling;
        while !prev.is_none() {
            if self.node(prev).is_element() {
                index += 1;
            }
            prev = self.node(prev).prev_sibling;
        }
        index
    }

    /// Nearest preceding element sibling.
    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut prev = self.node(id).prev_sibling;
        while !prev.is_none() {
            if self.node(prev).is_element() {
                return Some(prev);
            }
            prev = self.node(prev).prev_sibling;
        }
        None
    }

    /// Nearest following element sibling.
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut next = self.node(id).next_sibling;
        while !next.is_none() {
            if self.node(next).is_element() {
                return Some(next);
            }
            next = self.node(next).next_sibling;
        }
        None
    }

    // --- attributes and classes ---

    /// Attribute value by case-insensitive key; `""` when absent.
    pub fn attr(&self, id: NodeId, key: &str) -> &str {
        self.get(id)
            .and_then(Node::as_element)
            .and_then(|e| e.get_attr(key))
            .unwrap_or("")
    }

    /// Whether the attribute is present (distinct from present-but-empty).
    pub fn has_attr(&self, id: NodeId, key: &str) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|e| e.get_attr(key).is_some())
    }

    /// All attributes of an element, in insertion order.
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        self.get(id)
            .and_then(Node::as_element)
            .map_or(NO_ATTRS, |e| &e.attrs)
    }

    /// The element's `id` attribute, or `""`.
    pub fn id_attr(&self, id: NodeId) -> &str {
        self.attr(id, "id")
    }

    /// Class token membership, ASCII case-insensitive.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case(class))
    }

    // --- text accessors ---

    /// Whitespace-normalized combined text of the subtree, trimmed.
    /// Block and `br` boundaries contribute a single space.
    pub fn text(&self, id: NodeId) -> String {
        let mut accum = String::new();
        self.append_text(id, &mut accum);
        accum.trim().to_string()
    }

    fn append_text(&self, id: NodeId, accum: &mut String) {
        let mut child = self.node(id).first_child;
        while !child.is_none() {
            let node = self.node(child);
            match &node.data {
                NodeData::Text(t) => {
                    let after_space = accum.ends_with(' ');
                    strings::append_normalised_whitespace(accum, t, after_space);
                }
                NodeData::Element(el) => {
                    if (el.name.is_block() || el.name.normal() == "br")
                        && !accum.is_empty()
                        && !accum.ends_with(' ')
                    {
                        accum.push(' ');
                    }
                    self.append_text(child, accum);
                    // keep "<div>One</div>Two" as "One Two"
                    if el.name.is_block()
                        && !accum.ends_with(' ')
                        && self
                            .get(node.next_sibling)
                            .is_some_and(|n| n.as_text().is_some())
                    {
                        accum.push(' ');
                    }
                }
                _ => {}
            }
            child = node.next_sibling;
        }
    }

    /// Whitespace-normalized text of direct text children only, trimmed.
    pub fn own_text(&self, id: NodeId) -> String {
        let mut accum = String::new();
        for child in self.child_nodes(id) {
            match &self.node(child).data {
                NodeData::Text(t) => {
                    let after_space = accum.ends_with(' ');
                    strings::append_normalised_whitespace(&mut accum, t, after_space);
                }
                NodeData::Element(el) if el.name.normal() == "br" => {
                    if !accum.ends_with(' ') {
                        accum.push(' ');
                    }
                }
                _ => {}
            }
        }
        accum.trim().to_string()
    }

    /// Raw, non-normalized concatenation of all descendant text; `br`
    /// elements contribute a newline.
    pub fn whole_text(&self, id: NodeId) -> String {
        let mut accum = String::new();
        self.append_whole_text(id, &mut accum);
        accum
    }

    fn append_whole_text(&self, id: NodeId, accum: &mut String) {
        for child in self.child_nodes(id) {
            match &self.node(child).data {
                NodeData::Text(t) => accum.push_str(t),
                NodeData::Element(el) => {
                    if el.name.normal() == "br" {
                        accum.push('\n');
                    }
                    self.append_whole_text(child, accum);
                }
                _ => {}
            }
        }
    }

    /// Raw text of direct text children only.
    pub fn whole_own_text(&self, id: NodeId) -> String {
        let mut accum = String::new();
        for child in self.child_nodes(id) {
            match &self.node(child).data {
                NodeData::Text(t) => accum.push_str(t),
                NodeData::Element(el) if el.name.normal() == "br" => accum.push('\n'),
                _ => {}
            }
        }
        accum
    }

    /// Combined data of the subtree: data-node (script/style) and
    /// comment contents. Not whitespace-normalized.
    pub fn data(&self, id: NodeId) -> String {
        let mut accum = String::new();
        self.append_data(id, &mut accum);
        accum
    }

    fn append_data(&self, id: NodeId, accum: &mut String) {
        for child in self.child_nodes(id) {
            match &self.node(child).data {
                NodeData::Data(d) => accum.push_str(d),
                NodeData::Comment(c) => accum.push_str(c),
                NodeData::Element(_) => self.append_data(child, accum),
                _ => {}
            }
        }
    }
}

/// Iterator over every child node of a node.
pub struct ChildNodes<'a> {
    doc: &'a Document,
    next: NodeId,
}

impl Iterator for ChildNodes<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next.checked()?;
        self.next = self.doc.node(id).next_sibling;
        Some(id)
    }
}

/// Iterator over the element children of a node.
pub struct Children<'a> {
    inner: ChildNodes<'a>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let doc = self.inner.doc;
        self.inner.find(|&id| doc.node(id).is_element())
    }
}
