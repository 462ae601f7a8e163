//! sift DOM - ordered, rooted document tree
//!
//! Arena-backed node storage: nodes live in a `Vec` owned by [`Document`]
//! and are addressed by [`NodeId`] handles. The tree exposes the
//! capability set the selector engine queries against: tag identity,
//! case-insensitive attributes, class tokens, sibling indexes, and the
//! text accessors (combined, own, whole, data).

mod document;
mod node;
pub mod strings;

pub use document::{ChildNodes, Children, Document};
pub use node::{Attribute, ElementData, Node, NodeData, TagName};

/// Node identifier (index into the document arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node" (absent parent, sibling, or child).
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// True if this is the [`NodeId::NONE`] sentinel.
    #[inline]
    pub fn is_none(self) -> bool {
        self == NodeId::NONE
    }

    /// Convert the sentinel representation to an `Option`.
    #[inline]
    pub fn checked(self) -> Option<NodeId> {
        if self.is_none() { None } else { Some(self) }
    }
}
