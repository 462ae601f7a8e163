//! Structural evaluators: wrap an inner evaluator and test it against a
//! related node (ancestor, sibling, descendant) instead of the candidate
//! itself.

use std::fmt;

use sift_dom::{Document, NodeId};

use crate::collector;
use crate::evaluator::Evaluator;

/// Matches only the evaluation root itself. The implicit left-hand side
/// of a query that starts with a combinator.
#[derive(Debug)]
pub struct Root;

impl Evaluator for Root {
    fn matches(&self, _doc: &Document, root: NodeId, element: NodeId) -> bool {
        root == element
    }
}

impl fmt::Display for Root {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

/// `:has(inner)`: some proper descendant of the candidate matches
/// `inner`. Descendants are searched depth-first from each element
/// child, short-circuiting on the first hit; the inner evaluation root
/// is the candidate itself, not the child.
#[derive(Debug)]
pub struct Has {
    inner: Box<dyn Evaluator>,
}

impl Has {
    pub fn new(inner: Box<dyn Evaluator>) -> Self {
        Self { inner }
    }
}

impl Evaluator for Has {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        doc.children(element)
            .any(|child| collector::find_first_from(&*self.inner, doc, element, child).is_some())
    }

    fn wants_text_prepare(&self) -> bool {
        self.inner.wants_text_prepare()
    }
}

impl fmt::Display for Has {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":has({})", self.inner)
    }
}

/// `:not(inner)`: negation of the inner evaluator.
#[derive(Debug)]
pub struct Not {
    inner: Box<dyn Evaluator>,
}

impl Not {
    pub fn new(inner: Box<dyn Evaluator>) -> Self {
        Self { inner }
    }
}

impl Evaluator for Not {
    fn matches(&self, doc: &Document, root: NodeId, element: NodeId) -> bool {
        !self.inner.matches(doc, root, element)
    }

    fn wants_text_prepare(&self) -> bool {
        self.inner.wants_text_prepare()
    }
}

impl fmt::Display for Not {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":not({})", self.inner)
    }
}

/// Ancestor combinator (`ancestor descendant`): some ancestor of the
/// candidate matches `inner`. The walk tests the evaluation root if
/// reached, then stops; the root itself never matches.
#[derive(Debug)]
pub struct Parent {
    inner: Box<dyn Evaluator>,
}

impl Parent {
    pub fn new(inner: Box<dyn Evaluator>) -> Self {
        Self { inner }
    }
}

impl Evaluator for Parent {
    fn matches(&self, doc: &Document, root: NodeId, element: NodeId) -> bool {
        if root == element {
            return false;
        }
        let mut parent = doc.parent(element);
        while let Some(p) = parent {
            // the evaluation root is a valid ancestor even when it is the
            // document node (Root matches by identity, not element state)
            if (doc.is_element(p) || p == root) && self.inner.matches(doc, root, p) {
                return true;
            }
            if p == root {
                break;
            }
            parent = doc.parent(p);
        }
        false
    }

    fn wants_text_prepare(&self) -> bool {
        self.inner.wants_text_prepare()
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.inner)
    }
}

/// Child combinator (`parent > child`): the candidate's direct parent
/// matches `inner`.
#[derive(Debug)]
pub struct ImmediateParent {
    inner: Box<dyn Evaluator>,
}

impl ImmediateParent {
    pub fn new(inner: Box<dyn Evaluator>) -> Self {
        Self { inner }
    }
}

impl Evaluator for ImmediateParent {
    fn matches(&self, doc: &Document, root: NodeId, element: NodeId) -> bool {
        if root == element {
            return false;
        }
        doc.parent(element)
            .is_some_and(|p| (doc.is_element(p) || p == root) && self.inner.matches(doc, root, p))
    }

    fn wants_text_prepare(&self) -> bool {
        self.inner.wants_text_prepare()
    }
}

impl fmt::Display for ImmediateParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > ", self.inner)
    }
}

/// General sibling combinator (`a ~ b`): some preceding element sibling
/// matches `inner`.
#[derive(Debug)]
pub struct PreviousSibling {
    inner: Box<dyn Evaluator>,
}

impl PreviousSibling {
    pub fn new(inner: Box<dyn Evaluator>) -> Self {
        Self { inner }
    }
}

impl Evaluator for PreviousSibling {
    fn matches(&self, doc: &Document, root: NodeId, element: NodeId) -> bool {
        if root == element {
            return false;
        }
        let mut prev = doc.prev_element_sibling(element);
        while let Some(p) = prev {
            if self.inner.matches(doc, root, p) {
                return true;
            }
            prev = doc.prev_element_sibling(p);
        }
        false
    }

    fn wants_text_prepare(&self) -> bool {
        self.inner.wants_text_prepare()
    }
}

impl fmt::Display for PreviousSibling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ ", self.inner)
    }
}

/// Adjacent sibling combinator (`a + b`): the immediately preceding
/// element sibling matches `inner`.
#[derive(Debug)]
pub struct ImmediatePreviousSibling {
    inner: Box<dyn Evaluator>,
}

impl ImmediatePreviousSibling {
    pub fn new(inner: Box<dyn Evaluator>) -> Self {
        Self { inner }
    }
}

impl Evaluator for ImmediatePreviousSibling {
    fn matches(&self, doc: &Document, root: NodeId, element: NodeId) -> bool {
        if root == element {
            return false;
        }
        doc.prev_element_sibling(element)
            .is_some_and(|p| self.inner.matches(doc, root, p))
    }

    fn wants_text_prepare(&self) -> bool {
        self.inner.wants_text_prepare()
    }
}

impl fmt::Display for ImmediatePreviousSibling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + ", self.inner)
    }
}
