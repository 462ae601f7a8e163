//! Collect elements matched by an evaluator under a root.

use sift_dom::{Document, NodeId};

use crate::evaluator::Evaluator;
use crate::traverse::{self, FilterResult, NodeFilter, NodeVisitor};

/// All elements under `root` (inclusive) matching `eval`, in document
/// order.
pub fn collect(eval: &dyn Evaluator, doc: &Document, root: NodeId) -> Vec<NodeId> {
    let mut accumulator = Accumulator {
        eval,
        root,
        found: Vec::new(),
    };
    traverse::traverse(&mut accumulator, doc, root);
    accumulator.found
}

struct Accumulator<'a> {
    eval: &'a dyn Evaluator,
    root: NodeId,
    found: Vec<NodeId>,
}

impl NodeVisitor for Accumulator<'_> {
    fn head(&mut self, doc: &Document, node: NodeId, _depth: usize) {
        if doc.is_element(node) && self.eval.matches(doc, self.root, node) {
            self.found.push(node);
        }
    }
}

/// The first element under `root` (inclusive) matching `eval`, walking
/// in document order and stopping at the first hit.
pub fn find_first(eval: &dyn Evaluator, doc: &Document, root: NodeId) -> Option<NodeId> {
    find_first_from(eval, doc, root, root)
}

/// Like [`find_first`], but the walk starts at `start` while `eval`
/// still sees `eval_root` as its root. Used by `:has(...)`, whose inner
/// query is evaluated relative to the outer candidate.
pub fn find_first_from(
    eval: &dyn Evaluator,
    doc: &Document,
    eval_root: NodeId,
    start: NodeId,
) -> Option<NodeId> {
    let mut finder = FirstFinder {
        eval,
        root: eval_root,
        found: None,
    };
    traverse::filter(&mut finder, doc, start);
    finder.found
}

struct FirstFinder<'a> {
    eval: &'a dyn Evaluator,
    root: NodeId,
    found: Option<NodeId>,
}

impl NodeFilter for FirstFinder<'_> {
    fn head(&mut self, doc: &Document, node: NodeId, _depth: usize) -> FilterResult {
        if doc.is_element(node) && self.eval.matches(doc, self.root, node) {
            self.found = Some(node);
            return FilterResult::Stop;
        }
        FilterResult::Continue
    }
}
