//! Entry points: run a selector against a document tree.

use std::collections::HashSet;

use sift_dom::{Document, NodeId};

use crate::collector;
use crate::error::SelectorError;
use crate::parser::Query;
use crate::traverse::{self, NodeVisitor};

/// Elements under `root` (inclusive) matching the query, in document
/// order.
pub fn select(query: &str, doc: &Document, root: NodeId) -> Result<Vec<NodeId>, SelectorError> {
    let query = Query::parse(query)?;
    Ok(select_with(&query, doc, root))
}

/// Run a pre-compiled query. Compile once with [`Query::parse`] when
/// matching the same selector against many trees.
pub fn select_with(query: &Query, doc: &Document, root: NodeId) -> Vec<NodeId> {
    collector::collect(query.evaluator(), doc, root)
}

/// The first matching element under `root` (inclusive), short-circuiting
/// the walk on the first hit.
pub fn select_first(
    query: &str,
    doc: &Document,
    root: NodeId,
) -> Result<Option<NodeId>, SelectorError> {
    let query = Query::parse(query)?;
    Ok(collector::find_first(query.evaluator(), doc, root))
}

/// Run a query under several roots, combining the results. An element
/// reachable from more than one root appears once, at its first
/// encounter.
pub fn select_roots(
    query: &str,
    doc: &Document,
    roots: &[NodeId],
) -> Result<Vec<NodeId>, SelectorError> {
    let query = Query::parse(query)?;
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut out = Vec::new();
    for &root in roots {
        for found in select_with(&query, doc, root) {
            if seen.insert(found) {
                out.push(found);
            }
        }
    }
    Ok(out)
}

/// Prepare a tree for `:matchText` queries: every direct text child of a
/// (non-pseudo) element under `root` is wrapped in a pseudo element that
/// mirrors the parent's tag and attributes, so text runs become
/// selectable elements. Idempotent; text already inside a pseudo element
/// is left alone.
///
/// Run this before matching any query for which
/// [`Query::needs_text_prepare`] is true.
pub fn prepare_match_text(doc: &mut Document, root: NodeId) {
    let mut finder = TextRunFinder { runs: Vec::new() };
    traverse::traverse(&mut finder, doc, root);
    for (parent, text) in finder.runs {
        let pseudo = doc.create_pseudo_element(parent);
        doc.replace_with(text, pseudo);
        doc.append_child(pseudo, text);
    }
}

struct TextRunFinder {
    runs: Vec<(NodeId, NodeId)>,
}

impl NodeVisitor for TextRunFinder {
    fn head(&mut self, doc: &Document, node: NodeId, _depth: usize) {
        if !doc.is_element(node) || doc.is_pseudo_element(node) {
            return;
        }
        for child in doc.child_nodes(node) {
            if doc.get(child).is_some_and(|n| n.as_text().is_some()) {
                self.runs.push((node, child));
            }
        }
    }
}
