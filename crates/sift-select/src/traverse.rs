//! Depth-first tree traversal: visitor and filter walks.
//!
//! Both walks are iterative over the arena's sibling/parent links, so
//! traversal depth is not bounded by the call stack. Depth is 0 at the
//! starting node.

use sift_dom::{Document, NodeId};

/// Visitor callbacks for a full depth-first walk.
pub trait NodeVisitor {
    /// Called when a node is first seen, before its children.
    fn head(&mut self, doc: &Document, node: NodeId, depth: usize);

    /// Called after all of the node's descendants have been visited.
    fn tail(&mut self, _doc: &Document, _node: NodeId, _depth: usize) {}
}

/// Filter decision for [`filter`] / [`filter_mut`] walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// Continue processing the tree.
    Continue,
    /// Skip the child nodes, but still call tail.
    SkipChildren,
    /// Skip the subtree: no children, no tail.
    SkipEntirely,
    /// Detach the node and its children (honored by [`filter_mut`] only).
    Remove,
    /// Abort the whole traversal.
    Stop,
}

/// Filter callbacks; each return value steers the walk.
pub trait NodeFilter {
    /// Called when a node is first visited.
    fn head(&mut self, doc: &Document, node: NodeId, depth: usize) -> FilterResult;

    /// Called when a node is last visited, after its descendants.
    fn tail(&mut self, _doc: &Document, _node: NodeId, _depth: usize) -> FilterResult {
        FilterResult::Continue
    }
}

/// Visit `root` and every descendant: heads in pre-order, tails in
/// post-order, siblings in document order.
pub fn traverse<V: NodeVisitor + ?Sized>(visitor: &mut V, doc: &Document, root: NodeId) {
    let mut node = root;
    let mut depth = 0usize;
    loop {
        visitor.head(doc, node, depth);
        let first_child = doc.get(node).map_or(NodeId::NONE, |n| n.first_child);
        if !first_child.is_none() {
            node = first_child;
            depth += 1;
            continue;
        }
        // leaf: emit tails while climbing until a next sibling exists
        loop {
            visitor.tail(doc, node, depth);
            if node == root {
                return;
            }
            let n = doc.get(node).expect("traversal node must exist");
            if !n.next_sibling.is_none() {
                node = n.next_sibling;
                break;
            }
            node = n.parent;
            depth -= 1;
        }
    }
}

/// Filtered depth-first walk. `Remove` is not honored here (the tree is
/// borrowed immutably) and is treated as `SkipEntirely`; use
/// [`filter_mut`] when detaching is wanted. Returns `Stop` if the walk
/// was aborted, `Continue` otherwise.
pub fn filter<F: NodeFilter + ?Sized>(f: &mut F, doc: &Document, root: NodeId) -> FilterResult {
    let mut node = root;
    let mut depth = 0usize;
    loop {
        let mut result = f.head(doc, node, depth);
        if result == FilterResult::Stop {
            return FilterResult::Stop;
        }
        if result == FilterResult::Continue {
            let first_child = doc.get(node).map_or(NodeId::NONE, |n| n.first_child);
            if !first_child.is_none() {
                node = first_child;
                depth += 1;
                continue;
            }
        }
        // climb: tails (unless the node was skipped entirely), then
        // sibling or parent
        loop {
            if !matches!(result, FilterResult::SkipEntirely | FilterResult::Remove)
                && f.tail(doc, node, depth) == FilterResult::Stop
            {
                return FilterResult::Stop;
            }
            if node == root {
                return FilterResult::Continue;
            }
            let n = doc.get(node).expect("traversal node must exist");
            if !n.next_sibling.is_none() {
                node = n.next_sibling;
                break;
            }
            node = n.parent;
            depth -= 1;
            result = FilterResult::Continue;
        }
    }
}

/// Like [`filter`], but `Remove` from a head callback detaches the node
/// (and its subtree) from the document before the walk moves on. A
/// removed node gets no tail call. `Remove` for the walk root itself is
/// treated as `SkipEntirely`.
pub fn filter_mut<F: NodeFilter + ?Sized>(
    f: &mut F,
    doc: &mut Document,
    root: NodeId,
) -> FilterResult {
    let mut node = root;
    let mut depth = 0usize;
    loop {
        let result = f.head(doc, node, depth);
        if result == FilterResult::Stop {
            return FilterResult::Stop;
        }
        if result == FilterResult::Remove && node != root {
            let (next, parent) = {
                let n = doc.get(node).expect("traversal node must exist");
                (n.next_sibling, n.parent)
            };
            doc.detach(node);
            if !next.is_none() {
                node = next;
                continue;
            }
            // was the last child: tail the parent chain
            node = parent;
            depth -= 1;
            loop {
                if f.tail(doc, node, depth) == FilterResult::Stop {
                    return FilterResult::Stop;
                }
                if node == root {
                    return FilterResult::Continue;
                }
                let n = doc.get(node).expect("traversal node must exist");
                if !n.next_sibling.is_none() {
                    node = n.next_sibling;
                    break;
                }
                node = n.parent;
                depth -= 1;
            }
            continue;
        }
        if result == FilterResult::Continue {
            let first_child = doc.get(node).map_or(NodeId::NONE, |n| n.first_child);
            if !first_child.is_none() {
                node = first_child;
                depth += 1;
                continue;
            }
        }
        let skip_tail = matches!(result, FilterResult::SkipEntirely | FilterResult::Remove);
        let mut first = true;
        loop {
            if !(first && skip_tail) && f.tail(doc, node, depth) == FilterResult::Stop {
                return FilterResult::Stop;
            }
            first = false;
            if node == root {
                return FilterResult::Continue;
            }
            let n = doc.get(node).expect("traversal node must exist");
            if !n.next_sibling.is_none() {
                node = n.next_sibling;
                break;
            }
            node = n.parent;
            depth -= 1;
        }
    }
}
