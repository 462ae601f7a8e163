//! Boolean composition of evaluators: And / Or.

use std::fmt;

use sift_dom::{Document, NodeId};

use crate::evaluator::Evaluator;

/// Matches iff every sub-evaluator matches.
///
/// Evaluation runs in reverse insertion order (last-added first): the
/// rightmost simple selector is usually the most selective, so it is
/// tried before the structural wrappers to its left.
#[derive(Debug)]
pub struct And {
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl And {
    pub fn new(evaluators: Vec<Box<dyn Evaluator>>) -> Self {
        Self { evaluators }
    }

    pub fn pair(left: Box<dyn Evaluator>, right: Box<dyn Evaluator>) -> Self {
        Self {
            evaluators: vec![left, right],
        }
    }

    /// Collapse a conjunction: a single evaluator stays bare, more than
    /// one gets wrapped.
    pub fn flatten(mut evaluators: Vec<Box<dyn Evaluator>>) -> Box<dyn Evaluator> {
        if evaluators.len() == 1 {
            evaluators.remove(0)
        } else {
            Box::new(And::new(evaluators))
        }
    }
}

impl Evaluator for And {
    fn matches(&self, doc: &Document, root: NodeId, element: NodeId) -> bool {
        self.evaluators
            .iter()
            .rev()
            .all(|e| e.matches(doc, root, element))
    }

    fn wants_text_prepare(&self) -> bool {
        self.evaluators.iter().any(|e| e.wants_text_prepare())
    }
}

impl fmt::Display for And {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.evaluators {
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

/// Matches iff any sub-evaluator matches, short-circuiting on the first
/// hit.
#[derive(Debug)]
pub struct Or {
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl Or {
    /// Create a new Or. More than one initial evaluator is wrapped into
    /// an implicit And forming the first branch.
    pub fn new(initial: Vec<Box<dyn Evaluator>>) -> Self {
        let evaluators = if initial.len() > 1 {
            vec![Box::new(And::new(initial)) as Box<dyn Evaluator>]
        } else {
            initial
        };
        Self { evaluators }
    }

    /// Append a branch.
    pub fn add(&mut self, evaluator: Box<dyn Evaluator>) {
        self.evaluators.push(evaluator);
    }
}

impl Evaluator for Or {
    fn matches(&self, doc: &Document, root: NodeId, element: NodeId) -> bool {
        self.evaluators
            .iter()
            .any(|e| e.matches(doc, root, element))
    }

    fn wants_text_prepare(&self) -> bool {
        self.evaluators.iter().any(|e| e.wants_text_prepare())
    }
}

impl fmt::Display for Or {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.evaluators {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{e}")?;
            first = false;
        }
        Ok(())
    }
}
