//! sift select - CSS-like selector query engine
//!
//! Parses a textual selector (e.g. `div.header > p:nth-child(2)`) into an
//! executable predicate tree, then evaluates it against a [`sift_dom`]
//! document to produce the matching elements in document order.
//!
//! Entry points live in [`selector`]: [`selector::select`],
//! [`selector::select_first`], [`selector::select_roots`], and
//! [`Query::parse`] for callers that want to reuse a compiled query.

mod collector;
mod combining;
mod error;
mod evaluator;
mod parser;
pub mod selector;
mod structural;
mod token_queue;
pub mod traverse;

pub use collector::{collect, find_first};
pub use combining::{And, Or};
pub use error::SelectorError;
pub use evaluator::Evaluator;
pub use parser::Query;
pub use selector::{prepare_match_text, select, select_first, select_roots, select_with};
pub use traverse::{FilterResult, NodeFilter, NodeVisitor};
