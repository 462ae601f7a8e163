//! Leaf evaluators: predicates testing one element in isolation or
//! relative to the evaluation root.
//!
//! Literal attribute/text predicates fold case; regex predicates are
//! case-sensitive as written. That asymmetry is part of the query
//! language, not an accident.

use std::fmt;

use regex::Regex;
use sift_dom::{Document, NodeData, NodeId, strings};

use crate::error::SelectorError;

/// A compiled predicate over `(root, element)`.
///
/// Evaluator trees are built once by the parser, hold no reference to any
/// document, and are reusable against any number of trees.
pub trait Evaluator: fmt::Debug + fmt::Display {
    /// Test if the element meets this evaluator's requirements.
    fn matches(&self, doc: &Document, root: NodeId, element: NodeId) -> bool;

    /// True if matching this evaluator needs the `:matchText` prepare
    /// pass to have run over the target tree first.
    fn wants_text_prepare(&self) -> bool {
        false
    }
}

fn validate_not_empty(value: &str, what: &str) -> Result<(), SelectorError> {
    if value.trim().is_empty() {
        Err(SelectorError::invalid(format!("{what} must not be empty")))
    } else {
        Ok(())
    }
}

/// Strip one set of surrounding quotes, if present.
fn strip_quotes(value: &str) -> (&str, bool) {
    let quoted = value.len() >= 2
        && ((value.starts_with('\'') && value.ends_with('\''))
            || (value.starts_with('"') && value.ends_with('"')));
    if quoted {
        (&value[1..value.len() - 1], true)
    } else {
        (value, false)
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

// Shared constructor for the attribute key/value family.
fn attr_key_value(key: &str, value: &str, trim_value: bool) -> Result<(String, String), SelectorError> {
    validate_not_empty(key, "attribute key")?;
    validate_not_empty(value, "attribute value")?;
    let (value, quoted) = strip_quotes(value);
    let mut value = value.to_lowercase();
    if trim_value || !quoted {
        value = value.trim().to_string();
    }
    Ok((normalize_key(key), value))
}

/// Evaluator for tag name, e.g. `div`.
#[derive(Debug)]
pub struct Tag {
    name: String,
}

impl Tag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Evaluator for Tag {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        doc.normal_name(element) == self.name
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Evaluator for tag names ending with a suffix; backs the `*|name`
/// wildcard-namespace form (suffix `:name`).
#[derive(Debug)]
pub struct TagEndsWith {
    suffix: String,
}

impl TagEndsWith {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
        }
    }
}

impl Evaluator for TagEndsWith {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        doc.normal_name(element).ends_with(&self.suffix)
    }
}

impl fmt::Display for TagEndsWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix)
    }
}

/// Evaluator for element id, `#id`.
#[derive(Debug)]
pub struct Id {
    id: String,
}

impl Id {
    pub fn new(id: &str) -> Result<Self, SelectorError> {
        validate_not_empty(id, "id")?;
        Ok(Self { id: id.to_string() })
    }
}

impl Evaluator for Id {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        doc.id_attr(element) == self.id
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

/// Evaluator for element class, `.class`.
#[derive(Debug)]
pub struct Class {
    class: String,
}

impl Class {
    pub fn new(class: &str) -> Result<Self, SelectorError> {
        validate_not_empty(class, "class name")?;
        Ok(Self {
            class: class.trim().to_string(),
        })
    }
}

impl Evaluator for Class {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        doc.has_class(element, &self.class)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.class)
    }
}

/// Evaluator for attribute presence, `[attr]`.
#[derive(Debug)]
pub struct Attribute {
    key: String,
}

impl Attribute {
    pub fn new(key: &str) -> Result<Self, SelectorError> {
        validate_not_empty(key, "attribute key")?;
        Ok(Self {
            key: normalize_key(key),
        })
    }
}

impl Evaluator for Attribute {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        doc.has_attr(element, &self.key)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.key)
    }
}

/// Evaluator for attribute key prefix, `[^prefix]`.
#[derive(Debug)]
pub struct AttributeStarting {
    key_prefix: String,
}

impl AttributeStarting {
    pub fn new(key_prefix: &str) -> Result<Self, SelectorError> {
        validate_not_empty(key_prefix, "attribute key prefix")?;
        Ok(Self {
            key_prefix: key_prefix.to_lowercase(),
        })
    }
}

impl Evaluator for AttributeStarting {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        doc.attributes(element)
            .iter()
            .any(|a| a.name.to_lowercase().starts_with(&self.key_prefix))
    }
}

impl fmt::Display for AttributeStarting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[^{}]", self.key_prefix)
    }
}

/// `[attr=val]`: present, value equal, case-insensitive, element value
/// trimmed.
#[derive(Debug)]
pub struct AttributeWithValue {
    key: String,
    value: String,
}

impl AttributeWithValue {
    pub fn new(key: &str, value: &str) -> Result<Self, SelectorError> {
        let (key, value) = attr_key_value(key, value, true)?;
        Ok(Self { key, value })
    }
}

impl Evaluator for AttributeWithValue {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        doc.has_attr(element, &self.key)
            && self
                .value
                .eq_ignore_ascii_case(doc.attr(element, &self.key).trim())
    }
}

impl fmt::Display for AttributeWithValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}={}]", self.key, self.value)
    }
}

/// `[attr!=val]`: value not equal, case-insensitive. Does not require the
/// attribute to be present (absent reads as the empty string).
#[derive(Debug)]
pub struct AttributeWithValueNot {
    key: String,
    value: String,
}

impl AttributeWithValueNot {
    pub fn new(key: &str, value: &str) -> Result<Self, SelectorError> {
        let (key, value) = attr_key_value(key, value, true)?;
        Ok(Self { key, value })
    }
}

impl Evaluator for AttributeWithValueNot {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        !self.value.eq_ignore_ascii_case(doc.attr(element, &self.key))
    }
}

impl fmt::Display for AttributeWithValueNot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}!={}]", self.key, self.value)
    }
}

macro_rules! attr_value_evaluator {
    ($name:ident, $op:literal, $trim:literal, $test:expr) => {
        #[derive(Debug)]
        pub struct $name {
            key: String,
            value: String,
        }

        impl $name {
            pub fn new(key: &str, value: &str) -> Result<Self, SelectorError> {
                let (key, value) = attr_key_value(key, value, $trim)?;
                Ok(Self { key, value })
            }
        }

        impl Evaluator for $name {
            fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
                let test: fn(&str, &str) -> bool = $test;
                doc.has_attr(element, &self.key)
                    && test(&doc.attr(element, &self.key).to_lowercase(), &self.value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "[{}{}{}]", self.key, $op, self.value)
            }
        }
    };
}

// `[attr^=val]` / `[attr$=val]` / `[attr*=val]`: present, lowercased
// value starts-with / ends-with / contains.
attr_value_evaluator!(AttributeWithValueStarting, "^=", false, |v, p| v.starts_with(p));
attr_value_evaluator!(AttributeWithValueEnding, "$=", false, |v, s| v.ends_with(s));
attr_value_evaluator!(AttributeWithValueContaining, "*=", true, |v, n| v.contains(n));

/// `[attr~=pattern]`: present and value matches the regex, case as
/// written.
#[derive(Debug)]
pub struct AttributeWithValueMatching {
    key: String,
    pattern: Regex,
}

impl AttributeWithValueMatching {
    pub fn new(key: &str, pattern: Regex) -> Result<Self, SelectorError> {
        validate_not_empty(key, "attribute key")?;
        Ok(Self {
            key: normalize_key(key),
            pattern,
        })
    }
}

impl Evaluator for AttributeWithValueMatching {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        doc.has_attr(element, &self.key) && self.pattern.is_match(doc.attr(element, &self.key))
    }
}

impl fmt::Display for AttributeWithValueMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}~={}]", self.key, self.pattern)
    }
}

/// The universal selector `*`.
#[derive(Debug)]
pub struct AllElements;

impl Evaluator for AllElements {
    fn matches(&self, _doc: &Document, _root: NodeId, _element: NodeId) -> bool {
        true
    }
}

impl fmt::Display for AllElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*")
    }
}

/// `:lt(n)`: 0-based sibling index less than n; never matches the
/// evaluation root itself.
#[derive(Debug)]
pub struct IndexLessThan {
    index: usize,
}

impl IndexLessThan {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Evaluator for IndexLessThan {
    fn matches(&self, doc: &Document, root: NodeId, element: NodeId) -> bool {
        root != element && doc.element_sibling_index(element) < self.index
    }
}

impl fmt::Display for IndexLessThan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":lt({})", self.index)
    }
}

/// `:gt(n)`: 0-based sibling index greater than n.
#[derive(Debug)]
pub struct IndexGreaterThan {
    index: usize,
}

impl IndexGreaterThan {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Evaluator for IndexGreaterThan {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        doc.element_sibling_index(element) > self.index
    }
}

impl fmt::Display for IndexGreaterThan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":gt({})", self.index)
    }
}

/// `:eq(n)`: 0-based sibling index equal to n.
#[derive(Debug)]
pub struct IndexEquals {
    index: usize,
}

impl IndexEquals {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Evaluator for IndexEquals {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        doc.element_sibling_index(element) == self.index
    }
}

impl fmt::Display for IndexEquals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":eq({})", self.index)
    }
}

/// Parent that exists and is a real element (not the document node).
fn element_parent(doc: &Document, element: NodeId) -> Option<NodeId> {
    doc.parent(element).filter(|&p| !doc.is_document(p))
}

/// `:first-child`.
#[derive(Debug)]
pub struct IsFirstChild;

impl Evaluator for IsFirstChild {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        element_parent(doc, element).is_some() && doc.element_sibling_index(element) == 0
    }
}

impl fmt::Display for IsFirstChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":first-child")
    }
}

/// `:last-child`.
#[derive(Debug)]
pub struct IsLastChild;

impl Evaluator for IsLastChild {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        match element_parent(doc, element) {
            Some(p) => doc.element_sibling_index(element) + 1 == doc.child_element_count(p),
            None => false,
        }
    }
}

impl fmt::Display for IsLastChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":last-child")
    }
}

/// `:only-child`.
#[derive(Debug)]
pub struct IsOnlyChild;

impl Evaluator for IsOnlyChild {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        match element_parent(doc, element) {
            Some(p) => doc.child_element_count(p) == 1,
            None => false,
        }
    }
}

impl fmt::Display for IsOnlyChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":only-child")
    }
}

/// `:only-of-type`.
#[derive(Debug)]
pub struct IsOnlyOfType;

impl Evaluator for IsOnlyOfType {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        match element_parent(doc, element) {
            Some(p) => {
                doc.children(p)
                    .filter(|&el| doc.tag_eq(el, element))
                    .count()
                    == 1
            }
            None => false,
        }
    }
}

impl fmt::Display for IsOnlyOfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":only-of-type")
    }
}

/// `:empty`: no child node other than comment, doctype, or xml
/// declaration.
#[derive(Debug)]
pub struct IsEmpty;

impl Evaluator for IsEmpty {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        doc.child_nodes(element).all(|n| {
            matches!(
                doc.get(n).map(|n| &n.data),
                Some(NodeData::Comment(_) | NodeData::Doctype { .. } | NodeData::XmlDecl(_))
            )
        })
    }
}

impl fmt::Display for IsEmpty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":empty")
    }
}

/// `:root`: the element is the document's root element. When the
/// evaluation root is the document node, that is its first element
/// child; otherwise the evaluation root itself.
#[derive(Debug)]
pub struct IsRoot;

impl Evaluator for IsRoot {
    fn matches(&self, doc: &Document, root: NodeId, element: NodeId) -> bool {
        let r = if doc.is_document(root) {
            doc.first_element_child(root)
        } else {
            Some(root)
        };
        r == Some(element)
    }
}

impl fmt::Display for IsRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":root")
    }
}

// --- nth family ---

/// The CSS An+B rule against a 1-based position.
fn nth_matches(a: i32, b: i32, pos: i32) -> bool {
    if a == 0 {
        return pos == b;
    }
    (pos - b) * a >= 0 && (pos - b) % a == 0
}

fn nth_child_pos(doc: &Document, element: NodeId) -> i32 {
    doc.element_sibling_index(element) as i32 + 1
}

fn nth_last_child_pos(doc: &Document, element: NodeId) -> i32 {
    match doc.parent(element) {
        Some(p) => (doc.child_element_count(p) - doc.element_sibling_index(element)) as i32,
        None => 0,
    }
}

/// Count of same-tag siblings up to and including the element.
fn nth_of_type_pos(doc: &Document, element: NodeId) -> i32 {
    let Some(p) = doc.parent(element) else {
        return 0;
    };
    let mut pos = 0;
    for el in doc.children(p) {
        if doc.tag_eq(el, element) {
            pos += 1;
        }
        if el == element {
            break;
        }
    }
    pos
}

/// Count of same-tag siblings from the element to the end, inclusive.
fn nth_last_of_type_pos(doc: &Document, element: NodeId) -> i32 {
    let Some(p) = doc.parent(element) else {
        return 0;
    };
    doc.children(p)
        .skip(doc.element_sibling_index(element))
        .filter(|&el| doc.tag_eq(el, element))
        .count() as i32
}

macro_rules! nth_evaluator {
    ($name:ident, $pseudo:literal, $pos:expr) => {
        #[derive(Debug)]
        pub struct $name {
            a: i32,
            b: i32,
        }

        impl $name {
            pub fn new(a: i32, b: i32) -> Self {
                Self { a, b }
            }
        }

        impl Evaluator for $name {
            fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
                if element_parent(doc, element).is_none() {
                    return false;
                }
                let pos: fn(&Document, NodeId) -> i32 = $pos;
                nth_matches(self.a, self.b, pos(doc, element))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.a == 0 {
                    write!(f, ":{}({})", $pseudo, self.b)
                } else if self.b == 0 {
                    write!(f, ":{}({}n)", $pseudo, self.a)
                } else {
                    write!(f, ":{}({}n{:+})", $pseudo, self.a, self.b)
                }
            }
        }
    };
}

nth_evaluator!(IsNthChild, "nth-child", nth_child_pos);
nth_evaluator!(IsNthLastChild, "nth-last-child", nth_last_child_pos);
nth_evaluator!(IsNthOfType, "nth-of-type", nth_of_type_pos);
nth_evaluator!(IsNthLastOfType, "nth-last-of-type", nth_last_of_type_pos);

/// `:first-of-type` (nth-of-type with a=0, b=1).
#[derive(Debug)]
pub struct IsFirstOfType(IsNthOfType);

impl IsFirstOfType {
    pub fn new() -> Self {
        Self(IsNthOfType::new(0, 1))
    }
}

impl Default for IsFirstOfType {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for IsFirstOfType {
    fn matches(&self, doc: &Document, root: NodeId, element: NodeId) -> bool {
        self.0.matches(doc, root, element)
    }
}

impl fmt::Display for IsFirstOfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":first-of-type")
    }
}

/// `:last-of-type` (nth-last-of-type with a=0, b=1).
#[derive(Debug)]
pub struct IsLastOfType(IsNthLastOfType);

impl IsLastOfType {
    pub fn new() -> Self {
        Self(IsNthLastOfType::new(0, 1))
    }
}

impl Default for IsLastOfType {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for IsLastOfType {
    fn matches(&self, doc: &Document, root: NodeId, element: NodeId) -> bool {
        self.0.matches(doc, root, element)
    }
}

impl fmt::Display for IsLastOfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":last-of-type")
    }
}

// --- text predicates ---

macro_rules! contains_evaluator {
    ($name:ident, $pseudo:literal, $normalize:literal, $accessor:ident, $fold:literal) => {
        #[derive(Debug)]
        pub struct $name {
            text: String,
        }

        impl $name {
            pub fn new(text: &str) -> Result<Self, SelectorError> {
                validate_not_empty(text, concat!($pseudo, "(text) query"))?;
                let text = if $normalize {
                    strings::normalise_whitespace(text)
                } else {
                    text.to_string()
                };
                let text = if $fold { text.to_lowercase() } else { text };
                Ok(Self { text })
            }
        }

        impl Evaluator for $name {
            fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
                let hay = doc.$accessor(element);
                if $fold {
                    hay.to_lowercase().contains(&self.text)
                } else {
                    hay.contains(&self.text)
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $pseudo, self.text)
            }
        }
    };
}

// Normalized, case-insensitive containment over combined / own text, and
// over data (not whitespace-normalized).
contains_evaluator!(ContainsText, ":contains", true, text, true);
contains_evaluator!(ContainsOwnText, ":containsOwn", true, own_text, true);
contains_evaluator!(ContainsData, ":containsData", false, data, true);
// Non-normalized, case-sensitive containment.
contains_evaluator!(ContainsWholeText, ":containsWholeText", false, whole_text, false);
contains_evaluator!(
    ContainsWholeOwnText,
    ":containsWholeOwnText",
    false,
    whole_own_text,
    false
);

macro_rules! regex_evaluator {
    ($name:ident, $pseudo:literal, $accessor:ident) => {
        #[derive(Debug)]
        pub struct $name {
            pattern: Regex,
        }

        impl $name {
            pub fn new(pattern: Regex) -> Self {
                Self { pattern }
            }
        }

        impl Evaluator for $name {
            fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
                self.pattern.is_match(&doc.$accessor(element))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $pseudo, self.pattern)
            }
        }
    };
}

// Regex search (not full match), case as written.
regex_evaluator!(Matches, ":matches", text);
regex_evaluator!(MatchesOwn, ":matchesOwn", own_text);
regex_evaluator!(MatchesWholeText, ":matchesWholeText", whole_text);
regex_evaluator!(MatchesWholeOwnText, ":matchesWholeOwnText", whole_own_text);

/// `:matchText`: matches the pseudo elements produced by
/// [`crate::selector::prepare_match_text`]. Matching itself never
/// mutates the tree; a query containing this evaluator reports
/// [`Evaluator::wants_text_prepare`] so the facade (or caller) can run
/// the conversion pass up front.
#[derive(Debug)]
pub struct MatchText;

impl Evaluator for MatchText {
    fn matches(&self, doc: &Document, _root: NodeId, element: NodeId) -> bool {
        doc.is_pseudo_element(element)
    }

    fn wants_text_prepare(&self) -> bool {
        true
    }
}

impl fmt::Display for MatchText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":matchText")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_row() -> (Document, Vec<NodeId>) {
        // <table><tr><td/><td/><td/></tr></table> with the tds returned
        let mut doc = Document::new();
        let table = doc.create_element("table");
        doc.append_child(doc.document_node(), table);
        let tr = doc.create_element("tr");
        doc.append_child(table, tr);
        let tds: Vec<NodeId> = (0..3)
            .map(|_| {
                let td = doc.create_element("td");
                doc.append_child(tr, td);
                td
            })
            .collect();
        (doc, tds)
    }

    #[test]
    fn nth_rule() {
        // 2n+1 = odd positions
        assert!(nth_matches(2, 1, 1));
        assert!(!nth_matches(2, 1, 2));
        assert!(nth_matches(2, 1, 5));
        // 0n+3 = exactly position 3
        assert!(nth_matches(0, 3, 3));
        assert!(!nth_matches(0, 3, 6));
        // -n+2 = first two positions
        assert!(nth_matches(-1, 2, 1));
        assert!(nth_matches(-1, 2, 2));
        assert!(!nth_matches(-1, 2, 3));
    }

    #[test]
    fn index_evaluators() {
        let (doc, tds) = doc_with_row();
        let root = doc.document_node();
        assert!(IndexEquals::new(0).matches(&doc, root, tds[0]));
        assert!(!IndexEquals::new(0).matches(&doc, root, tds[1]));
        assert!(IndexGreaterThan::new(1).matches(&doc, root, tds[2]));
        assert!(IndexLessThan::new(2).matches(&doc, root, tds[1]));
        assert!(!IndexLessThan::new(2).matches(&doc, root, tds[2]));
        // :lt never matches the evaluation root itself
        assert!(!IndexLessThan::new(2).matches(&doc, tds[0], tds[0]));
    }

    #[test]
    fn first_last_only() {
        let (doc, tds) = doc_with_row();
        let root = doc.document_node();
        assert!(IsFirstChild.matches(&doc, root, tds[0]));
        assert!(!IsFirstChild.matches(&doc, root, tds[1]));
        assert!(IsLastChild.matches(&doc, root, tds[2]));
        assert!(!IsOnlyChild.matches(&doc, root, tds[0]));
    }

    #[test]
    fn document_child_is_not_first_child() {
        // the root element has no element parent, only the document node
        let (doc, _) = doc_with_row();
        let table = doc.root_element().unwrap();
        assert!(!IsFirstChild.matches(&doc, doc.document_node(), table));
        assert!(IsRoot.matches(&doc, doc.document_node(), table));
    }

    #[test]
    fn attribute_value_predicates() {
        let mut doc = Document::new();
        let a = doc.create_element_with("a", &[("href", " HTTP://Example.com/Page ")]);
        doc.append_child(doc.document_node(), a);
        let root = doc.document_node();

        let eq = AttributeWithValue::new("HREF", "http://example.com/page").unwrap();
        assert!(eq.matches(&doc, root, a));

        let start = AttributeWithValueStarting::new("href", "'http'").unwrap();
        assert!(!start.matches(&doc, root, a)); // leading space defeats prefix

        let contains = AttributeWithValueContaining::new("href", "example").unwrap();
        assert!(contains.matches(&doc, root, a));

        let not = AttributeWithValueNot::new("rel", "nofollow").unwrap();
        assert!(not.matches(&doc, root, a)); // absent attribute: value != nofollow
    }

    #[test]
    fn empty_key_is_invalid_argument() {
        let err = AttributeWithValue::new("  ", "x").unwrap_err();
        assert!(matches!(err, SelectorError::InvalidArgument(_)));
        let err = Class::new("").unwrap_err();
        assert!(matches!(err, SelectorError::InvalidArgument(_)));
    }

    #[test]
    fn regex_is_case_sensitive_literals_are_not() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.append_child(doc.document_node(), p);
        let t = doc.create_text("Hello World");
        doc.append_child(p, t);
        let root = doc.document_node();

        assert!(ContainsText::new("hello").unwrap().matches(&doc, root, p));
        assert!(
            !Matches::new(Regex::new("hello").unwrap()).matches(&doc, root, p)
        );
        assert!(
            Matches::new(Regex::new("(?i)hello").unwrap()).matches(&doc, root, p)
        );
    }

    #[test]
    fn whole_text_is_exact() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.append_child(doc.document_node(), p);
        let t = doc.create_text("One\n Two");
        doc.append_child(p, t);
        let root = doc.document_node();

        assert!(
            ContainsWholeText::new("One\n Two").unwrap().matches(&doc, root, p)
        );
        assert!(
            !ContainsWholeText::new("one\n two").unwrap().matches(&doc, root, p)
        );
        // normalized variant folds whitespace and case
        assert!(ContainsText::new("one two").unwrap().matches(&doc, root, p));
    }

    #[test]
    fn display_round_trips_syntax() {
        assert_eq!(Tag::new("div").to_string(), "div");
        assert_eq!(Id::new("logo").unwrap().to_string(), "#logo");
        assert_eq!(IsNthChild::new(2, 1).to_string(), ":nth-child(2n+1)");
        assert_eq!(IsNthChild::new(0, 4).to_string(), ":nth-child(4)");
        assert_eq!(IsNthChild::new(2, 0).to_string(), ":nth-child(2n)");
        assert_eq!(IsFirstOfType::new().to_string(), ":first-of-type");
    }
}
