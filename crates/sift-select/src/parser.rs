//! Selector parser: compiles a query string into an [`Evaluator`] tree.
//!
//! Grammar: combinators ` `, `>`, `+`, `~`, `,`; simple selectors `*`,
//! `tag`, `ns|tag`, `*|tag`, `#id`, `.class`, and the `[attr]` family;
//! pseudo-classes as dispatched in `find_elements`. `,` has the lowest
//! precedence; other combinators bind to the clause built since the last
//! `,`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::combining::{And, Or};
use crate::error::SelectorError;
use crate::evaluator::{
    AllElements, Attribute, AttributeStarting, AttributeWithValue, AttributeWithValueContaining,
    AttributeWithValueEnding, AttributeWithValueMatching, AttributeWithValueNot,
    AttributeWithValueStarting, Class, ContainsData, ContainsOwnText, ContainsText,
    ContainsWholeOwnText, ContainsWholeText, Evaluator, Id, IndexEquals, IndexGreaterThan,
    IndexLessThan, IsEmpty, IsFirstChild, IsFirstOfType, IsLastChild, IsLastOfType, IsNthChild,
    IsNthLastChild, IsNthLastOfType, IsNthOfType, IsOnlyChild, IsOnlyOfType, IsRoot, MatchText,
    Matches, MatchesOwn, MatchesWholeOwnText, MatchesWholeText, Tag, TagEndsWith,
};
use crate::structural;
use crate::token_queue::TokenQueue;

const COMBINATORS: &[char] = &[',', '>', '+', '~', ' '];
const ATTRIBUTE_OPS: &[&str] = &["=", "!=", "^=", "$=", "*=", "~="];

static NTH_AB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(([+-])?(\d+)?)n(\s*([+-])?\s*(\d+))?$").expect("valid nth pattern")
});
static NTH_B: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])?(\d+)$").expect("valid nth pattern"));

/// A parsed selector: the compiled evaluator plus the source text it was
/// built from. Reusable against any number of documents.
#[derive(Debug)]
pub struct Query {
    eval: Box<dyn Evaluator>,
    source: String,
}

impl Query {
    /// Compile a selector. Blank input is an invalid argument; malformed
    /// grammar is a syntax error carrying the query and the unparsed
    /// remainder.
    pub fn parse(query: &str) -> Result<Query, SelectorError> {
        let source = query.trim();
        let eval = parse_query(source)?;
        debug!(query = source, compiled = %eval, "parsed selector");
        Ok(Query {
            eval,
            source: source.to_string(),
        })
    }

    pub fn evaluator(&self) -> &dyn Evaluator {
        &*self.eval
    }

    /// True if this query contains `:matchText` and so expects the text
    /// prepare pass to have run over the target tree.
    pub fn needs_text_prepare(&self) -> bool {
        self.eval.wants_text_prepare()
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

pub(crate) fn parse_query(query: &str) -> Result<Box<dyn Evaluator>, SelectorError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(SelectorError::invalid("query must not be empty"));
    }
    Parser::new(trimmed).parse()
}

struct Parser<'q> {
    query: &'q str,
    tq: TokenQueue,
    /// Completed OR branches (clauses before a `,`).
    branches: Vec<Box<dyn Evaluator>>,
    /// The AND sequence of the clause being built.
    current: Vec<Box<dyn Evaluator>>,
}

impl<'q> Parser<'q> {
    fn new(query: &'q str) -> Self {
        Self {
            query,
            tq: TokenQueue::new(query),
            branches: Vec::new(),
            current: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Box<dyn Evaluator>, SelectorError> {
        self.tq.consume_whitespace();
        if self.tq.matches_any_char(COMBINATORS) {
            // a leading combinator binds to the evaluation root
            self.current.push(Box::new(structural::Root));
            let c = self.tq.consume();
            self.combinator(c)?;
        } else {
            self.find_elements()?;
        }
        while !self.tq.is_empty() {
            let seen_white = self.tq.consume_whitespace();
            if self.tq.matches_any_char(COMBINATORS) {
                let c = self.tq.consume();
                self.combinator(c)?;
            } else if seen_white {
                self.combinator(' ')?;
            } else {
                // E.class, E#id, E[attr] etc: AND onto the current clause
                self.find_elements()?;
            }
        }
        let last = And::flatten(self.current);
        if self.branches.is_empty() {
            return Ok(last);
        }
        let mut or = Or::new(Vec::new());
        for branch in self.branches {
            or.add(branch);
        }
        or.add(last);
        Ok(Box::new(or))
    }

    fn syntax(&mut self, message: impl Into<String>) -> SelectorError {
        SelectorError::Syntax {
            query: self.query.to_string(),
            remainder: self.tq.remainder(),
            message: message.into(),
        }
    }

    fn chomp_balanced(&mut self, open: char, close: char) -> Result<String, SelectorError> {
        match self.tq.chomp_balanced(open, close) {
            Some(contents) => Ok(contents),
            None => Err(self.syntax(format!("did not find balanced marker for '{open}'"))),
        }
    }

    fn combinator(&mut self, combinator: char) -> Result<(), SelectorError> {
        self.tq.consume_whitespace();
        let sub_query = self.consume_sub_query()?;
        let new_eval = parse_query(&sub_query)?;

        if combinator == ',' {
            // seal the clause; the next one starts from the sub-query
            let branch = And::flatten(std::mem::take(&mut self.current));
            self.branches.push(branch);
            self.current.push(new_eval);
            return Ok(());
        }

        let left = And::flatten(std::mem::take(&mut self.current));
        let wrapped: Box<dyn Evaluator> = match combinator {
            '>' => Box::new(structural::ImmediateParent::new(left)),
            ' ' => Box::new(structural::Parent::new(left)),
            '+' => Box::new(structural::ImmediatePreviousSibling::new(left)),
            '~' => Box::new(structural::PreviousSibling::new(left)),
            _ => {
                return Err(
                    SelectorError::invalid(format!("unknown combinator '{combinator}'"))
                );
            }
        };
        self.current.push(Box::new(And::pair(wrapped, new_eval)));
        Ok(())
    }

    /// Consume up to the next top-level combinator, keeping bracketed and
    /// parenthesised groups intact.
    fn consume_sub_query(&mut self) -> Result<String, SelectorError> {
        let mut sq = String::new();
        while !self.tq.is_empty() {
            if self.tq.matches("(") {
                sq.push('(');
                sq.push_str(&self.chomp_balanced('(', ')')?);
                sq.push(')');
            } else if self.tq.matches("[") {
                sq.push('[');
                sq.push_str(&self.chomp_balanced('[', ']')?);
                sq.push(']');
            } else if self.tq.matches_any_char(COMBINATORS) {
                if sq.is_empty() {
                    self.tq.consume();
                } else {
                    break;
                }
            } else {
                sq.push(self.tq.consume());
            }
        }
        Ok(sq)
    }

    fn push(&mut self, eval: impl Evaluator + 'static) {
        self.current.push(Box::new(eval));
    }

    fn find_elements(&mut self) -> Result<(), SelectorError> {
        if self.tq.match_chomp("#") {
            self.by_id()
        } else if self.tq.match_chomp(".") {
            self.by_class()
        } else if self.tq.matches_word() || self.tq.matches("*|") {
            self.by_tag()
        } else if self.tq.matches("[") {
            self.by_attribute()
        } else if self.tq.match_chomp("*") {
            self.push(AllElements);
            Ok(())
        } else if self.tq.match_chomp(":lt(") {
            let index = self.consume_index()?;
            self.push(IndexLessThan::new(index));
            Ok(())
        } else if self.tq.match_chomp(":gt(") {
            let index = self.consume_index()?;
            self.push(IndexGreaterThan::new(index));
            Ok(())
        } else if self.tq.match_chomp(":eq(") {
            let index = self.consume_index()?;
            self.push(IndexEquals::new(index));
            Ok(())
        } else if self.tq.matches(":has(") {
            self.has()
        } else if self.tq.matches(":contains(") {
            self.contains(false)
        } else if self.tq.matches(":containsOwn(") {
            self.contains(true)
        } else if self.tq.matches(":containsWholeText(") {
            self.contains_whole_text(false)
        } else if self.tq.matches(":containsWholeOwnText(") {
            self.contains_whole_text(true)
        } else if self.tq.matches(":containsData(") {
            self.contains_data()
        } else if self.tq.matches(":matches(") {
            self.matches_regex(false)
        } else if self.tq.matches(":matchesOwn(") {
            self.matches_regex(true)
        } else if self.tq.matches(":matchesWholeText(") {
            self.matches_whole_text(false)
        } else if self.tq.matches(":matchesWholeOwnText(") {
            self.matches_whole_text(true)
        } else if self.tq.matches(":not(") {
            self.not()
        } else if self.tq.match_chomp(":nth-child(") {
            self.css_nth_child(false, false)
        } else if self.tq.match_chomp(":nth-last-child(") {
            self.css_nth_child(true, false)
        } else if self.tq.match_chomp(":nth-of-type(") {
            self.css_nth_child(false, true)
        } else if self.tq.match_chomp(":nth-last-of-type(") {
            self.css_nth_child(true, true)
        } else if self.tq.match_chomp(":first-child") {
            self.push(IsFirstChild);
            Ok(())
        } else if self.tq.match_chomp(":last-child") {
            self.push(IsLastChild);
            Ok(())
        } else if self.tq.match_chomp(":first-of-type") {
            self.push(IsFirstOfType::new());
            Ok(())
        } else if self.tq.match_chomp(":last-of-type") {
            self.push(IsLastOfType::new());
            Ok(())
        } else if self.tq.match_chomp(":only-child") {
            self.push(IsOnlyChild);
            Ok(())
        } else if self.tq.match_chomp(":only-of-type") {
            self.push(IsOnlyOfType);
            Ok(())
        } else if self.tq.match_chomp(":empty") {
            self.push(IsEmpty);
            Ok(())
        } else if self.tq.match_chomp(":root") {
            self.push(IsRoot);
            Ok(())
        } else if self.tq.match_chomp(":matchText") {
            self.push(MatchText);
            Ok(())
        } else {
            Err(self.syntax("unexpected token"))
        }
    }

    fn by_id(&mut self) -> Result<(), SelectorError> {
        let id = self.tq.consume_css_identifier();
        self.push(Id::new(&id)?);
        Ok(())
    }

    fn by_class(&mut self) -> Result<(), SelectorError> {
        let class = self.tq.consume_css_identifier();
        self.push(Class::new(&class)?);
        Ok(())
    }

    fn by_tag(&mut self) -> Result<(), SelectorError> {
        let tag_name = self.tq.consume_element_selector().trim().to_lowercase();
        if tag_name.is_empty() {
            return Err(SelectorError::invalid("tag name must not be empty"));
        }
        if let Some(plain) = tag_name.strip_prefix("*|") {
            // wildcard namespace: matches `name` or any `ns:name`
            let mut or = Or::new(Vec::new());
            or.add(Box::new(Tag::new(plain)));
            or.add(Box::new(TagEndsWith::new(&format!(":{plain}"))));
            self.push(or);
        } else {
            // an element named "abc:def" is selected as "abc|def"
            self.push(Tag::new(&tag_name.replace('|', ":")));
        }
        Ok(())
    }

    fn by_attribute(&mut self) -> Result<(), SelectorError> {
        let contents = self.chomp_balanced('[', ']')?;
        let mut cq = TokenQueue::new(&contents);
        let key = cq.consume_to_any(ATTRIBUTE_OPS);
        cq.consume_whitespace();
        if cq.is_empty() {
            if let Some(prefix) = key.strip_prefix('^') {
                self.push(AttributeStarting::new(prefix)?);
            } else {
                self.push(Attribute::new(&key)?);
            }
        } else if cq.match_chomp("=") {
            self.push(AttributeWithValue::new(&key, &cq.remainder())?);
        } else if cq.match_chomp("!=") {
            self.push(AttributeWithValueNot::new(&key, &cq.remainder())?);
        } else if cq.match_chomp("^=") {
            self.push(AttributeWithValueStarting::new(&key, &cq.remainder())?);
        } else if cq.match_chomp("$=") {
            self.push(AttributeWithValueEnding::new(&key, &cq.remainder())?);
        } else if cq.match_chomp("*=") {
            self.push(AttributeWithValueContaining::new(&key, &cq.remainder())?);
        } else if cq.match_chomp("~=") {
            let pattern = match Regex::new(&cq.remainder()) {
                Ok(pattern) => pattern,
                Err(e) => return Err(self.syntax(format!("invalid attribute regex: {e}"))),
            };
            self.push(AttributeWithValueMatching::new(&key, pattern)?);
        } else {
            return Err(SelectorError::Syntax {
                query: self.query.to_string(),
                remainder: cq.remainder(),
                message: "unexpected attribute token".to_string(),
            });
        }
        Ok(())
    }

    fn consume_index(&mut self) -> Result<usize, SelectorError> {
        let index = self.tq.chomp_to(")").trim().to_string();
        if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
            return Err(SelectorError::invalid("index must be numeric"));
        }
        index
            .parse()
            .map_err(|_| SelectorError::invalid("index out of range"))
    }

    fn css_nth_child(&mut self, backwards: bool, of_type: bool) -> Result<(), SelectorError> {
        let arg = self.tq.chomp_to(")").trim().to_lowercase();
        let Some((a, b)) = parse_nth(&arg) else {
            return Err(self.syntax(format!("could not parse nth-index '{arg}'")));
        };
        match (backwards, of_type) {
            (false, false) => self.push(IsNthChild::new(a, b)),
            (true, false) => self.push(IsNthLastChild::new(a, b)),
            (false, true) => self.push(IsNthOfType::new(a, b)),
            (true, true) => self.push(IsNthLastOfType::new(a, b)),
        }
        Ok(())
    }

    fn has(&mut self) -> Result<(), SelectorError> {
        self.tq.consume_seq(":has");
        let sub_query = self.chomp_balanced('(', ')')?;
        if sub_query.trim().is_empty() {
            return Err(SelectorError::invalid(
                ":has(selector) sub-select must not be empty",
            ));
        }
        let inner = parse_query(&sub_query)?;
        self.push(structural::Has::new(inner));
        Ok(())
    }

    fn not(&mut self) -> Result<(), SelectorError> {
        self.tq.consume_seq(":not");
        let sub_query = self.chomp_balanced('(', ')')?;
        if sub_query.trim().is_empty() {
            return Err(SelectorError::invalid(
                ":not(selector) sub-select must not be empty",
            ));
        }
        let inner = parse_query(&sub_query)?;
        self.push(structural::Not::new(inner));
        Ok(())
    }

    fn contains(&mut self, own: bool) -> Result<(), SelectorError> {
        let pseudo = if own { ":containsOwn" } else { ":contains" };
        self.tq.consume_seq(pseudo);
        let text = TokenQueue::unescape(&self.chomp_balanced('(', ')')?);
        if own {
            self.push(ContainsOwnText::new(&text)?);
        } else {
            self.push(ContainsText::new(&text)?);
        }
        Ok(())
    }

    fn contains_whole_text(&mut self, own: bool) -> Result<(), SelectorError> {
        let pseudo = if own {
            ":containsWholeOwnText"
        } else {
            ":containsWholeText"
        };
        self.tq.consume_seq(pseudo);
        let text = TokenQueue::unescape(&self.chomp_balanced('(', ')')?);
        if own {
            self.push(ContainsWholeOwnText::new(&text)?);
        } else {
            self.push(ContainsWholeText::new(&text)?);
        }
        Ok(())
    }

    fn contains_data(&mut self) -> Result<(), SelectorError> {
        self.tq.consume_seq(":containsData");
        let text = TokenQueue::unescape(&self.chomp_balanced('(', ')')?);
        self.push(ContainsData::new(&text)?);
        Ok(())
    }

    // regex arguments are not unescaped, as pattern syntax needs its
    // backslashes intact
    fn compile_regex(&mut self, pseudo: &str) -> Result<Regex, SelectorError> {
        self.tq.consume_seq(pseudo);
        let regex = self.chomp_balanced('(', ')')?;
        if regex.is_empty() {
            return Err(SelectorError::invalid(format!(
                "{pseudo}(regex) query must not be empty"
            )));
        }
        Regex::new(&regex).map_err(|e| {
            SelectorError::Syntax {
                query: self.query.to_string(),
                remainder: regex.clone(),
                message: format!("invalid regex: {e}"),
            }
        })
    }

    fn matches_regex(&mut self, own: bool) -> Result<(), SelectorError> {
        let pseudo = if own { ":matchesOwn" } else { ":matches" };
        let pattern = self.compile_regex(pseudo)?;
        if own {
            self.push(MatchesOwn::new(pattern));
        } else {
            self.push(Matches::new(pattern));
        }
        Ok(())
    }

    fn matches_whole_text(&mut self, own: bool) -> Result<(), SelectorError> {
        let pseudo = if own {
            ":matchesWholeOwnText"
        } else {
            ":matchesWholeText"
        };
        let pattern = self.compile_regex(pseudo)?;
        if own {
            self.push(MatchesWholeOwnText::new(pattern));
        } else {
            self.push(MatchesWholeText::new(pattern));
        }
        Ok(())
    }
}

/// Parse an nth-formula: `odd`, `even`, `An+B` with either part
/// optional, or a bare signed integer.
fn parse_nth(arg: &str) -> Option<(i32, i32)> {
    match arg {
        "odd" => return Some((2, 1)),
        "even" => return Some((2, 0)),
        _ => {}
    }
    if let Some(caps) = NTH_AB.captures(arg) {
        let negative = |i: usize| caps.get(i).is_some_and(|m| m.as_str() == "-");
        let digits = |i: usize| caps.get(i).map(|m| m.as_str().parse::<i32>());
        let a = match digits(3) {
            Some(parsed) => parsed.ok()?,
            None => 1,
        };
        let a = if negative(2) { -a } else { a };
        let b = match digits(6) {
            Some(parsed) => parsed.ok()?,
            None => 0,
        };
        let b = if negative(5) { -b } else { b };
        return Some((a, b));
    }
    if let Some(caps) = NTH_B.captures(arg) {
        let b = caps.get(2)?.as_str().parse::<i32>().ok()?;
        let b = if caps.get(1).is_some_and(|m| m.as_str() == "-") {
            -b
        } else {
            b
        };
        return Some((0, b));
    }
    None
}
