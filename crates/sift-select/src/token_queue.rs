//! Character queue with parsing helpers for the query parser.
//!
//! Works on a char vector rather than byte offsets so selector text with
//! non-ASCII content (e.g. `:contains(...)` arguments) never lands on a
//! UTF-8 boundary.

const ESC: char = '\\';

#[derive(Debug)]
pub(crate) struct TokenQueue {
    chars: Vec<char>,
    pos: usize,
}

impl TokenQueue {
    pub fn new(data: &str) -> Self {
        Self {
            chars: data.chars().collect(),
            pos: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Tests if the next characters match the sequence, ASCII
    /// case-insensitively.
    pub fn matches(&self, seq: &str) -> bool {
        let mut i = self.pos;
        for s in seq.chars() {
            match self.chars.get(i) {
                Some(&c) if c.eq_ignore_ascii_case(&s) => i += 1,
                _ => return false,
            }
        }
        true
    }

    pub fn matches_any(&self, seqs: &[&str]) -> bool {
        seqs.iter().any(|s| self.matches(s))
    }

    pub fn matches_any_char(&self, chars: &[char]) -> bool {
        match self.chars.get(self.pos) {
            Some(c) => chars.contains(c),
            None => false,
        }
    }

    /// If the queue starts with the sequence, consume it.
    pub fn match_chomp(&mut self, seq: &str) -> bool {
        if self.matches(seq) {
            self.pos += seq.chars().count();
            true
        } else {
            false
        }
    }

    pub fn matches_whitespace(&self) -> bool {
        self.chars
            .get(self.pos)
            .is_some_and(|c| c.is_whitespace())
    }

    /// Letter or digit next?
    pub fn matches_word(&self) -> bool {
        self.chars.get(self.pos).is_some_and(|c| c.is_alphanumeric())
    }

    /// Consume one character off the queue.
    pub fn consume(&mut self) -> char {
        let c = self.chars[self.pos];
        self.pos += 1;
        c
    }

    /// Consume the expected sequence; the caller must have matched first.
    pub fn consume_seq(&mut self, seq: &str) {
        debug_assert!(self.matches(seq), "queue did not match expected sequence");
        self.pos += seq.chars().count();
    }

    /// Pull the next run of whitespace off the queue.
    pub fn consume_whitespace(&mut self) -> bool {
        let mut seen = false;
        while self.matches_whitespace() {
            self.pos += 1;
            seen = true;
        }
        seen
    }

    /// Consume up to (exclusive) the first occurrence of `seq`, case
    /// sensitively; or the whole remainder if absent.
    fn consume_to(&mut self, seq: &str) -> String {
        let needle: Vec<char> = seq.chars().collect();
        let mut i = self.pos;
        while i + needle.len() <= self.chars.len() {
            if self.chars[i..i + needle.len()] == needle[..] {
                let out: String = self.chars[self.pos..i].iter().collect();
                self.pos = i;
                return out;
            }
            i += 1;
        }
        self.remainder()
    }

    /// Consume until any of the terminators (case-insensitive), leaving
    /// the terminator on the queue.
    pub fn consume_to_any(&mut self, seqs: &[&str]) -> String {
        let start = self.pos;
        while !self.is_empty() && !self.matches_any(seqs) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Consume up to `seq`, then chomp the matched `seq` itself.
    pub fn chomp_to(&mut self, seq: &str) -> String {
        let data = self.consume_to(seq);
        self.match_chomp(seq);
        data
    }

    /// Pull a balanced string off the queue, e.g. `(one (two) three)
    /// four` with `(`/`)` yields `one (two) three` and leaves ` four`.
    /// Quoted (`'`/`"`) and `\`-escaped openers/closers do not count
    /// toward balance; escapes stay in the output (suitable for regexes).
    /// Returns `None` if the queue runs out before balance is restored.
    pub fn chomp_balanced(&mut self, open: char, close: char) -> Option<String> {
        let mut start: Option<usize> = None;
        let mut end: Option<usize> = None;
        let mut depth = 0i32;
        let mut last = '\0';
        let mut in_single_quote = false;
        let mut in_double_quote = false;
        let mut in_regex_qe = false; // \Q .. \E escapes

        loop {
            if self.is_empty() {
                break;
            }
            let c = self.consume();
            if last != ESC {
                if c == '\'' && c != open && !in_double_quote {
                    in_single_quote = !in_single_quote;
                } else if c == '"' && c != open && !in_single_quote {
                    in_double_quote = !in_double_quote;
                }
                if in_single_quote || in_double_quote || in_regex_qe {
                    last = c;
                    continue;
                }
                if c == open {
                    depth += 1;
                    if start.is_none() {
                        start = Some(self.pos);
                    }
                } else if c == close {
                    depth -= 1;
                }
            } else if c == 'Q' {
                in_regex_qe = true;
            } else if c == 'E' {
                in_regex_qe = false;
            }
            if depth > 0 && last != '\0' {
                end = Some(self.pos);
            }
            last = c;
            if depth <= 0 {
                break;
            }
        }

        if depth > 0 {
            return None; // ran out before the closer
        }
        Some(match (start, end) {
            (Some(s), Some(e)) if e >= s => self.chars[s..e].iter().collect(),
            _ => String::new(),
        })
    }

    /// Consume a CSS element selector: word characters, `*|`, `|`, `_`,
    /// `-` (namespaces use `|` so `:` stays free for pseudo-classes).
    pub fn consume_element_selector(&mut self) -> String {
        let start = self.pos;
        while !self.is_empty() && (self.matches_word() || self.matches_any(&["*|", "|", "_", "-"]))
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Consume a CSS identifier (id or class): letters, digits, `-`, `_`.
    pub fn consume_css_identifier(&mut self) -> String {
        let start = self.pos;
        while !self.is_empty() && (self.matches_word() || self.matches_any_char(&['-', '_'])) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Consume and return whatever is left on the queue.
    pub fn remainder(&mut self) -> String {
        let out: String = self.chars[self.pos..].iter().collect();
        self.pos = self.chars.len();
        out
    }

    /// Unescape a `\`-escaped string (doubled backslashes collapse).
    pub fn unescape(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut last = '\0';
        for c in input.chars() {
            if c == ESC {
                if last == ESC {
                    out.push(c);
                    last = '\0';
                    continue;
                }
            } else {
                out.push(c);
            }
            last = c;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chomp_balanced() {
        let mut tq = TokenQueue::new(":contains(one (two) three) four");
        let pre = tq.consume_to_any(&["("]);
        let guts = tq.chomp_balanced('(', ')').unwrap();
        let remainder = tq.remainder();
        assert_eq!(pre, ":contains");
        assert_eq!(guts, "one (two) three");
        assert_eq!(remainder, " four");
    }

    #[test]
    fn chomp_balanced_with_quotes() {
        let mut tq = TokenQueue::new("(one (two) '(three)') four");
        let guts = tq.chomp_balanced('(', ')').unwrap();
        assert_eq!(guts, "one (two) '(three)'");
        assert_eq!(tq.remainder(), " four");
    }

    #[test]
    fn chomp_balanced_with_escapes() {
        let mut tq = TokenQueue::new("(one \\( \\) two) three");
        let guts = tq.chomp_balanced('(', ')').unwrap();
        assert_eq!(guts, "one \\( \\) two");
        assert_eq!(TokenQueue::unescape(&guts), "one ( ) two");
    }

    #[test]
    fn chomp_balanced_unbalanced_is_none() {
        let mut tq = TokenQueue::new("(one (two) three");
        assert!(tq.chomp_balanced('(', ')').is_none());
    }

    #[test]
    fn matches_is_case_insensitive() {
        let mut tq = TokenQueue::new(":CONTAINS(x)");
        assert!(tq.matches(":contains"));
        assert!(tq.match_chomp(":contains("));
        assert_eq!(tq.remainder(), "x)");
    }

    #[test]
    fn element_selector_consumes_namespace_forms() {
        let mut tq = TokenQueue::new("*|name.cls");
        assert_eq!(tq.consume_element_selector(), "*|name");
        let mut tq = TokenQueue::new("fb|name rest");
        assert_eq!(tq.consume_element_selector(), "fb|name");
    }

    #[test]
    fn css_identifier_stops_at_punctuation() {
        let mut tq = TokenQueue::new("col-1:first-child");
        assert_eq!(tq.consume_css_identifier(), "col-1");
        assert!(tq.matches(":"));
    }

    #[test]
    fn chomp_to_consumes_terminator() {
        let mut tq = TokenQueue::new("3) rest");
        assert_eq!(tq.chomp_to(")"), "3");
        assert_eq!(tq.remainder(), " rest");
    }
}
