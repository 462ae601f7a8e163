//! Text normalization helpers shared by the tree accessors and the
//! selector engine's text predicates.

/// Whitespace as it renders: HTML whitespace plus NBSP.
#[inline]
pub fn is_actually_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{000c}' | '\r' | '\u{00a0}')
}

/// Characters that render as nothing: zero-width space, soft hyphen.
#[inline]
pub fn is_invisible_char(c: char) -> bool {
    matches!(c, '\u{200b}' | '\u{00ad}')
}

/// Collapse runs of whitespace to single spaces and drop invisible
/// characters, appending onto `accum`.
pub fn append_normalised_whitespace(accum: &mut String, text: &str, strip_leading: bool) {
    let mut last_was_white = false;
    let mut reached_non_white = false;
    for c in text.chars() {
        if is_actually_whitespace(c) {
            if (strip_leading && !reached_non_white) || last_was_white {
                continue;
            }
            accum.push(' ');
            last_was_white = true;
        } else if !is_invisible_char(c) {
            accum.push(c);
            last_was_white = false;
            reached_non_white = true;
        }
    }
}

/// Normalize the whitespace within a string: all whitespace characters
/// become simple spaces, and runs collapse to one.
pub fn normalise_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    append_normalised_whitespace(&mut out, text, false);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs() {
        assert_eq!(normalise_whitespace("a  b\t\nc"), "a b c");
    }

    #[test]
    fn nbsp_is_whitespace() {
        assert_eq!(normalise_whitespace("a\u{00a0}b"), "a b");
    }

    #[test]
    fn drops_invisible_chars() {
        assert_eq!(normalise_whitespace("a\u{200b}b\u{00ad}c"), "abc");
    }

    #[test]
    fn strip_leading_only_before_content() {
        let mut s = String::new();
        append_normalised_whitespace(&mut s, "  a  b  ", true);
        assert_eq!(s, "a b ");
    }
}
