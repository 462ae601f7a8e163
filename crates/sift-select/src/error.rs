//! Selector errors
//!
//! Two kinds: precondition failures (`InvalidArgument`) raised before any
//! parsing or matching work, and grammar failures (`Syntax`) which carry
//! the original query plus the unparsed remainder for diagnostics. A
//! parse error aborts the whole parse; there are no partial results.
//! "Nothing matched" is not an error.

/// Error raised by query parsing or evaluator construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// A precondition failed: blank query string, or an evaluator
    /// constructed with an empty key or value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The selector grammar was malformed.
    #[error("could not parse query '{query}': {message} at '{remainder}'")]
    Syntax {
        /// The full original query.
        query: String,
        /// The text that remained unparsed when the error was raised.
        remainder: String,
        message: String,
    },
}

impl SelectorError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SelectorError::InvalidArgument(msg.into())
    }

    /// Is this a syntax error (as opposed to a precondition failure)?
    pub fn is_syntax(&self) -> bool {
        matches!(self, SelectorError::Syntax { .. })
    }
}
