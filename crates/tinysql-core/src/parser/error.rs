//! Parser error type.

use crate::lexer::{Span, TokenKind};

/// A parse error, convertible into an [`crate::error::EngineError::Parsing`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error with a custom message.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: &TokenKind, span: Span) -> Self {
        Self {
            message: format!("expected {}, found {found:?}", expected.into()),
            span,
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} at position {}..{}",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for crate::error::EngineError {
    fn from(err: ParseError) -> Self {
        Self::parsing(err.to_string())
    }
}
