//! The engine-wide error taxonomy.

use thiserror::Error;

/// Unified error type returned by both `parse` and `execute`.
///
/// Each variant corresponds to one `error_type` in the wire protocol;
/// `error_type()` returns that wire string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Lex/parse failure, or a structurally invalid statement.
    #[error("parse error: {0}")]
    Parsing(String),

    /// A schema-aware semantic check failed (unknown/ambiguous column,
    /// unknown table, type mismatch, duplicate definitions, GROUP BY
    /// violations, forbidden aggregates, nested aggregates, wrong
    /// argument counts, column references in LIMIT/OFFSET, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Integer division or MOD with a non-NULL zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// Dispatch fallthrough for an unrecognized statement kind.
    #[error("unknown command")]
    UnknownCommand,
}

impl EngineError {
    /// Builds a [`EngineError::Parsing`] from any displayable message.
    pub fn parsing(message: impl Into<String>) -> Self {
        Self::Parsing(message.into())
    }

    /// Builds a [`EngineError::Validation`] from any displayable message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns the wire-visible short string for this error's kind.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Parsing(_) => "parsing_error",
            Self::Validation(_) => "validation_error",
            Self::DivisionByZero => "division_by_zero_error",
            Self::UnknownCommand => "unknown_command",
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, EngineError>;
