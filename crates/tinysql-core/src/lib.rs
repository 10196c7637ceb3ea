//! # tinysql-core
//!
//! An in-memory SQL engine: lexer, recursive-descent parser, schema
//! catalog, and a query processor covering joins, grouping, sorting,
//! and aggregation over two scalar types (`INTEGER`, `BOOLEAN`) with
//! three-valued NULL semantics.
//!
//! The crate exposes two entry points: [`parse`] turns SQL text into a
//! [`Statement`], and [`Executor::execute`] runs one against the
//! engine's catalog.
//!
//! ```rust
//! use tinysql_core::{parse, Executor};
//!
//! let mut engine = Executor::new();
//! let create = parse("CREATE TABLE t (a INTEGER)").unwrap();
//! engine.execute(create).unwrap();
//! let insert = parse("INSERT INTO t VALUES (1), (2)").unwrap();
//! engine.execute(insert).unwrap();
//! let select = parse("SELECT a FROM t WHERE a > 1").unwrap();
//! engine.execute(select).unwrap();
//! ```

pub mod ast;
pub mod catalog;
pub mod context;
pub mod error;
pub mod eval;
pub mod exec;
pub mod lexer;
pub mod parser;
pub mod validate;
pub mod value;

pub use ast::{Expr, Statement};
pub use error::{EngineError, Result};
pub use exec::{ExecOutcome, Executor};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser};
pub use value::{Type, Value};

/// Parses a single SQL statement.
///
/// # Errors
///
/// Fails if `text` is not a syntactically valid statement from the
/// supported grammar (see [`parser`] for the full list).
pub fn parse(text: &str) -> Result<Statement> {
    Parser::new(text).parse_statement().map_err(EngineError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_execute_a_full_round_trip() {
        let mut engine = Executor::new();
        engine
            .execute(parse("CREATE TABLE t (a INTEGER, b BOOLEAN)").unwrap())
            .unwrap();
        engine
            .execute(parse("INSERT INTO t VALUES (1, TRUE), (2, FALSE)").unwrap())
            .unwrap();
        let outcome = engine
            .execute(parse("SELECT a FROM t WHERE b = TRUE").unwrap())
            .unwrap();
        assert_eq!(
            outcome,
            ExecOutcome::Rows {
                column_names: Some(vec!["a".to_string()]),
                rows: vec![vec![Value::Integer(1)]],
            }
        );
    }

    #[test]
    fn parse_rejects_invalid_syntax() {
        assert!(parse("SELEKT 1").is_err());
    }
}
