//! SQL Parser
//!
//! A hand-written recursive-descent parser with a Pratt expression
//! parser for a small SQL dialect:
//!
//! | Statement | Notes |
//! |-----------|-------|
//! | `CREATE TABLE` | `name (col_def, ...)`, `col_def := name (INTEGER\|BOOLEAN)` |
//! | `DROP TABLE` | optional `IF EXISTS` |
//! | `INSERT INTO ... VALUES` | one or more value tuples |
//! | `SELECT` | with no `FROM` (`SelectConstant`), or full `SELECT ... FROM ...` |
//!
//! # SELECT clauses
//!
//! Projection list (with optional `AS alias`), `FROM` with optional
//! alias, zero or more `JOIN`s, `WHERE`, `GROUP BY`, `ORDER BY`
//! (`ASC`/`DESC`), `LIMIT`, `OFFSET`.
//!
//! # JOINs
//!
//! `INNER JOIN`, `LEFT OUTER JOIN`, `RIGHT OUTER JOIN`,
//! `FULL OUTER JOIN`, each with a required `ON` condition. No
//! `USING`, no `CROSS JOIN`, no subqueries in the `FROM` clause.
//!
//! # Expressions
//!
//! Integer, boolean, and `NULL` literals; unqualified and
//! table-qualified column references; `+ - * /`; `< > <= >= = <>`;
//! `AND`/`OR`; unary `-`/`NOT`; `IS [NOT] NULL` as a postfix test;
//! `ABS(x)`/`MOD(x, y)` scalar functions; `COUNT(x)`/`COUNT(*)`/`SUM(x)`
//! aggregate functions; any other `name(...)` as a generic scalar
//! function (rejected later if unknown).
//!
//! # Not supported
//!
//! `UPDATE`, `DELETE`, subqueries, `CASE`, `CAST`, parameter
//! placeholders, `DISTINCT`, `HAVING`, set operations, window
//! functions, common table expressions.

mod error;
mod parser;
mod pratt;

pub use error::ParseError;
pub use parser::Parser;
