//! Abstract Syntax Tree (AST) types for SQL statements.

mod expression;
mod statement;
mod types;

pub use expression::{BinaryOp, Expr, UnaryOp};
pub use statement::{
    CreateTableStatement, DropTableStatement, InsertStatement, JoinKind, JoinSpec, OrderBy,
    OrderDirection, Projection, SelectStatement, Statement,
};
pub use types::{ColumnDef, ColumnType};
