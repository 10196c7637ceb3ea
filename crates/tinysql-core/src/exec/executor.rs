//! The top-level statement executor.

use tracing::{debug, info};

use crate::ast::{InsertStatement, Statement};
use crate::catalog::Catalog;
use crate::error::Result;
use crate::eval::scalar::{evaluate, Environment};
use crate::exec::processor::{self, QueryResult};
use crate::value::Value;

/// The result of executing one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// A statement with no rows to return (DDL, DML).
    Ok,
    /// A `SELECT`'s result set.
    Rows {
        /// Present whenever any projection had an alias or resolved to
        /// a column name.
        column_names: Option<Vec<String>>,
        /// The projected, sorted, paginated result rows.
        rows: Vec<Vec<Value>>,
    },
}

impl From<QueryResult> for ExecOutcome {
    fn from(result: QueryResult) -> Self {
        Self::Rows {
            column_names: result.column_names,
            rows: result.rows,
        }
    }
}

/// Holds the engine's entire state: the in-memory table catalog.
///
/// Statements run one at a time against a single `Executor`; callers
/// that serve concurrent connections share one behind a lock.
#[derive(Debug, Default)]
pub struct Executor {
    catalog: Catalog,
}

impl Executor {
    /// Creates an executor over an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a single parsed statement.
    ///
    /// # Errors
    ///
    /// Fails on any validation error, type error, or division by zero
    /// encountered while executing `stmt`.
    pub fn execute(&mut self, stmt: Statement) -> Result<ExecOutcome> {
        match stmt {
            Statement::CreateTable(create) => {
                self.catalog.create(&create.table, create.columns)?;
                info!(table = %create.table, "created table");
                Ok(ExecOutcome::Ok)
            }
            Statement::DropTable(drop) => {
                self.catalog.drop(&drop.table, drop.if_exists)?;
                info!(table = %drop.table, if_exists = drop.if_exists, "dropped table");
                Ok(ExecOutcome::Ok)
            }
            Statement::InsertMultiple(insert) => {
                self.execute_insert(insert)?;
                Ok(ExecOutcome::Ok)
            }
            Statement::SelectConstant(projections) => {
                debug!("evaluating constant SELECT");
                Ok(processor::process_constant(&projections)?.into())
            }
            Statement::Select(select) => {
                debug!(table = %select.from, "processing SELECT");
                Ok(processor::process(&self.catalog, &select)?.into())
            }
        }
    }

    /// Evaluates and type-checks every value tuple before inserting
    /// any of them, so a failure partway through an `INSERT` with
    /// several value tuples leaves the table untouched.
    fn execute_insert(&mut self, insert: InsertStatement) -> Result<()> {
        let empty = crate::context::RowContext::new();
        let mut rows = Vec::with_capacity(insert.value_sets.len());
        for value_set in &insert.value_sets {
            let row: Result<Vec<Value>> = value_set
                .iter()
                .map(|expr| evaluate(expr, &Environment::Row(&empty)))
                .collect();
            let row = row?;
            self.catalog.check_insert(&insert.table, &row)?;
            rows.push(row);
        }
        let count = rows.len();
        for row in rows {
            self.catalog
                .insert(&insert.table, row)
                .expect("already validated by check_insert above");
        }
        info!(table = %insert.table, rows = count, "inserted rows");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ColumnDef, ColumnType, CreateTableStatement, DropTableStatement, Expr};

    fn create_stmt(table: &str) -> Statement {
        Statement::CreateTable(CreateTableStatement {
            table: table.to_string(),
            columns: vec![
                ColumnDef::new("a", ColumnType::Integer),
                ColumnDef::new("b", ColumnType::Boolean),
            ],
        })
    }

    #[test]
    fn create_then_select_round_trip() {
        let mut executor = Executor::new();
        executor.execute(create_stmt("t")).unwrap();
        executor
            .execute(Statement::InsertMultiple(InsertStatement {
                table: "t".to_string(),
                value_sets: vec![vec![Expr::integer(1), Expr::boolean(true)]],
            }))
            .unwrap();

        let select = Statement::Select(crate::ast::SelectStatement {
            projections: vec![crate::ast::Projection::new(Expr::column("a"))],
            from: "t".to_string(),
            alias: None,
            joins: vec![],
            where_clause: None,
            group_by: None,
            order_by: vec![],
            limit: None,
            offset: None,
        });
        let outcome = executor.execute(select).unwrap();
        assert_eq!(
            outcome,
            ExecOutcome::Rows {
                column_names: Some(vec!["a".to_string()]),
                rows: vec![vec![Value::Integer(1)]],
            }
        );
    }

    #[test]
    fn drop_unknown_table_without_if_exists_errors() {
        let mut executor = Executor::new();
        let drop = Statement::DropTable(DropTableStatement {
            table: "missing".to_string(),
            if_exists: false,
        });
        assert!(executor.execute(drop).is_err());
    }

    #[test]
    fn insert_with_bad_row_inserts_nothing() {
        let mut executor = Executor::new();
        executor.execute(create_stmt("t")).unwrap();
        let insert = Statement::InsertMultiple(InsertStatement {
            table: "t".to_string(),
            value_sets: vec![
                vec![Expr::integer(1), Expr::boolean(true)],
                vec![Expr::boolean(false), Expr::boolean(true)],
            ],
        });
        assert!(executor.execute(insert).is_err());

        let select = Statement::Select(crate::ast::SelectStatement {
            projections: vec![crate::ast::Projection::new(Expr::column("a"))],
            from: "t".to_string(),
            alias: None,
            joins: vec![],
            where_clause: None,
            group_by: None,
            order_by: vec![],
            limit: None,
            offset: None,
        });
        let outcome = executor.execute(select).unwrap();
        assert_eq!(
            outcome,
            ExecOutcome::Rows {
                column_names: Some(vec!["a".to_string()]),
                rows: vec![],
            }
        );
    }

    #[test]
    fn select_constant_executes_without_a_catalog_table() {
        let mut executor = Executor::new();
        let stmt = Statement::SelectConstant(vec![crate::ast::Projection::new(Expr::integer(1))]);
        let outcome = executor.execute(stmt).unwrap();
        assert_eq!(
            outcome,
            ExecOutcome::Rows {
                column_names: None,
                rows: vec![vec![Value::Integer(1)]],
            }
        );
    }
}
