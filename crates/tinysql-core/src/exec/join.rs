//! Join execution: builds the row contexts feeding a query from its
//! `FROM` table and `JOIN` clauses.

use crate::ast::{ColumnDef, Expr, JoinKind, JoinSpec};
use crate::catalog::Catalog;
use crate::context::{RowContext, RowContextBuilder, TableContext};
use crate::error::{EngineError, Result};
use crate::eval::scalar::{self, Environment};
use crate::value::Value;

/// Builds the schema context and per-row environments for a query's
/// `FROM` table and `JOIN` clauses.
///
/// # Errors
///
/// Fails if the driving table or any joined table is unknown, or if
/// two sources bind the same alias. Runtime errors raised while
/// evaluating a JOIN's `ON` clause are caught internally and treated
/// as "this pair does not match" rather than propagated.
pub fn build_rows(
    catalog: &Catalog,
    from_table: &str,
    from_alias: Option<&str>,
    joins: &[JoinSpec],
) -> Result<(TableContext, Vec<RowContext>)> {
    let mut table_ctx = TableContext::new();
    let base_table = catalog
        .table(from_table)
        .ok_or_else(|| EngineError::validation(format!("unknown table '{from_table}'")))?;
    let base_label = from_alias.unwrap_or(from_table).to_string();
    table_ctx.add_source(base_label.clone(), base_table.columns.clone())?;

    let mut rows: Vec<RowContext> = catalog
        .rows(from_table)?
        .iter()
        .map(|row| RowContextBuilder::single(&base_label, &base_table.columns, row))
        .collect();

    for join in joins {
        let joined_table = catalog
            .table(&join.table)
            .ok_or_else(|| EngineError::validation(format!("unknown table '{}'", join.table)))?;
        let prior_ctx = table_ctx.clone();
        let label = join
            .alias
            .clone()
            .unwrap_or_else(|| join.table.clone());
        table_ctx.add_source(label.clone(), joined_table.columns.clone())?;
        let right_rows = catalog.rows(&join.table)?;
        rows = apply_join(
            join.kind,
            &prior_ctx,
            &rows,
            &label,
            &joined_table.columns,
            right_rows,
            &join.on_expression,
        );
    }

    Ok((table_ctx, rows))
}

/// An `ON` clause evaluation error is locally a non-match, never a
/// statement failure.
fn on_matches(on_expression: &Expr, row: &RowContext) -> bool {
    matches!(
        scalar::evaluate(on_expression, &Environment::Row(row)),
        Ok(Value::Boolean(true))
    )
}

fn apply_join(
    kind: JoinKind,
    prior_ctx: &TableContext,
    left_rows: &[RowContext],
    label: &str,
    right_columns: &[ColumnDef],
    right_rows: &[Vec<Value>],
    on_expression: &Expr,
) -> Vec<RowContext> {
    let emits_left_outer = matches!(kind, JoinKind::LeftOuter | JoinKind::FullOuter);
    let emits_right_outer = matches!(kind, JoinKind::RightOuter | JoinKind::FullOuter);

    let mut result = Vec::new();
    let mut right_matched = vec![false; right_rows.len()];
    let mut unmatched_left = Vec::new();

    for left in left_rows {
        let mut matched_any = false;
        for (i, right_row) in right_rows.iter().enumerate() {
            let combined = RowContextBuilder::extend(left, label, right_columns, Some(right_row));
            if on_matches(on_expression, &combined) {
                matched_any = true;
                right_matched[i] = true;
                result.push(combined);
            }
        }
        if !matched_any {
            unmatched_left.push(left);
        }
    }

    if emits_left_outer {
        for left in unmatched_left {
            result.push(RowContextBuilder::extend(left, label, right_columns, None));
        }
    }

    if emits_right_outer {
        let null_left = prior_ctx.null_row();
        for (i, right_row) in right_rows.iter().enumerate() {
            if !right_matched[i] {
                result.push(RowContextBuilder::extend(
                    &null_left,
                    label,
                    right_columns,
                    Some(right_row),
                ));
            }
        }
    }

    result
}
