//! Query processor: the filter → group → project → sort → offset/limit
//! pipeline shared by simple and JOIN `SELECT` queries.
//!
//! A single [`RowContext`] sequence from [`crate::exec::join::build_rows`]
//! already covers both shapes: with no joins it is exactly the "Simple"
//! per-row environment; with joins it is the multi-source environment.

use crate::ast::{Expr, OrderBy, Projection, SelectStatement};
use crate::catalog::Catalog;
use crate::context::{RowContext, TableContext};
use crate::error::{EngineError, Result};
use crate::eval::aggregate::contains_aggregate;
use crate::eval::scalar::{evaluate, Environment};
use crate::exec::group::{explicit_groups, implicit_group, Group};
use crate::exec::join::build_rows;
use crate::exec::sort::compare_keys;
use crate::validate::ValidationContext;
use crate::value::Value;

/// The result of executing a full `SELECT`.
pub struct QueryResult {
    /// Present whenever any projection had an alias or resolved to a
    /// column name.
    pub column_names: Option<Vec<String>>,
    /// The projected, sorted, paginated result rows.
    pub rows: Vec<Vec<Value>>,
}

/// One unit of projection evaluation: either a single ungrouped row,
/// or a group of rows evaluated together (explicit or implicit).
enum Bucket {
    Row(RowContext),
    Group(Group),
}

impl Bucket {
    fn environment(&self) -> Environment<'_> {
        match self {
            Self::Row(row) => Environment::Row(row),
            Self::Group(group) => Environment::Group(&group.rows),
        }
    }
}

/// Runs the full pipeline for `stmt` against `catalog`.
///
/// # Errors
///
/// Fails on any validation error from the statement's schema, or any
/// evaluation error while filtering, grouping, projecting, or sorting.
pub fn process(catalog: &Catalog, stmt: &SelectStatement) -> Result<QueryResult> {
    let (table_ctx, rows) = build_rows(catalog, &stmt.from, stmt.alias.as_deref(), &stmt.joins)?;

    let mut stmt = stmt.clone();
    stmt.projections = expand_wildcards(&table_ctx, &stmt.projections);
    let stmt = &stmt;

    let mut vctx = ValidationContext::new(table_ctx);
    let order_by = vctx.validate_select(stmt)?;

    let filtered = filter_rows(rows, stmt.where_clause.as_ref())?;

    let has_aggregate = stmt
        .projections
        .iter()
        .any(|p| contains_aggregate(&p.expression));

    let buckets: Vec<Bucket> = if let Some(group_expr) = &stmt.group_by {
        explicit_groups(filtered, group_expr)?
            .into_iter()
            .map(Bucket::Group)
            .collect()
    } else if has_aggregate {
        vec![Bucket::Group(implicit_group(filtered))]
    } else {
        filtered.into_iter().map(Bucket::Row).collect()
    };

    let mut projected: Vec<(Vec<Value>, Vec<Value>)> = Vec::with_capacity(buckets.len());
    for bucket in &buckets {
        let env = bucket.environment();
        let row = project_row(&stmt.projections, &env)?;
        let key = sort_key(&order_by, &env)?;
        projected.push((row, key));
    }

    projected.sort_by(|(_, a), (_, b)| compare_keys(&order_by, a, b));

    let offset = eval_pagination(stmt.offset.as_ref())?.unwrap_or(0);
    let limit = eval_pagination(stmt.limit.as_ref())?;

    let mut rows: Vec<Vec<Value>> = projected.into_iter().map(|(row, _)| row).collect();
    let rows = if offset >= rows.len() {
        Vec::new()
    } else {
        rows.split_off(offset)
    };
    let rows = match limit {
        Some(limit) if limit < rows.len() => rows[..limit].to_vec(),
        _ => rows,
    };

    Ok(QueryResult {
        column_names: Some(select_column_names(&stmt.projections)),
        rows,
    })
}

/// Validates and evaluates a `SELECT` with no `FROM` clause.
///
/// # Errors
///
/// Fails on a column/aggregate reference (disallowed with no source of
/// rows) or any evaluation error.
pub fn process_constant(projections: &[Projection]) -> Result<QueryResult> {
    ValidationContext::validate_select_constant(projections)?;
    let empty = RowContext::new();
    let row = project_row(projections, &Environment::Row(&empty))?;
    Ok(QueryResult {
        column_names: constant_column_names(projections),
        rows: vec![row],
    })
}

fn filter_rows(rows: Vec<RowContext>, where_clause: Option<&Expr>) -> Result<Vec<RowContext>> {
    let Some(predicate) = where_clause else {
        return Ok(rows);
    };
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        if matches!(
            evaluate(predicate, &Environment::Row(&row))?,
            Value::Boolean(true)
        ) {
            kept.push(row);
        }
    }
    Ok(kept)
}

fn project_row(projections: &[Projection], env: &Environment<'_>) -> Result<Vec<Value>> {
    projections
        .iter()
        .map(|p| evaluate(&p.expression, env))
        .collect()
}

fn sort_key(order_by: &[OrderBy], env: &Environment<'_>) -> Result<Vec<Value>> {
    order_by.iter().map(|o| evaluate(&o.expr, env)).collect()
}

/// `LIMIT`/`OFFSET` are evaluated once with an empty environment; NULL
/// means "absent" (unlimited `LIMIT`, zero `OFFSET`), and negative
/// values clamp to zero.
fn eval_pagination(expr: Option<&Expr>) -> Result<Option<usize>> {
    let Some(expr) = expr else {
        return Ok(None);
    };
    let empty = RowContext::new();
    match evaluate(expr, &Environment::Row(&empty))? {
        Value::Integer(n) => Ok(Some(usize::try_from(n).unwrap_or(0))),
        Value::Null => Ok(None),
        Value::Boolean(_) => Err(EngineError::validation(
            "LIMIT/OFFSET must evaluate to Integer or NULL",
        )),
    }
}

/// Expands any `*` projection into one qualified-column projection per
/// in-scope column, in `FROM`/`JOIN` order. Non-wildcard projections
/// pass through unchanged.
fn expand_wildcards(table_ctx: &TableContext, projections: &[Projection]) -> Vec<Projection> {
    let mut expanded = Vec::with_capacity(projections.len());
    for p in projections {
        if matches!(p.expression, Expr::Wildcard { .. }) {
            for (table, name) in table_ctx.expand_wildcard() {
                expanded.push(Projection::new(Expr::qualified_column(table, name)));
            }
        } else {
            expanded.push(p.clone());
        }
    }
    expanded
}

/// The wire name for one projection: its `AS` alias, the (possibly
/// qualified) column name it resolved to, or else its textual form.
fn projection_name(p: &Projection) -> String {
    if let Some(alias) = &p.alias {
        alias.clone()
    } else {
        match &p.expression {
            Expr::Column { name, .. } | Expr::QualifiedColumn { name, .. } => name.clone(),
            other => other.to_string(),
        }
    }
}

/// A `FROM`-based `SELECT` always reports `column_names`, per spec.md
/// §6.2/§8 scenario 6 — even a query with no aliased or column-valued
/// projections (e.g. `SELECT COUNT(a), SUM(a) FROM u WHERE ...`) still
/// has a named result set.
fn select_column_names(projections: &[Projection]) -> Vec<String> {
    projections.iter().map(projection_name).collect()
}

/// `column_names` is present for a no-`FROM` `SELECT` only when some
/// projection had an `AS` alias or resolved to a column name.
fn constant_column_names(projections: &[Projection]) -> Option<Vec<String>> {
    let any_named = projections.iter().any(|p| {
        p.alias.is_some()
            || matches!(
                p.expression,
                Expr::Column { .. } | Expr::QualifiedColumn { .. }
            )
    });
    any_named.then(|| select_column_names(projections))
}
