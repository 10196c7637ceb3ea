//! Schema-aware semantic validation.
//!
//! Validation runs against a [`TableContext`] built by the caller (the
//! query processor) from the catalog and a statement's `FROM`/`JOIN`
//! clauses. It never touches stored rows: every check type-checks
//! expressions against a dummy row of representative values for each
//! declared column type.

use crate::ast::{Expr, OrderBy, Projection, SelectStatement};
use crate::context::{RowContext, TableContext};
use crate::error::{EngineError, Result};
use crate::eval::aggregate::contains_aggregate;
use crate::eval::scalar::{self, Environment};
use crate::value::Type;

fn validation(message: impl Into<String>) -> EngineError {
    EngineError::validation(message.into())
}

/// Binds a query's table schema and projection aliases for validation.
pub struct ValidationContext {
    table_ctx: TableContext,
    dummy_row: RowContext,
    aliases: Vec<(String, Expr)>,
}

impl ValidationContext {
    /// Creates a validation context over `table_ctx`.
    #[must_use]
    pub fn new(table_ctx: TableContext) -> Self {
        let dummy_row = table_ctx.dummy_row();
        Self {
            table_ctx,
            dummy_row,
            aliases: Vec::new(),
        }
    }

    fn type_of(&self, expr: &Expr, allow_aggregates: bool) -> Result<Type> {
        let env = if allow_aggregates {
            Environment::Group(std::slice::from_ref(&self.dummy_row))
        } else {
            Environment::Row(&self.dummy_row)
        };
        scalar::evaluate(expr, &env).map(|v| v.value_type())
    }

    fn type_of_empty(&self, expr: &Expr) -> Result<Type> {
        let empty = RowContext::new();
        scalar::evaluate(expr, &Environment::Row(&empty)).map(|v| v.value_type())
    }

    /// Validates a `SELECT` with no `FROM` clause: every projection
    /// must type-check against an empty environment (no columns, no
    /// aggregates are possible without a source of rows).
    ///
    /// # Errors
    ///
    /// Fails if any projection references a column or aggregate.
    pub fn validate_select_constant(projections: &[Projection]) -> Result<()> {
        let empty = RowContext::new();
        for projection in projections {
            scalar::evaluate(&projection.expression, &Environment::Row(&empty))?;
        }
        Ok(())
    }

    /// Validates a full `SELECT ... FROM ...` statement against this
    /// context's schema, returning the resolved `ORDER BY` list (bare
    /// alias references replaced by their underlying expression).
    ///
    /// # Errors
    ///
    /// Fails on any unresolved/ambiguous column, a type mismatch, a
    /// misplaced or forbidden aggregate, an invalid `GROUP BY`
    /// projection, a disallowed nested alias, or a `LIMIT`/`OFFSET`
    /// expression that references a column.
    pub fn validate_select(&mut self, stmt: &SelectStatement) -> Result<Vec<OrderBy>> {
        self.aliases = stmt
            .projections
            .iter()
            .filter_map(|p| p.alias.clone().map(|a| (a, p.expression.clone())))
            .collect();

        for projection in &stmt.projections {
            self.type_of(&projection.expression, true)?;
        }

        if let Some(where_clause) = &stmt.where_clause {
            self.check_boolean_no_aggregate(where_clause, "WHERE")?;
        }

        for join in &stmt.joins {
            self.check_boolean_no_aggregate(&join.on_expression, "JOIN ON")?;
        }

        if let Some(group_expr) = &stmt.group_by {
            self.type_of(group_expr, false)?;
            for projection in &stmt.projections {
                if !projection_satisfies_group(&self.table_ctx, group_expr, &projection.expression)
                {
                    return Err(validation(format!(
                        "projection '{}' is neither the GROUP BY expression, an aggregate, nor built only from its columns",
                        projection.expression
                    )));
                }
            }
        } else if stmt.projections.iter().any(|p| contains_aggregate(&p.expression)) {
            for projection in &stmt.projections {
                if !contains_aggregate(&projection.expression)
                    && !matches!(projection.expression, Expr::Literal(_))
                {
                    return Err(validation(
                        "a query with an aggregate and no GROUP BY may only project aggregates or literals",
                    ));
                }
            }
        }

        let mut resolved_order_by = Vec::with_capacity(stmt.order_by.len());
        for order in &stmt.order_by {
            let expr = self.resolve_order_by_expr(&order.expr);
            self.type_of(&expr, true)?;
            resolved_order_by.push(OrderBy {
                expr,
                direction: order.direction,
            });
        }

        if let Some(limit) = &stmt.limit {
            self.check_limit_offset(limit, "LIMIT")?;
        }
        if let Some(offset) = &stmt.offset {
            self.check_limit_offset(offset, "OFFSET")?;
        }

        Ok(resolved_order_by)
    }

    fn check_boolean_no_aggregate(&self, expr: &Expr, clause: &str) -> Result<()> {
        let ty = self.type_of(expr, false)?;
        if matches!(ty, Type::Boolean | Type::Unknown) {
            Ok(())
        } else {
            Err(validation(format!("{clause} must evaluate to Boolean")))
        }
    }

    fn check_limit_offset(&self, expr: &Expr, clause: &str) -> Result<()> {
        let ty = self.type_of_empty(expr)?;
        if matches!(ty, Type::Integer | Type::Unknown) {
            Ok(())
        } else {
            Err(validation(format!("{clause} must evaluate to Integer")))
        }
    }

    /// A bare `ORDER BY` column matching a projection alias resolves to
    /// that projection's expression. Any other reference is left
    /// untouched and validated normally, so an alias used inside a
    /// larger expression (which is not a real column) fails as an
    /// unresolved column reference.
    fn resolve_order_by_expr(&self, expr: &Expr) -> Expr {
        if let Expr::Column { name, .. } = expr {
            if let Some((_, aliased)) = self.aliases.iter().find(|(a, _)| a.eq_ignore_ascii_case(name))
            {
                return aliased.clone();
            }
        }
        expr.clone()
    }
}

fn exprs_equivalent(table_ctx: &TableContext, a: &Expr, b: &Expr) -> bool {
    match (a, b) {
        (Expr::Literal(x), Expr::Literal(y)) => x == y,
        (Expr::Column { name: n1, .. }, Expr::Column { name: n2, .. }) => {
            n1.eq_ignore_ascii_case(n2)
        }
        (Expr::QualifiedColumn { table: t1, name: n1, .. }, Expr::QualifiedColumn { table: t2, name: n2, .. }) => {
            t1.eq_ignore_ascii_case(t2) && n1.eq_ignore_ascii_case(n2)
        }
        (Expr::Column { name, .. }, Expr::QualifiedColumn { table, name: qname, .. })
        | (Expr::QualifiedColumn { table, name: qname, .. }, Expr::Column { name, .. }) => {
            name.eq_ignore_ascii_case(qname)
                && table_ctx
                    .only_source_of(name)
                    .is_some_and(|owner| owner.eq_ignore_ascii_case(table))
        }
        (
            Expr::BinaryOp { op: op1, left: l1, right: r1 },
            Expr::BinaryOp { op: op2, left: l2, right: r2 },
        ) => op1 == op2 && exprs_equivalent(table_ctx, l1, l2) && exprs_equivalent(table_ctx, r1, r2),
        (Expr::UnaryOp { op: op1, operand: o1 }, Expr::UnaryOp { op: op2, operand: o2 }) => {
            op1 == op2 && exprs_equivalent(table_ctx, o1, o2)
        }
        (
            Expr::Function { name: n1, args: a1 },
            Expr::Function { name: n2, args: a2 },
        )
        | (
            Expr::AggregateFunction { name: n1, args: a1 },
            Expr::AggregateFunction { name: n2, args: a2 },
        ) => {
            n1.eq_ignore_ascii_case(n2)
                && a1.len() == a2.len()
                && a1.iter().zip(a2).all(|(x, y)| exprs_equivalent(table_ctx, x, y))
        }
        (Expr::IsNull { expr: e1, negated: n1 }, Expr::IsNull { expr: e2, negated: n2 }) => {
            n1 == n2 && exprs_equivalent(table_ctx, e1, e2)
        }
        _ => false,
    }
}

/// Does `haystack` reference, as a leaf column anywhere in its tree, a
/// column equivalent to the bare/qualified column `needle`?
fn contains_equivalent_column(table_ctx: &TableContext, haystack: &Expr, needle: &Expr) -> bool {
    if exprs_equivalent(table_ctx, haystack, needle) {
        return true;
    }
    match haystack {
        Expr::Literal(_)
        | Expr::Column { .. }
        | Expr::QualifiedColumn { .. }
        | Expr::Wildcard { .. } => false,
        Expr::UnaryOp { operand, .. } => contains_equivalent_column(table_ctx, operand, needle),
        Expr::BinaryOp { left, right, .. } => {
            contains_equivalent_column(table_ctx, left, needle)
                || contains_equivalent_column(table_ctx, right, needle)
        }
        Expr::Function { args, .. } | Expr::AggregateFunction { args, .. } => args
            .iter()
            .any(|a| contains_equivalent_column(table_ctx, a, needle)),
        Expr::IsNull { expr, .. } => contains_equivalent_column(table_ctx, expr, needle),
    }
}

/// Does `proj` satisfy GROUP BY coverage against `group_expr`: equal to
/// it outright, or built only from aggregates, literals, and columns
/// that appear somewhere inside `group_expr`?
fn projection_satisfies_group(table_ctx: &TableContext, group_expr: &Expr, proj: &Expr) -> bool {
    if exprs_equivalent(table_ctx, proj, group_expr) {
        return true;
    }
    match proj {
        Expr::Literal(_) => true,
        Expr::Column { .. } | Expr::QualifiedColumn { .. } => {
            contains_equivalent_column(table_ctx, group_expr, proj)
        }
        Expr::Wildcard { .. } => false,
        Expr::UnaryOp { operand, .. } => {
            projection_satisfies_group(table_ctx, group_expr, operand)
        }
        Expr::BinaryOp { left, right, .. } => {
            projection_satisfies_group(table_ctx, group_expr, left)
                && projection_satisfies_group(table_ctx, group_expr, right)
        }
        Expr::Function { args, .. } => args
            .iter()
            .all(|a| projection_satisfies_group(table_ctx, group_expr, a)),
        Expr::AggregateFunction { .. } => true,
        Expr::IsNull { expr, .. } => {
            projection_satisfies_group(table_ctx, group_expr, expr)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ColumnDef, ColumnType, OrderDirection};

    fn single_table_ctx() -> TableContext {
        let mut ctx = TableContext::new();
        ctx.add_source(
            "t",
            vec![
                ColumnDef::new("a", ColumnType::Integer),
                ColumnDef::new("b", ColumnType::Boolean),
            ],
        )
        .unwrap();
        ctx
    }

    fn base_select() -> SelectStatement {
        SelectStatement {
            projections: vec![Projection::new(Expr::column("a"))],
            from: "t".to_string(),
            alias: None,
            joins: vec![],
            where_clause: None,
            group_by: None,
            order_by: vec![],
            limit: None,
            offset: None,
        }
    }

    #[test]
    fn select_constant_rejects_column_reference() {
        let projections = vec![Projection::new(Expr::column("a"))];
        assert!(ValidationContext::validate_select_constant(&projections).is_err());
    }

    #[test]
    fn select_constant_accepts_literal_arithmetic() {
        let projections = vec![Projection::new(Expr::integer(1).binary(
            crate::ast::BinaryOp::Plus,
            Expr::integer(2),
        ))];
        assert!(ValidationContext::validate_select_constant(&projections).is_ok());
    }

    #[test]
    fn where_clause_rejects_aggregate() {
        let mut vctx = ValidationContext::new(single_table_ctx());
        let mut stmt = base_select();
        stmt.where_clause = Some(Expr::AggregateFunction {
            name: "count".to_string(),
            args: vec![],
        });
        assert!(vctx.validate_select(&stmt).is_err());
    }

    #[test]
    fn where_clause_requires_boolean() {
        let mut vctx = ValidationContext::new(single_table_ctx());
        let mut stmt = base_select();
        stmt.where_clause = Some(Expr::column("a"));
        assert!(vctx.validate_select(&stmt).is_err());
    }

    #[test]
    fn group_by_allows_matching_bare_column_projection() {
        let mut vctx = ValidationContext::new(single_table_ctx());
        let mut stmt = base_select();
        stmt.group_by = Some(Expr::column("a"));
        assert!(vctx.validate_select(&stmt).is_ok());
    }

    #[test]
    fn group_by_rejects_uncovered_projection() {
        let mut vctx = ValidationContext::new(single_table_ctx());
        let mut stmt = base_select();
        stmt.group_by = Some(Expr::column("a"));
        stmt.projections = vec![Projection::new(Expr::column("b"))];
        assert!(vctx.validate_select(&stmt).is_err());
    }

    #[test]
    fn group_by_allows_aggregate_projection() {
        let mut vctx = ValidationContext::new(single_table_ctx());
        let mut stmt = base_select();
        stmt.group_by = Some(Expr::column("a"));
        stmt.projections = vec![Projection::new(Expr::AggregateFunction {
            name: "count".to_string(),
            args: vec![],
        })];
        assert!(vctx.validate_select(&stmt).is_ok());
    }

    #[test]
    fn implicit_grouping_rejects_non_literal_non_aggregate_projection() {
        let mut vctx = ValidationContext::new(single_table_ctx());
        let mut stmt = base_select();
        stmt.projections = vec![
            Projection::new(Expr::column("a")),
            Projection::new(Expr::AggregateFunction {
                name: "count".to_string(),
                args: vec![],
            }),
        ];
        assert!(vctx.validate_select(&stmt).is_err());
    }

    #[test]
    fn implicit_grouping_accepts_literal_alongside_aggregate() {
        let mut vctx = ValidationContext::new(single_table_ctx());
        let mut stmt = base_select();
        stmt.projections = vec![
            Projection::new(Expr::integer(1)),
            Projection::new(Expr::AggregateFunction {
                name: "count".to_string(),
                args: vec![],
            }),
        ];
        assert!(vctx.validate_select(&stmt).is_ok());
    }

    #[test]
    fn order_by_alias_resolves_to_projection_expression() {
        let mut vctx = ValidationContext::new(single_table_ctx());
        let mut stmt = base_select();
        stmt.projections = vec![Projection::with_alias(Expr::column("a"), "total")];
        stmt.order_by = vec![OrderBy {
            expr: Expr::column("total"),
            direction: OrderDirection::Asc,
        }];
        let resolved = vctx.validate_select(&stmt).unwrap();
        assert_eq!(resolved[0].expr, Expr::column("a"));
    }

    #[test]
    fn order_by_alias_inside_larger_expression_is_rejected() {
        let mut vctx = ValidationContext::new(single_table_ctx());
        let mut stmt = base_select();
        stmt.projections = vec![Projection::with_alias(Expr::column("a"), "total")];
        stmt.order_by = vec![OrderBy {
            expr: Expr::column("total").binary(crate::ast::BinaryOp::Plus, Expr::integer(1)),
            direction: OrderDirection::Asc,
        }];
        assert!(vctx.validate_select(&stmt).is_err());
    }

    #[test]
    fn limit_rejects_column_reference() {
        let mut vctx = ValidationContext::new(single_table_ctx());
        let mut stmt = base_select();
        stmt.limit = Some(Expr::column("a"));
        assert!(vctx.validate_select(&stmt).is_err());
    }

    #[test]
    fn limit_accepts_integer_literal() {
        let mut vctx = ValidationContext::new(single_table_ctx());
        let mut stmt = base_select();
        stmt.limit = Some(Expr::integer(10));
        assert!(vctx.validate_select(&stmt).is_ok());
    }

    #[test]
    fn join_on_rejects_integer_boolean_equality() {
        let mut table_ctx = single_table_ctx();
        table_ctx
            .add_source(
                "u",
                vec![
                    ColumnDef::new("a", ColumnType::Integer),
                    ColumnDef::new("b", ColumnType::Boolean),
                ],
            )
            .unwrap();
        let mut vctx = ValidationContext::new(table_ctx);
        let mut stmt = base_select();
        stmt.projections = vec![Projection::new(Expr::qualified_column("t", "a"))];
        stmt.joins = vec![crate::ast::JoinSpec {
            kind: crate::ast::JoinKind::InnerJoin,
            table: "u".to_string(),
            alias: None,
            on_expression: Expr::qualified_column("t", "a").eq(Expr::qualified_column("u", "b")),
        }];
        assert!(vctx.validate_select(&stmt).is_err());
    }
}
