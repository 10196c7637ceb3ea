//! Aggregate function registry and evaluation.

use crate::ast::Expr;
use crate::context::RowContext;
use crate::error::{EngineError, Result};
use crate::eval::scalar::{self, Environment};
use crate::value::{Type, Value};

/// Static metadata for a named aggregate function.
#[derive(Debug, Clone, Copy)]
pub struct AggregateSpec {
    /// Whether the function takes an argument expression (`SUM(x)`) or
    /// none (`COUNT(*)`/`COUNT()`).
    pub requires_argument: bool,
    /// The required type of the argument, when one is required.
    pub argument_type: Option<Type>,
    /// The type of the function's result.
    pub return_type: Type,
}

/// Looks up the metadata for a named aggregate function.
#[must_use]
pub fn spec(name: &str) -> Option<AggregateSpec> {
    match name {
        "count" => Some(AggregateSpec {
            requires_argument: false,
            argument_type: None,
            return_type: Type::Integer,
        }),
        "sum" => Some(AggregateSpec {
            requires_argument: true,
            argument_type: Some(Type::Integer),
            return_type: Type::Integer,
        }),
        _ => None,
    }
}

/// The value a named aggregate function takes over an empty group (no
/// rows, or no non-NULL argument values).
#[must_use]
pub fn default_value(name: &str) -> Value {
    if name == "count" {
        Value::Integer(0)
    } else {
        Value::Null
    }
}

/// Returns `true` if `expr` contains a nested aggregate function call
/// anywhere in its tree.
#[must_use]
pub fn contains_aggregate(expr: &Expr) -> bool {
    match expr {
        Expr::AggregateFunction { .. } => true,
        Expr::Literal(_)
        | Expr::Column { .. }
        | Expr::QualifiedColumn { .. }
        | Expr::Wildcard { .. } => false,
        Expr::UnaryOp { operand, .. } => contains_aggregate(operand),
        Expr::BinaryOp { left, right, .. } => {
            contains_aggregate(left) || contains_aggregate(right)
        }
        Expr::Function { args, .. } => args.iter().any(contains_aggregate),
        Expr::IsNull { expr, .. } => contains_aggregate(expr),
    }
}

/// Evaluates a named aggregate function over a group of rows.
///
/// # Errors
///
/// Fails if `name` is not a known aggregate, the argument count does
/// not match what the function requires, an argument expression
/// contains a nested aggregate call, or a non-NULL argument evaluation
/// is not the expected type.
pub fn evaluate(name: &str, args: &[Expr], rows: &[RowContext]) -> Result<Value> {
    let spec = spec(name).ok_or_else(|| {
        EngineError::validation(format!("unknown aggregate function '{name}'"))
    })?;

    if spec.requires_argument && args.len() != 1 {
        return Err(EngineError::validation(format!(
            "{name} requires exactly one argument"
        )));
    }
    if !spec.requires_argument && !args.is_empty() {
        return Err(EngineError::validation(format!(
            "{name} takes no arguments"
        )));
    }
    if args.iter().any(contains_aggregate) {
        return Err(EngineError::validation(
            "nested aggregate functions are not allowed".to_string(),
        ));
    }

    if rows.is_empty() {
        return Ok(default_value(name));
    }

    match name {
        "count" => evaluate_count(args, rows),
        "sum" => evaluate_sum(&args[0], rows, spec.argument_type),
        _ => unreachable!("unknown aggregates are rejected above"),
    }
}

fn evaluate_count(args: &[Expr], rows: &[RowContext]) -> Result<Value> {
    let Some(arg) = args.first() else {
        return Ok(Value::Integer(i64::try_from(rows.len()).unwrap_or(i64::MAX)));
    };
    let mut count: i64 = 0;
    for row in rows {
        let value = scalar::evaluate(arg, &Environment::Row(row))?;
        if !value.is_null() {
            count += 1;
        }
    }
    Ok(Value::Integer(count))
}

fn evaluate_sum(arg: &Expr, rows: &[RowContext], expected: Option<Type>) -> Result<Value> {
    let mut total: i64 = 0;
    let mut any_non_null = false;
    for row in rows {
        let value = scalar::evaluate(arg, &Environment::Row(row))?;
        match value {
            Value::Null => {}
            Value::Integer(n) if expected == Some(Type::Integer) => {
                total += n;
                any_non_null = true;
            }
            _ => {
                return Err(EngineError::validation(
                    "SUM requires an Integer-valued argument".to_string(),
                ))
            }
        }
    }
    if any_non_null {
        Ok(Value::Integer(total))
    } else {
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ColumnDef, ColumnType};
    use crate::context::RowContextBuilder;

    fn rows_of(values: &[i64]) -> Vec<RowContext> {
        let columns = vec![ColumnDef::new("n", ColumnType::Integer)];
        values
            .iter()
            .map(|&n| RowContextBuilder::single("t", &columns, &[Value::Integer(n)]))
            .collect()
    }

    #[test]
    fn count_star_counts_rows() {
        let rows = rows_of(&[1, 2, 3]);
        let result = evaluate("count", &[], &rows).unwrap();
        assert_eq!(result, Value::Integer(3));
    }

    #[test]
    fn count_empty_group_is_zero() {
        let result = evaluate("count", &[], &[]).unwrap();
        assert_eq!(result, Value::Integer(0));
    }

    #[test]
    fn sum_empty_group_is_null() {
        let result = evaluate("sum", &[Expr::column("n")], &[]).unwrap();
        assert_eq!(result, Value::Null);
    }

    #[test]
    fn sum_ignores_nulls_but_counts_non_null() {
        let columns = vec![ColumnDef::new("n", ColumnType::Integer)];
        let rows = vec![
            RowContextBuilder::single("t", &columns, &[Value::Integer(5)]),
            RowContextBuilder::single("t", &columns, &[Value::Null]),
        ];
        let result = evaluate("sum", &[Expr::column("n")], &rows).unwrap();
        assert_eq!(result, Value::Integer(5));
    }

    #[test]
    fn sum_of_all_nulls_is_null() {
        let columns = vec![ColumnDef::new("n", ColumnType::Integer)];
        let rows = vec![RowContextBuilder::single("t", &columns, &[Value::Null])];
        let result = evaluate("sum", &[Expr::column("n")], &rows).unwrap();
        assert_eq!(result, Value::Null);
    }

    #[test]
    fn unknown_aggregate_is_an_error() {
        let rows = rows_of(&[1]);
        assert!(evaluate("avg", &[], &rows).is_err());
    }

    #[test]
    fn sum_requires_exactly_one_argument() {
        let rows = rows_of(&[1]);
        assert!(evaluate("sum", &[], &rows).is_err());
    }

    #[test]
    fn nested_aggregates_are_rejected() {
        let rows = rows_of(&[1]);
        let nested = Expr::AggregateFunction {
            name: "count".to_string(),
            args: vec![],
        };
        assert!(evaluate("sum", &[nested], &rows).is_err());
    }
}
