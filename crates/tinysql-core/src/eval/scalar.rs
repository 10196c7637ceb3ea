//! Scalar expression evaluation under three-valued (Kleene) logic.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::context::RowContext;
use crate::error::{EngineError, Result};
use crate::value::Value;

/// The environment an expression is evaluated against: a single row,
/// or a group of rows when the expression may contain aggregates.
pub enum Environment<'a> {
    /// A single-row environment (WHERE, JOIN ON, non-grouped projections).
    Row(&'a RowContext),
    /// A group of rows (projections under explicit or implicit
    /// grouping). Non-aggregate column references use the first row,
    /// which validation guarantees is constant across the group.
    Group(&'a [RowContext]),
}

impl<'a> Environment<'a> {
    fn representative_row(&self) -> Option<&RowContext> {
        match self {
            Self::Row(row) => Some(row),
            Self::Group(rows) => rows.first(),
        }
    }
}

fn type_error(message: impl Into<String>) -> EngineError {
    EngineError::validation(message.into())
}

/// Evaluates `expr` under `env`.
///
/// # Errors
///
/// Fails on an unresolvable column, a type mismatch between an
/// operator and its operands, an unknown function, or (for `/` and
/// `MOD`) a non-NULL zero divisor.
pub fn evaluate(expr: &Expr, env: &Environment<'_>) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok(*value),

        Expr::Column { name, .. } => {
            let row = env
                .representative_row()
                .ok_or_else(|| type_error("no rows to evaluate column reference against"))?;
            row.get_bare(name)
        }

        Expr::QualifiedColumn { table, name, .. } => {
            let row = env
                .representative_row()
                .ok_or_else(|| type_error("no rows to evaluate column reference against"))?;
            row.get_qualified(table, name)
        }

        Expr::UnaryOp { op, operand } => eval_unary(*op, evaluate(operand, env)?),

        Expr::BinaryOp { op, left, right } => eval_binary(*op, left, right, env),

        Expr::Function { name, args } => eval_function(name, args, env),

        Expr::AggregateFunction { name, args } => match env {
            Environment::Group(rows) => crate::eval::aggregate::evaluate(name, args, rows),
            Environment::Row(_) => Err(type_error("aggregate functions are not allowed here")),
        },

        Expr::IsNull { expr, negated } => {
            let value = evaluate(expr, env)?;
            Ok(Value::Boolean(value.is_null() != *negated))
        }

        Expr::Wildcard { .. } => Err(type_error(
            "* is only allowed as a whole projection of a SELECT with a FROM clause",
        )),
    }
}

fn eval_binary(op: BinaryOp, left: &Expr, right: &Expr, env: &Environment<'_>) -> Result<Value> {
    match op {
        BinaryOp::And => eval_and(left, right, env),
        BinaryOp::Or => eval_or(left, right, env),
        _ if op.is_arithmetic() => {
            let l = evaluate(left, env)?;
            let r = evaluate(right, env)?;
            eval_arithmetic(op, l, r)
        }
        BinaryOp::Equal | BinaryOp::NotEqual => {
            let l = evaluate(left, env)?;
            let r = evaluate(right, env)?;
            eval_equality(op, l, r)
        }
        _ if op.is_comparison() => {
            let l = evaluate(left, env)?;
            let r = evaluate(right, env)?;
            eval_ordering(op, l, r)
        }
        _ => unreachable!("And/Or handled above"),
    }
}

/// `FALSE AND x = FALSE` without evaluating `x`; otherwise Kleene AND.
fn eval_and(left: &Expr, right: &Expr, env: &Environment<'_>) -> Result<Value> {
    match evaluate(left, env)? {
        Value::Boolean(false) => Ok(Value::Boolean(false)),
        Value::Boolean(true) => match evaluate(right, env)? {
            Value::Boolean(b) => Ok(Value::Boolean(b)),
            Value::Null => Ok(Value::Null),
            Value::Integer(_) => Err(type_error("AND requires Boolean operands")),
        },
        Value::Null => match evaluate(right, env)? {
            Value::Boolean(false) => Ok(Value::Boolean(false)),
            Value::Boolean(true) | Value::Null => Ok(Value::Null),
            Value::Integer(_) => Err(type_error("AND requires Boolean operands")),
        },
        Value::Integer(_) => Err(type_error("AND requires Boolean operands")),
    }
}

/// `TRUE OR x = TRUE` without evaluating `x`; otherwise Kleene OR.
fn eval_or(left: &Expr, right: &Expr, env: &Environment<'_>) -> Result<Value> {
    match evaluate(left, env)? {
        Value::Boolean(true) => Ok(Value::Boolean(true)),
        Value::Boolean(false) => match evaluate(right, env)? {
            Value::Boolean(b) => Ok(Value::Boolean(b)),
            Value::Null => Ok(Value::Null),
            Value::Integer(_) => Err(type_error("OR requires Boolean operands")),
        },
        Value::Null => match evaluate(right, env)? {
            Value::Boolean(true) => Ok(Value::Boolean(true)),
            Value::Boolean(false) | Value::Null => Ok(Value::Null),
            Value::Integer(_) => Err(type_error("OR requires Boolean operands")),
        },
        Value::Integer(_) => Err(type_error("OR requires Boolean operands")),
    }
}

fn eval_arithmetic(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    let (Value::Integer(a), Value::Integer(b)) = (left, right) else {
        return Err(type_error("arithmetic operators require Integer operands"));
    };
    match op {
        BinaryOp::Plus => Ok(Value::Integer(a.wrapping_add(b))),
        BinaryOp::Minus => Ok(Value::Integer(a.wrapping_sub(b))),
        BinaryOp::Star => Ok(Value::Integer(a.wrapping_mul(b))),
        BinaryOp::Slash => {
            if b == 0 {
                Err(EngineError::DivisionByZero)
            } else {
                Ok(Value::Integer(a / b))
            }
        }
        _ => unreachable!("not an arithmetic operator"),
    }
}

fn eval_ordering(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    let ordering = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a.cmp(&b),
        (Value::Boolean(a), Value::Boolean(b)) => a.cmp(&b),
        _ => return Err(type_error("comparison operands must be the same type")),
    };
    let result = match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::Lte => ordering.is_le(),
        BinaryOp::Gte => ordering.is_ge(),
        _ => unreachable!("not an ordering operator"),
    };
    Ok(Value::Boolean(result))
}

fn eval_equality(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    let equal = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        _ => return Err(type_error("equality operands must be the same type")),
    };
    Ok(Value::Boolean(if op == BinaryOp::Equal {
        equal
    } else {
        !equal
    }))
}

fn eval_unary(op: UnaryOp, operand: Value) -> Result<Value> {
    match (op, operand) {
        (UnaryOp::Minus, Value::Null) | (UnaryOp::Not, Value::Null) => Ok(Value::Null),
        (UnaryOp::Minus, Value::Integer(n)) => Ok(Value::Integer(-n)),
        (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (UnaryOp::Minus, Value::Boolean(_)) => Err(type_error("unary '-' requires an Integer")),
        (UnaryOp::Not, Value::Integer(_)) => Err(type_error("NOT requires a Boolean")),
    }
}

fn eval_function(name: &str, args: &[Expr], env: &Environment<'_>) -> Result<Value> {
    match name {
        "abs" => {
            let [arg] = args else {
                return Err(type_error("ABS takes exactly one argument"));
            };
            match evaluate(arg, env)? {
                Value::Null => Ok(Value::Null),
                Value::Integer(n) => Ok(Value::Integer(n.abs())),
                Value::Boolean(_) => Err(type_error("ABS requires an Integer argument")),
            }
        }
        "mod" => {
            let [left, right] = args else {
                return Err(type_error("MOD takes exactly two arguments"));
            };
            let l = evaluate(left, env)?;
            let r = evaluate(right, env)?;
            if l.is_null() || r.is_null() {
                return Ok(Value::Null);
            }
            let (Value::Integer(a), Value::Integer(b)) = (l, r) else {
                return Err(type_error("MOD requires Integer arguments"));
            };
            if b == 0 {
                Err(EngineError::DivisionByZero)
            } else {
                Ok(Value::Integer(a % b))
            }
        }
        _ => Err(type_error(format!("unknown function '{name}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ColumnDef;
    use crate::context::RowContextBuilder;

    fn row(values: &[Value]) -> RowContext {
        let columns: Vec<ColumnDef> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                ColumnDef::new(
                    format!("c{i}"),
                    match v {
                        Value::Boolean(_) => crate::ast::ColumnType::Boolean,
                        _ => crate::ast::ColumnType::Integer,
                    },
                )
            })
            .collect();
        RowContextBuilder::single("t", &columns, values)
    }

    #[test]
    fn arithmetic_null_propagates() {
        let ctx = row(&[]);
        let env = Environment::Row(&ctx);
        let expr = Expr::null().binary(BinaryOp::Plus, Expr::integer(1));
        assert_eq!(evaluate(&expr, &env).unwrap(), Value::Null);
    }

    #[test]
    fn division_by_zero_errors() {
        let ctx = row(&[]);
        let env = Environment::Row(&ctx);
        let expr = Expr::integer(1).binary(BinaryOp::Slash, Expr::integer(0));
        assert_eq!(evaluate(&expr, &env).unwrap_err(), EngineError::DivisionByZero);
    }

    #[test]
    fn false_and_null_is_false() {
        let ctx = row(&[]);
        let env = Environment::Row(&ctx);
        let expr = Expr::boolean(false).and(Expr::null());
        assert_eq!(evaluate(&expr, &env).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn true_and_null_is_null() {
        let ctx = row(&[]);
        let env = Environment::Row(&ctx);
        let expr = Expr::boolean(true).and(Expr::null());
        assert_eq!(evaluate(&expr, &env).unwrap(), Value::Null);
    }

    #[test]
    fn true_or_anything_is_true() {
        let ctx = row(&[]);
        let env = Environment::Row(&ctx);
        let expr = Expr::boolean(true).or(Expr::null());
        assert_eq!(evaluate(&expr, &env).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn false_or_null_is_null() {
        let ctx = row(&[]);
        let env = Environment::Row(&ctx);
        let expr = Expr::boolean(false).or(Expr::null());
        assert_eq!(evaluate(&expr, &env).unwrap(), Value::Null);
    }

    #[test]
    fn boolean_ordering_false_lt_true() {
        let ctx = row(&[]);
        let env = Environment::Row(&ctx);
        let expr = Expr::boolean(false).binary(BinaryOp::Lt, Expr::boolean(true));
        assert_eq!(evaluate(&expr, &env).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn is_null_and_is_not_null() {
        let ctx = row(&[]);
        let env = Environment::Row(&ctx);
        assert_eq!(
            evaluate(&Expr::null().is_null(), &env).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            evaluate(&Expr::integer(1).is_not_null(), &env).unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn abs_and_mod() {
        let ctx = row(&[]);
        let env = Environment::Row(&ctx);
        let abs_expr = Expr::Function {
            name: "abs".to_string(),
            args: vec![Expr::integer(-5)],
        };
        assert_eq!(evaluate(&abs_expr, &env).unwrap(), Value::Integer(5));

        let mod_expr = Expr::Function {
            name: "mod".to_string(),
            args: vec![Expr::integer(7), Expr::integer(0)],
        };
        assert_eq!(
            evaluate(&mod_expr, &env).unwrap_err(),
            EngineError::DivisionByZero
        );
    }

    #[test]
    fn equality_rejects_mixed_types() {
        let ctx = row(&[]);
        let env = Environment::Row(&ctx);
        let expr = Expr::integer(1).eq(Expr::boolean(true));
        assert!(evaluate(&expr, &env).is_err());
    }
}
