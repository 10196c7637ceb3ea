//! Stable multi-key sorting for `ORDER BY`.

use core::cmp::Ordering;

use crate::ast::{OrderBy, OrderDirection};
use crate::value::Value;

/// Orders two [`Value`]s: NULL sorts greater than any non-NULL value;
/// `FALSE < TRUE`; comparing incompatible types is treated as equal
/// (defensive — validation should have already ruled this out).
#[must_use]
pub fn value_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Compares two rows' precomputed `ORDER BY` key vectors, one entry
/// per `order_by` clause, applying each entry's direction in turn.
#[must_use]
pub fn compare_keys(order_by: &[OrderBy], a: &[Value], b: &[Value]) -> Ordering {
    for (i, clause) in order_by.iter().enumerate() {
        let ordering = value_cmp(&a[i], &b[i]);
        let ordering = match clause.direction {
            OrderDirection::Asc => ordering,
            OrderDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
