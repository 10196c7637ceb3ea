//! Grouping stages: explicit `GROUP BY` and implicit aggregate grouping.

use std::collections::HashMap;

use crate::ast::Expr;
use crate::context::RowContext;
use crate::error::Result;
use crate::eval::scalar::{evaluate, Environment};
use crate::value::Value;

/// One `GROUP BY` bucket: the shared key value and its member rows.
///
/// All NULL-keyed rows collapse into a single group.
#[derive(Debug)]
pub struct Group {
    /// The group's key value. Meaningless for implicit grouping, where
    /// there is exactly one group over the whole filtered input.
    pub key: Value,
    /// The rows belonging to this group, in first-seen order.
    pub rows: Vec<RowContext>,
}

/// Partitions `rows` by the value of `group_expr`, in first-seen key
/// order.
///
/// # Errors
///
/// Fails if evaluating `group_expr` against any row errors.
pub fn explicit_groups(rows: Vec<RowContext>, group_expr: &Expr) -> Result<Vec<Group>> {
    let mut groups: Vec<Group> = Vec::new();
    let mut null_group: Option<usize> = None;
    let mut index_of: HashMap<Value, usize> = HashMap::new();

    for row in rows {
        let key = evaluate(group_expr, &Environment::Row(&row))?;
        let idx = if key.is_null() {
            *null_group.get_or_insert_with(|| {
                groups.push(Group {
                    key: Value::Null,
                    rows: Vec::new(),
                });
                groups.len() - 1
            })
        } else {
            *index_of.entry(key).or_insert_with(|| {
                groups.push(Group {
                    key,
                    rows: Vec::new(),
                });
                groups.len() - 1
            })
        };
        groups[idx].rows.push(row);
    }

    Ok(groups)
}

/// Implicit grouping: every filtered row forms one group, even when
/// `rows` is empty.
#[must_use]
pub fn implicit_group(rows: Vec<RowContext>) -> Group {
    Group {
        key: Value::Null,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ColumnDef, ColumnType};
    use crate::context::RowContextBuilder;

    fn row_ctx(k: Value, v: i64) -> RowContext {
        let columns = vec![
            ColumnDef::new("k", ColumnType::Integer),
            ColumnDef::new("v", ColumnType::Integer),
        ];
        RowContextBuilder::single("t", &columns, &[k, Value::Integer(v)])
    }

    #[test]
    fn groups_rows_by_key_in_first_seen_order() {
        let rows = vec![
            row_ctx(Value::Integer(1), 10),
            row_ctx(Value::Integer(2), 20),
            row_ctx(Value::Integer(1), 30),
        ];
        let groups = explicit_groups(rows, &Expr::column("k")).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, Value::Integer(1));
        assert_eq!(groups[0].rows.len(), 2);
        assert_eq!(groups[1].key, Value::Integer(2));
        assert_eq!(groups[1].rows.len(), 1);
    }

    #[test]
    fn null_keys_collapse_into_one_group() {
        let rows = vec![
            row_ctx(Value::Null, 1),
            row_ctx(Value::Integer(1), 2),
            row_ctx(Value::Null, 3),
        ];
        let groups = explicit_groups(rows, &Expr::column("k")).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, Value::Null);
        assert_eq!(groups[0].rows.len(), 2);
    }

    #[test]
    fn implicit_group_covers_all_rows_even_when_empty() {
        let group = implicit_group(vec![]);
        assert!(group.rows.is_empty());
    }
}
