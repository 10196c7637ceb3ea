//! Table and row contexts: alias binding for validation, and per-row
//! environments for scalar evaluation over single-table and joined
//! queries.

use std::collections::HashMap;

use crate::ast::{ColumnDef, ColumnType};
use crate::error::{EngineError, Result};
use crate::value::Value;

#[derive(Debug, Clone)]
struct Source {
    label: String,
    columns: Vec<ColumnDef>,
}

/// Binds each `FROM`/`JOIN` source's alias (or bare table name, when
/// no alias was given) to its column schema.
#[derive(Debug, Clone, Default)]
pub struct TableContext {
    sources: Vec<Source>,
}

impl TableContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source under `label`.
    ///
    /// # Errors
    ///
    /// Fails if `label` is already bound to another source in this
    /// query (duplicate alias, or joining the same unaliased table
    /// twice).
    pub fn add_source(&mut self, label: impl Into<String>, columns: Vec<ColumnDef>) -> Result<()> {
        let label = label.into();
        if self.sources.iter().any(|s| s.label == label) {
            return Err(EngineError::validation(format!(
                "duplicate table alias '{label}'"
            )));
        }
        self.sources.push(Source { label, columns });
        Ok(())
    }

    /// Resolves a bare column name, succeeding only when exactly one
    /// source declares it.
    ///
    /// # Errors
    ///
    /// Fails if no source has the column, or more than one does.
    pub fn resolve_bare(&self, name: &str) -> Result<ColumnType> {
        let mut found = None;
        for source in &self.sources {
            if let Some(column) = source
                .columns
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(name))
            {
                if found.is_some() {
                    return Err(EngineError::validation(format!(
                        "ambiguous column reference '{name}'"
                    )));
                }
                found = Some(column.column_type);
            }
        }
        found.ok_or_else(|| EngineError::validation(format!("unknown column '{name}'")))
    }

    /// Resolves a table-qualified column reference.
    ///
    /// # Errors
    ///
    /// Fails if `label` is not a known alias/table, or `name` is not
    /// one of its columns.
    pub fn resolve_qualified(&self, label: &str, name: &str) -> Result<ColumnType> {
        let source = self
            .sources
            .iter()
            .find(|s| s.label == label)
            .ok_or_else(|| EngineError::validation(format!("unknown table or alias '{label}'")))?;
        source
            .columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.column_type)
            .ok_or_else(|| EngineError::validation(format!("unknown column '{label}.{name}'")))
    }

    /// Returns the label of the single source owning column `name`,
    /// or `None` if zero or more than one source declares it. Used by
    /// GROUP BY normalization to treat a bare `c` as equivalent to
    /// `t.c` when `t` is `c`'s only owner.
    #[must_use]
    pub fn only_source_of(&self, name: &str) -> Option<&str> {
        let mut owner = None;
        for source in &self.sources {
            if source
                .columns
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(name))
            {
                if owner.is_some() {
                    return None;
                }
                owner = Some(source.label.as_str());
            }
        }
        owner
    }

    /// Expands `*` into one table-qualified column reference per
    /// column of every source, in `FROM`/`JOIN` order.
    #[must_use]
    pub fn expand_wildcard(&self) -> Vec<(String, String)> {
        self.sources
            .iter()
            .flat_map(|s| {
                s.columns
                    .iter()
                    .map(move |c| (s.label.clone(), c.name.clone()))
            })
            .collect()
    }

    /// Builds a dummy-row [`RowContext`] for validation: every column
    /// of every source maps to [`Value::dummy_for`] its declared type.
    #[must_use]
    pub fn dummy_row(&self) -> RowContext {
        let mut ctx = RowContext::new();
        for source in &self.sources {
            for column in &source.columns {
                ctx.add(&source.label, &column.name, Value::dummy_for(column.column_type));
            }
        }
        ctx
    }

    /// Builds an all-NULL [`RowContext`] covering every column of every
    /// source. Used to pad the unmatched side of an outer join when
    /// the other side may itself span several previously-joined
    /// sources.
    #[must_use]
    pub fn null_row(&self) -> RowContext {
        let mut ctx = RowContext::new();
        for source in &self.sources {
            for column in &source.columns {
                ctx.add(&source.label, &column.name, Value::Null);
            }
        }
        ctx
    }
}

/// A per-row environment for scalar expression evaluation: every
/// source column is reachable both by its bare name and by
/// `label.name`.
#[derive(Debug, Clone, Default)]
pub struct RowContext {
    bare: HashMap<String, Vec<Value>>,
    qualified: HashMap<(String, String), Value>,
}

impl RowContext {
    /// Creates an empty row context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, label: &str, name: &str, value: Value) {
        let key = name.to_ascii_lowercase();
        self.bare.entry(key.clone()).or_default().push(value);
        self.qualified.insert((label.to_string(), key), value);
    }

    /// Looks up a bare column reference. Name comparison is
    /// case-insensitive.
    ///
    /// # Errors
    ///
    /// Fails if no source column has this name, or more than one does.
    pub fn get_bare(&self, name: &str) -> Result<Value> {
        match self.bare.get(&name.to_ascii_lowercase()) {
            None | Some([]) => Err(EngineError::validation(format!("unknown column '{name}'"))),
            Some([value]) => Ok(*value),
            Some(_) => Err(EngineError::validation(format!(
                "ambiguous column reference '{name}'"
            ))),
        }
    }

    /// Looks up a table-qualified column reference. The column name is
    /// compared case-insensitively; the table/alias label is not.
    ///
    /// # Errors
    ///
    /// Fails if `label.name` has no entry in this context.
    pub fn get_qualified(&self, label: &str, name: &str) -> Result<Value> {
        self.qualified
            .get(&(label.to_string(), name.to_ascii_lowercase()))
            .copied()
            .ok_or_else(|| EngineError::validation(format!("unknown column '{label}.{name}'")))
    }
}

/// Builds [`RowContext`]s for single-table rows, and composes them
/// across joins.
pub struct RowContextBuilder;

impl RowContextBuilder {
    /// Builds the row context for a single table's row.
    #[must_use]
    pub fn single(label: &str, columns: &[ColumnDef], row: &[Value]) -> RowContext {
        let mut ctx = RowContext::new();
        for (column, value) in columns.iter().zip(row) {
            ctx.add(label, &column.name, *value);
        }
        ctx
    }

    /// Extends `left` with a joined-in source. When `right` is `None`
    /// (an outer join's unmatched side), every added entry is NULL.
    #[must_use]
    pub fn extend(
        left: &RowContext,
        label: &str,
        columns: &[ColumnDef],
        right: Option<&[Value]>,
    ) -> RowContext {
        let mut ctx = left.clone();
        match right {
            Some(row) => {
                for (column, value) in columns.iter().zip(row) {
                    ctx.add(label, &column.name, *value);
                }
            }
            None => {
                for column in columns {
                    ctx.add(label, &column.name, Value::Null);
                }
            }
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ColumnType;

    fn columns() -> Vec<ColumnDef> {
        vec![ColumnDef::new("id", ColumnType::Integer)]
    }

    #[test]
    fn resolve_bare_succeeds_for_single_source() {
        let mut ctx = TableContext::new();
        ctx.add_source("t", columns()).unwrap();
        assert_eq!(ctx.resolve_bare("id").unwrap(), ColumnType::Integer);
    }

    #[test]
    fn resolve_bare_is_ambiguous_across_two_sources() {
        let mut ctx = TableContext::new();
        ctx.add_source("t", columns()).unwrap();
        ctx.add_source("u", columns()).unwrap();
        assert!(ctx.resolve_bare("id").is_err());
        assert!(ctx.resolve_qualified("t", "id").is_ok());
    }

    #[test]
    fn add_source_rejects_duplicate_alias() {
        let mut ctx = TableContext::new();
        ctx.add_source("t", columns()).unwrap();
        assert!(ctx.add_source("t", columns()).is_err());
    }

    #[test]
    fn only_source_of_is_none_when_ambiguous() {
        let mut ctx = TableContext::new();
        ctx.add_source("t", columns()).unwrap();
        assert_eq!(ctx.only_source_of("id"), Some("t"));
        ctx.add_source("u", columns()).unwrap();
        assert_eq!(ctx.only_source_of("id"), None);
    }

    #[test]
    fn row_context_builder_single_exposes_bare_and_qualified() {
        let row = vec![Value::Integer(7)];
        let ctx = RowContextBuilder::single("t", &columns(), &row);
        assert_eq!(ctx.get_bare("id").unwrap(), Value::Integer(7));
        assert_eq!(ctx.get_qualified("t", "id").unwrap(), Value::Integer(7));
    }

    #[test]
    fn row_context_builder_extend_pads_null_when_unmatched() {
        let left_row = vec![Value::Integer(1)];
        let left = RowContextBuilder::single("t", &columns(), &left_row);
        let joined = RowContextBuilder::extend(&left, "u", &columns(), None);
        assert_eq!(joined.get_qualified("u", "id").unwrap(), Value::Null);
        assert_eq!(joined.get_qualified("t", "id").unwrap(), Value::Integer(1));
    }

    #[test]
    fn null_row_pads_every_source_with_null() {
        let mut ctx = TableContext::new();
        ctx.add_source("t", columns()).unwrap();
        ctx.add_source("u", columns()).unwrap();
        let row = ctx.null_row();
        assert_eq!(row.get_qualified("t", "id").unwrap(), Value::Null);
        assert_eq!(row.get_qualified("u", "id").unwrap(), Value::Null);
    }

    #[test]
    fn resolve_bare_and_qualified_ignore_case() {
        let mut ctx = TableContext::new();
        ctx.add_source("t", columns()).unwrap();
        assert_eq!(ctx.resolve_bare("ID").unwrap(), ColumnType::Integer);
        assert_eq!(ctx.resolve_qualified("t", "ID").unwrap(), ColumnType::Integer);
    }

    #[test]
    fn row_context_lookups_ignore_case() {
        let row = vec![Value::Integer(7)];
        let ctx = RowContextBuilder::single("t", &columns(), &row);
        assert_eq!(ctx.get_bare("ID").unwrap(), Value::Integer(7));
        assert_eq!(ctx.get_qualified("t", "ID").unwrap(), Value::Integer(7));
    }

    #[test]
    fn expand_wildcard_lists_columns_in_source_order() {
        let mut ctx = TableContext::new();
        ctx.add_source("t", columns()).unwrap();
        ctx.add_source("u", vec![ColumnDef::new("v", ColumnType::Integer)])
            .unwrap();
        assert_eq!(
            ctx.expand_wildcard(),
            vec![
                ("t".to_string(), "id".to_string()),
                ("u".to_string(), "v".to_string()),
            ]
        );
    }

    #[test]
    fn row_context_bare_lookup_is_ambiguous_across_joined_sources() {
        let left_row = vec![Value::Integer(1)];
        let left = RowContextBuilder::single("t", &columns(), &left_row);
        let right_row = vec![Value::Integer(2)];
        let joined = RowContextBuilder::extend(&left, "u", &columns(), Some(&right_row));
        assert!(joined.get_bare("id").is_err());
    }
}
