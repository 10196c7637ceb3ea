//! The in-memory table catalog: schemas and row storage.

use crate::ast::{ColumnDef, ColumnType};
use crate::error::{EngineError, Result};
use crate::value::{Type, Value};
use std::collections::HashMap;

/// A stored table: its column schema plus all rows, in insertion order.
#[derive(Debug, Clone)]
pub struct Table {
    /// Column definitions, in declaration order.
    pub columns: Vec<ColumnDef>,
    /// Rows, each the same length as `columns`, in insertion order.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    fn new(columns: Vec<ColumnDef>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Returns the declared type of `name`, if it is a column of this
    /// table. Name comparison is case-insensitive.
    #[must_use]
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.column_type)
    }

    /// Returns `true` if `name` names a column of this table. Name
    /// comparison is case-insensitive.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// The engine's table catalog: a name-indexed collection of [`Table`]s.
///
/// All state lives here for the process lifetime; nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<String, Table>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the named table's schema and rows, if it exists.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Returns `true` if a table named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Creates a new table.
    ///
    /// # Errors
    ///
    /// Fails if a table by this name already exists, or if `columns`
    /// contains a duplicate column name.
    pub fn create(&mut self, name: &str, columns: Vec<ColumnDef>) -> Result<()> {
        if self.tables.contains_key(name) {
            return Err(EngineError::validation(format!(
                "table '{name}' already exists"
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.to_ascii_lowercase()) {
                return Err(EngineError::validation(format!(
                    "duplicate column '{}' in table '{name}'",
                    column.name
                )));
            }
        }
        self.tables.insert(name.to_string(), Table::new(columns));
        Ok(())
    }

    /// Drops a table.
    ///
    /// # Errors
    ///
    /// Fails if the table does not exist and `if_exists` is `false`.
    /// With `if_exists: true`, a missing table is a no-op success.
    pub fn drop(&mut self, name: &str, if_exists: bool) -> Result<()> {
        if self.tables.remove(name).is_none() && !if_exists {
            return Err(EngineError::validation(format!(
                "table '{name}' does not exist"
            )));
        }
        Ok(())
    }

    /// Checks that `values` may be inserted into `name` without
    /// mutating the table. Used to validate every row of a multi-row
    /// `INSERT` before any of them are appended, so a failure partway
    /// through leaves the table untouched.
    ///
    /// # Errors
    ///
    /// Fails if the table is unknown, if `values` has more entries than
    /// the table has columns, or if a non-NULL value's runtime type
    /// does not match its column's declared type.
    pub fn check_insert(&self, name: &str, values: &[Value]) -> Result<()> {
        let table = self
            .tables
            .get(name)
            .ok_or_else(|| EngineError::validation(format!("unknown table '{name}'")))?;

        if values.len() > table.columns.len() {
            return Err(EngineError::validation(format!(
                "too many values for table '{name}': expected at most {}, got {}",
                table.columns.len(),
                values.len()
            )));
        }

        for (value, column) in values.iter().zip(&table.columns) {
            if !value.is_null() && Type::from(column.column_type) != value.value_type() {
                return Err(EngineError::validation(format!(
                    "column '{}' expects {}, got '{value}'",
                    column.name, column.column_type
                )));
            }
        }
        Ok(())
    }

    /// Appends a row to a table, NULL-padding values shorter than the
    /// schema's column count.
    ///
    /// # Errors
    ///
    /// Fails if the table is unknown, if `values` has more entries than
    /// the table has columns, or if a non-NULL value's runtime type
    /// does not match its column's declared type.
    pub fn insert(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        self.check_insert(name, &values)?;
        let table = self
            .tables
            .get_mut(name)
            .expect("check_insert already confirmed the table exists");
        let mut row = values;
        row.resize(table.columns.len(), Value::Null);
        table.rows.push(row);
        Ok(())
    }

    /// Returns the rows stored for `name`, in insertion order.
    ///
    /// # Errors
    ///
    /// Fails if the table is unknown.
    pub fn rows(&self, name: &str) -> Result<&[Vec<Value>]> {
        self.tables
            .get(name)
            .map(|t| t.rows.as_slice())
            .ok_or_else(|| EngineError::validation(format!("unknown table '{name}'")))
    }
}
