//! Declared SQL column types.

use core::fmt;

/// The two declarable SQL column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// `INTEGER`.
    Integer,
    /// `BOOLEAN`.
    Boolean,
}

impl ColumnType {
    /// Returns the SQL representation of the type.
    #[must_use]
    pub const fn to_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_sql())
    }
}

/// A column definition appearing in `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name, case-sensitive for storage.
    pub name: String,
    /// The declared type.
    pub column_type: ColumnType,
}

impl ColumnDef {
    /// Creates a new column definition.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_type_to_sql() {
        assert_eq!(ColumnType::Integer.to_sql(), "INTEGER");
        assert_eq!(ColumnType::Boolean.to_sql(), "BOOLEAN");
    }

    #[test]
    fn column_def_builder() {
        let col = ColumnDef::new("id", ColumnType::Integer);
        assert_eq!(col.name, "id");
        assert_eq!(col.column_type, ColumnType::Integer);
    }
}
