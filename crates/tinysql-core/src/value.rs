//! The runtime value and static type domains.

use core::fmt;

use crate::ast::ColumnType;

/// The runtime value domain. NULL is a first-class value, distinct
/// from any integer or boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A boolean.
    Boolean(bool),
    /// SQL NULL.
    Null,
}

impl Value {
    /// Returns this value's static type.
    #[must_use]
    pub const fn value_type(&self) -> Type {
        match self {
            Self::Integer(_) => Type::Integer,
            Self::Boolean(_) => Type::Boolean,
            Self::Null => Type::Unknown,
        }
    }

    /// Returns `true` for `Value::Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The dummy, non-NULL representative value for a declared column
    /// type, used by the validator's dummy-row environment.
    #[must_use]
    pub const fn dummy_for(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Integer => Self::Integer(0),
            ColumnType::Boolean => Self::Boolean(false),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Self::Null => write!(f, "NULL"),
        }
    }
}

/// The static type domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    /// An integer-valued expression.
    Integer,
    /// A boolean-valued expression.
    Boolean,
    /// The type of a NULL literal, or of an expression known to
    /// evaluate to NULL at analysis time.
    Unknown,
}

impl Type {
    /// Returns `true` if a value of `self` and a value of `other` may
    /// be compared (equality or ordering) once NULLs are excluded.
    #[must_use]
    pub const fn comparable_with(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Integer, Self::Integer)
                | (Self::Boolean, Self::Boolean)
                | (Self::Unknown, _)
                | (_, Self::Unknown)
        )
    }
}

impl From<ColumnType> for Type {
    fn from(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Integer => Self::Integer,
            ColumnType::Boolean => Self::Boolean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_has_unknown_type_and_is_null() {
        assert_eq!(Value::Null.value_type(), Type::Unknown);
        assert!(Value::Null.is_null());
        assert!(!Value::Integer(0).is_null());
    }

    #[test]
    fn dummy_for_matches_declared_type() {
        assert_eq!(Value::dummy_for(ColumnType::Integer), Value::Integer(0));
        assert_eq!(Value::dummy_for(ColumnType::Boolean), Value::Boolean(false));
    }

    #[test]
    fn boolean_display_is_sql_canonical() {
        assert_eq!(Value::Boolean(true).to_string(), "TRUE");
        assert_eq!(Value::Boolean(false).to_string(), "FALSE");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn type_comparability() {
        assert!(Type::Integer.comparable_with(Type::Integer));
        assert!(!Type::Integer.comparable_with(Type::Boolean));
        assert!(Type::Unknown.comparable_with(Type::Boolean));
    }
}
