//! SQL statement AST types.

use core::fmt;

use super::expression::Expr;
use super::types::ColumnDef;

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ORDER BY clause entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// The expression to order by (may be a bare alias reference).
    pub expr: Expr,
    /// The direction (ASC or DESC).
    pub direction: OrderDirection,
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.expr, self.direction)
    }
}

/// JOIN kind. `ON` is required for all of them (no USING, no CROSS).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `INNER JOIN`.
    InnerJoin,
    /// `LEFT OUTER JOIN`.
    LeftOuter,
    /// `RIGHT OUTER JOIN`.
    RightOuter,
    /// `FULL OUTER JOIN`.
    FullOuter,
}

impl JoinKind {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InnerJoin => "INNER JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
            Self::RightOuter => "RIGHT OUTER JOIN",
            Self::FullOuter => "FULL OUTER JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    /// The kind of join.
    pub kind: JoinKind,
    /// The table being joined in.
    pub table: String,
    /// Alias for the joined table, if given.
    pub alias: Option<String>,
    /// The (required) ON condition.
    pub on_expression: Expr,
}

impl fmt::Display for JoinSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.table)?;
        if let Some(a) = &self.alias {
            write!(f, " {a}")?;
        }
        write!(f, " ON {}", self.on_expression)
    }
}

/// A single projected column in a SELECT's column list.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// The expression being projected.
    pub expression: Expr,
    /// An optional `AS alias`.
    pub alias: Option<String>,
}

impl Projection {
    /// Creates a projection with no alias.
    #[must_use]
    pub const fn new(expression: Expr) -> Self {
        Self {
            expression,
            alias: None,
        }
    }

    /// Creates a projection with an alias.
    #[must_use]
    pub fn with_alias(expression: Expr, alias: impl Into<String>) -> Self {
        Self {
            expression,
            alias: Some(alias.into()),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)?;
        if let Some(a) = &self.alias {
            write!(f, " AS {a}")?;
        }
        Ok(())
    }
}

/// A full `SELECT ... FROM ...` query.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// The projected columns.
    pub projections: Vec<Projection>,
    /// The driving table.
    pub from: String,
    /// Alias for the driving table, if given.
    pub alias: Option<String>,
    /// Joins applied, in source order.
    pub joins: Vec<JoinSpec>,
    /// The WHERE clause, if any.
    pub where_clause: Option<Expr>,
    /// The GROUP BY expression, if any.
    pub group_by: Option<Expr>,
    /// ORDER BY entries, in source order.
    pub order_by: Vec<OrderBy>,
    /// LIMIT expression, if any.
    pub limit: Option<Expr>,
    /// OFFSET expression, if any.
    pub offset: Option<Expr>,
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        for (i, p) in self.projections.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, " FROM {}", self.from)?;
        if let Some(a) = &self.alias {
            write!(f, " {a}")?;
        }
        for j in &self.joins {
            write!(f, " {j}")?;
        }
        if let Some(w) = &self.where_clause {
            write!(f, " WHERE {w}")?;
        }
        if let Some(g) = &self.group_by {
            write!(f, " GROUP BY {g}")?;
        }
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY")?;
            for (i, o) in self.order_by.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, " {o}")?;
            }
        }
        if let Some(l) = &self.limit {
            write!(f, " LIMIT {l}")?;
        }
        if let Some(o) = &self.offset {
            write!(f, " OFFSET {o}")?;
        }
        Ok(())
    }
}

/// `CREATE TABLE name (col_def, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    /// The new table's name.
    pub table: String,
    /// Column definitions, in declaration order.
    pub columns: Vec<ColumnDef>,
}

/// `DROP TABLE [IF EXISTS] name`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTableStatement {
    /// The table to drop.
    pub table: String,
    /// Whether `IF EXISTS` was given.
    pub if_exists: bool,
}

/// `INSERT INTO name VALUES (...), (...), ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// The target table.
    pub table: String,
    /// One expression vector per value tuple.
    pub value_sets: Vec<Vec<Expr>>,
}

/// A SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `CREATE TABLE ...`.
    CreateTable(CreateTableStatement),
    /// `DROP TABLE ...`.
    DropTable(DropTableStatement),
    /// `INSERT INTO ... VALUES ...`.
    InsertMultiple(InsertStatement),
    /// `SELECT projection_list` with no FROM clause.
    SelectConstant(Vec<Projection>),
    /// A full `SELECT ... FROM ...` query.
    Select(SelectStatement),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTable(c) => write!(f, "CREATE TABLE {}", c.table),
            Self::DropTable(d) => {
                write!(f, "DROP TABLE ")?;
                if d.if_exists {
                    write!(f, "IF EXISTS ")?;
                }
                write!(f, "{}", d.table)
            }
            Self::InsertMultiple(i) => write!(f, "INSERT INTO {}", i.table),
            Self::SelectConstant(projections) => {
                write!(f, "SELECT ")?;
                for (idx, p) in projections.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                Ok(())
            }
            Self::Select(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_direction_defaults_to_asc() {
        assert_eq!(OrderDirection::default(), OrderDirection::Asc);
        assert_eq!(OrderDirection::Asc.as_str(), "ASC");
        assert_eq!(OrderDirection::Desc.as_str(), "DESC");
    }

    #[test]
    fn join_kind_spellings() {
        assert_eq!(JoinKind::InnerJoin.as_str(), "INNER JOIN");
        assert_eq!(JoinKind::LeftOuter.as_str(), "LEFT OUTER JOIN");
        assert_eq!(JoinKind::RightOuter.as_str(), "RIGHT OUTER JOIN");
        assert_eq!(JoinKind::FullOuter.as_str(), "FULL OUTER JOIN");
    }

    #[test]
    fn projection_with_alias_displays_as_clause() {
        let p = Projection::with_alias(Expr::column("n"), "total");
        assert_eq!(p.to_string(), "n AS total");
    }
}
