//! Expression AST types.

use core::fmt;

use crate::lexer::Span;
use crate::value::Value;

/// Arithmetic, comparison and logical binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Star,
    Slash,
    Lt,
    Gt,
    Lte,
    Gte,
    Equal,
    NotEqual,
    And,
    Or,
}

impl BinaryOp {
    /// Returns the SQL spelling of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Gte => ">=",
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// `true` for `+ - * /`.
    #[must_use]
    pub const fn is_arithmetic(&self) -> bool {
        matches!(self, Self::Plus | Self::Minus | Self::Star | Self::Slash)
    }

    /// `true` for `< > <= >= = <>`.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Lt | Self::Gt | Self::Lte | Self::Gte | Self::Equal | Self::NotEqual
        )
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`).
    Minus,
    /// Logical negation (`NOT x`).
    Not,
}

impl UnaryOp {
    /// Returns the SQL spelling of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minus => "-",
            Self::Not => "NOT",
        }
    }
}

/// An SQL scalar expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Value),

    /// An unqualified column reference, e.g. `name`.
    Column {
        /// Column name.
        name: String,
        /// Source span, kept for diagnostics only.
        span: Span,
    },

    /// A table-qualified column reference, e.g. `t.name`.
    QualifiedColumn {
        /// Table name or alias.
        table: String,
        /// Column name.
        name: String,
        /// Source span, kept for diagnostics only.
        span: Span,
    },

    /// A binary expression.
    BinaryOp {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },

    /// A unary expression.
    UnaryOp {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },

    /// A scalar function call, e.g. `ABS(x)` or `MOD(x, y)`.
    Function {
        /// Lowercase function name (`abs` or `mod`).
        name: String,
        /// Call arguments.
        args: Vec<Expr>,
    },

    /// An aggregate function call, e.g. `COUNT(x)` or `SUM(x)`.
    AggregateFunction {
        /// Lowercase aggregate name (`count` or `sum`).
        name: String,
        /// Call arguments. `COUNT(*)` is represented with an empty list.
        args: Vec<Expr>,
    },

    /// `expr IS [NOT] NULL`, parsed as a postfix operator.
    IsNull {
        /// The expression being tested.
        expr: Box<Expr>,
        /// `true` for `IS NOT NULL`.
        negated: bool,
    },

    /// `*` in projection position. Only valid as a whole projection in a
    /// `SELECT ... FROM ...`; expanded into concrete column references
    /// before validation and evaluation run.
    Wildcard {
        /// Source span, kept for diagnostics only.
        span: Span,
    },
}

impl Expr {
    /// Creates an unqualified column reference with no span.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            name: name.into(),
            span: Span::default(),
        }
    }

    /// Creates a qualified column reference with no span.
    #[must_use]
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::QualifiedColumn {
            table: table.into(),
            name: name.into(),
            span: Span::default(),
        }
    }

    /// Creates an integer literal.
    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::Literal(Value::Integer(value))
    }

    /// Creates a boolean literal.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Value::Boolean(value))
    }

    /// Creates a NULL literal.
    #[must_use]
    pub const fn null() -> Self {
        Self::Literal(Value::Null)
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        Self::BinaryOp {
            op,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq(self, right: Self) -> Self {
        self.binary(BinaryOp::Equal, right)
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        self.binary(BinaryOp::And, right)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, right: Self) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    /// Creates an `IS NULL` expression.
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    /// Creates an `IS NOT NULL` expression.
    #[must_use]
    pub fn is_not_null(self) -> Self {
        Self::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Column { name, .. } => write!(f, "{name}"),
            Self::QualifiedColumn { table, name, .. } => write!(f, "{table}.{name}"),
            Self::BinaryOp { op, left, right } => write!(f, "({left} {} {right})", op.as_str()),
            Self::UnaryOp { op: UnaryOp::Minus, operand } => write!(f, "(-{operand})"),
            Self::UnaryOp { op: UnaryOp::Not, operand } => write!(f, "(NOT {operand})"),
            Self::Function { name, args } => write_call(f, name, args),
            Self::AggregateFunction { name, args } if args.is_empty() => {
                write!(f, "{}(*)", name.to_uppercase())
            }
            Self::AggregateFunction { name, args } => write_call(f, name, args),
            Self::IsNull { expr, negated } => {
                write!(f, "{expr} IS {}NULL", if *negated { "NOT " } else { "" })
            }
            Self::Wildcard { .. } => write!(f, "*"),
        }
    }
}

fn write_call(f: &mut fmt::Formatter<'_>, name: &str, args: &[Expr]) -> fmt::Result {
    write!(f, "{}(", name.to_uppercase())?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    write!(f, ")")
}
