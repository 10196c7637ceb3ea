//! Recursive-descent statement parser with a Pratt expression parser.

use super::error::ParseError;
use super::pratt::{
    infix_binding_power, prefix_binding_power, token_to_binary_op, token_to_unary_op,
};
use crate::ast::{
    ColumnDef, ColumnType, CreateTableStatement, DropTableStatement, Expr, InsertStatement,
    JoinKind, JoinSpec, OrderBy, OrderDirection, Projection, SelectStatement, Statement,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

/// A hand-written parser producing a [`Statement`] from SQL source text.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self { lexer, current }
    }

    /// Parses a single SQL statement, plus an optional terminating `;`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the input is not a valid statement, or
    /// if anything other than a trailing `;` follows it.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let statement = match &self.current.kind {
            TokenKind::Keyword(Keyword::Create) => self.parse_create_table_statement()?,
            TokenKind::Keyword(Keyword::Drop) => self.parse_drop_table_statement()?,
            TokenKind::Keyword(Keyword::Insert) => self.parse_insert_statement()?,
            TokenKind::Keyword(Keyword::Select) => self.parse_select_statement()?,
            _ => {
                return Err(ParseError::unexpected(
                    "CREATE, DROP, INSERT, or SELECT",
                    &self.current.kind,
                    self.current.span,
                ));
            }
        };

        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        if !self.current.is_eof() {
            return Err(ParseError::unexpected(
                "end of statement",
                &self.current.kind,
                self.current.span,
            ));
        }
        Ok(statement)
    }

    fn parse_create_table_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;
        let table = self.expect_identifier()?;
        self.expect(&TokenKind::LeftParen)?;

        let mut columns = vec![];
        loop {
            let name = self.expect_identifier()?;
            let column_type = self.parse_column_type()?;
            columns.push(ColumnDef::new(name, column_type));
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&TokenKind::RightParen)?;

        Ok(Statement::CreateTable(CreateTableStatement {
            table,
            columns,
        }))
    }

    fn parse_column_type(&mut self) -> Result<ColumnType, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Integer) => {
                self.advance();
                Ok(ColumnType::Integer)
            }
            TokenKind::Keyword(Keyword::Boolean) => {
                self.advance();
                Ok(ColumnType::Boolean)
            }
            _ => Err(ParseError::unexpected(
                "INTEGER or BOOLEAN",
                &self.current.kind,
                self.current.span,
            )),
        }
    }

    fn parse_drop_table_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Drop)?;
        self.expect_keyword(Keyword::Table)?;
        let if_exists = if self.check_keyword(Keyword::If) {
            self.advance();
            self.expect_keyword(Keyword::Exists)?;
            true
        } else {
            false
        };
        let table = self.expect_identifier()?;

        Ok(Statement::DropTable(DropTableStatement {
            table,
            if_exists,
        }))
    }

    fn parse_insert_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.expect_identifier()?;
        self.expect_keyword(Keyword::Values)?;

        let mut value_sets = vec![];
        loop {
            self.expect(&TokenKind::LeftParen)?;
            let values = self.parse_expression_list()?;
            self.expect(&TokenKind::RightParen)?;
            value_sets.push(values);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        Ok(Statement::InsertMultiple(InsertStatement {
            table,
            value_sets,
        }))
    }

    fn parse_select_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Select)?;
        let projections = self.parse_projections()?;

        if !self.check_keyword(Keyword::From) {
            return Ok(Statement::SelectConstant(projections));
        }
        self.advance();

        let from = self.expect_identifier()?;
        let alias = self.parse_optional_alias()?;

        let mut joins = vec![];
        while self.is_join_keyword() {
            joins.push(self.parse_join_spec()?);
        }

        let where_clause = if self.check_keyword(Keyword::Where) {
            self.advance();
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        let group_by = if self.check_keyword(Keyword::Group) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        let order_by = if self.check_keyword(Keyword::Order) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            vec![]
        };

        let limit = if self.check_keyword(Keyword::Limit) {
            self.advance();
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        let offset = if self.check_keyword(Keyword::Offset) {
            self.advance();
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        Ok(Statement::Select(SelectStatement {
            projections,
            from,
            alias,
            joins,
            where_clause,
            group_by,
            order_by,
            limit,
            offset,
        }))
    }

    /// Parses a comma-separated projection list. Parenthesis nesting
    /// is respected automatically since commas inside a function call
    /// are consumed by that call's own argument list.
    fn parse_projections(&mut self) -> Result<Vec<Projection>, ParseError> {
        let mut projections = vec![];
        loop {
            if self.check(&TokenKind::Star) {
                let span = self.current.span;
                self.advance();
                projections.push(Projection::new(Expr::Wildcard { span }));
            } else {
                let expression = self.parse_expression(0)?;
                let alias = if self.check_keyword(Keyword::As) {
                    self.advance();
                    Some(self.expect_identifier()?)
                } else {
                    None
                };
                projections.push(Projection { expression, alias });
            }
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(projections)
    }

    fn is_join_keyword(&self) -> bool {
        matches!(
            &self.current.kind,
            TokenKind::Keyword(Keyword::Inner | Keyword::Left | Keyword::Right | Keyword::Full)
        )
    }

    fn parse_join_spec(&mut self) -> Result<JoinSpec, ParseError> {
        let kind = match &self.current.kind {
            TokenKind::Keyword(Keyword::Inner) => {
                self.advance();
                self.expect_keyword(Keyword::Join)?;
                JoinKind::InnerJoin
            }
            TokenKind::Keyword(Keyword::Left) => {
                self.advance();
                self.expect_keyword(Keyword::Outer)?;
                self.expect_keyword(Keyword::Join)?;
                JoinKind::LeftOuter
            }
            TokenKind::Keyword(Keyword::Right) => {
                self.advance();
                self.expect_keyword(Keyword::Outer)?;
                self.expect_keyword(Keyword::Join)?;
                JoinKind::RightOuter
            }
            TokenKind::Keyword(Keyword::Full) => {
                self.advance();
                self.expect_keyword(Keyword::Outer)?;
                self.expect_keyword(Keyword::Join)?;
                JoinKind::FullOuter
            }
            _ => {
                return Err(ParseError::unexpected(
                    "INNER, LEFT OUTER, RIGHT OUTER, or FULL OUTER JOIN",
                    &self.current.kind,
                    self.current.span,
                ));
            }
        };

        let table = self.expect_identifier()?;
        let alias = self.parse_optional_alias()?;
        self.expect_keyword(Keyword::On)?;
        let on_expression = self.parse_expression(0)?;

        Ok(JoinSpec {
            kind,
            table,
            alias,
            on_expression,
        })
    }

    /// An optional `AS name` or bare `name` following a table reference.
    /// Clause and join keywords never lex as identifiers, so no
    /// reserved-word check is needed here.
    fn parse_optional_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.check_keyword(Keyword::As) {
            self.advance();
            Ok(Some(self.expect_identifier()?))
        } else if matches!(&self.current.kind, TokenKind::Identifier(_)) {
            Ok(Some(self.expect_identifier()?))
        } else {
            Ok(None)
        }
    }

    fn parse_order_by_list(&mut self) -> Result<Vec<OrderBy>, ParseError> {
        let mut items = vec![];
        loop {
            let expr = self.parse_expression(0)?;
            let direction = if self.check_keyword(Keyword::Desc) {
                self.advance();
                OrderDirection::Desc
            } else if self.check_keyword(Keyword::Asc) {
                self.advance();
                OrderDirection::Asc
            } else {
                OrderDirection::Asc
            };
            items.push(OrderBy { expr, direction });
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(items)
    }

    /// Pratt-parses an expression, only continuing the infix loop while
    /// the next operator's left binding power is at least `min_bp`.
    fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some((l_bp, r_bp)) = infix_binding_power(&self.current.kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            if matches!(&self.current.kind, TokenKind::Keyword(Keyword::Is)) {
                self.advance();
                let negated = if self.check_keyword(Keyword::Not) {
                    self.advance();
                    true
                } else {
                    false
                };
                self.expect_keyword(Keyword::Null)?;
                lhs = Expr::IsNull {
                    expr: Box::new(lhs),
                    negated,
                };
                continue;
            }

            let Some(op) = token_to_binary_op(&self.current.kind) else {
                break;
            };
            self.advance();
            let rhs = self.parse_expression(r_bp)?;
            lhs = Expr::BinaryOp {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        if let Some(op) = token_to_unary_op(&self.current.kind) {
            let bp = prefix_binding_power(&self.current.kind).unwrap_or(11);
            self.advance();
            let operand = self.parse_expression(bp)?;
            return Ok(Expr::UnaryOp {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match &self.current.kind {
            TokenKind::Integer(n) => {
                let n = *n;
                self.advance();
                Ok(Expr::integer(n))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::boolean(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::boolean(false))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::null())
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression(0)?;
                self.expect(&TokenKind::RightParen)?;
                Ok(expr)
            }
            TokenKind::Keyword(kw @ (Keyword::Abs | Keyword::Mod)) => {
                let name = kw.as_str().to_ascii_lowercase();
                self.advance();
                self.parse_scalar_function_call(name)
            }
            TokenKind::Keyword(kw @ (Keyword::Count | Keyword::Sum)) => {
                let name = kw.as_str().to_ascii_lowercase();
                self.advance();
                self.parse_aggregate_function_call(name)
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let span = self.current.span;
                self.advance();

                if self.check(&TokenKind::Dot) {
                    self.advance();
                    let column = self.expect_identifier()?;
                    return Ok(Expr::QualifiedColumn {
                        table: name,
                        name: column,
                        span,
                    });
                }
                if self.check(&TokenKind::LeftParen) {
                    return self.parse_scalar_function_call(name.to_ascii_lowercase());
                }
                Ok(Expr::Column { name, span })
            }
            _ => Err(ParseError::unexpected(
                "expression",
                &self.current.kind,
                self.current.span,
            )),
        }
    }

    /// Any `name(...)` that isn't a recognized aggregate parses here;
    /// validation later rejects unknown scalar function names.
    fn parse_scalar_function_call(&mut self, name: String) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let args = if self.check(&TokenKind::RightParen) {
            vec![]
        } else {
            self.parse_expression_list()?
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::Function { name, args })
    }

    /// `COUNT(*)` and the argumentless `COUNT()` both parse with an
    /// empty argument list.
    fn parse_aggregate_function_call(&mut self, name: String) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let args = if self.check(&TokenKind::RightParen) {
            vec![]
        } else if self.check(&TokenKind::Star) {
            self.advance();
            vec![]
        } else {
            self.parse_expression_list()?
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::AggregateFunction { name, args })
    }

    fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![];
        loop {
            exprs.push(self.parse_expression(0)?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(exprs)
    }

    // --- token-stream helpers ---

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.as_keyword() == Some(keyword)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected(
                format!("{kind:?}"),
                &self.current.kind,
                self.current.span,
            ))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected(
                keyword.as_str(),
                &self.current.kind,
                self.current.span,
            ))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::unexpected(
                "identifier",
                &self.current.kind,
                self.current.span,
            )),
        }
    }
}
