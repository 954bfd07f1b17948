//! Statement parsing implementation
//!
//! This module handles parsing of all statement forms in the subset:
//!
//! - Variable declarations: `int x = 42;` (a comma list stays one
//!   statement node carrying several declarators)
//! - Control flow: `if/else`, `while`, `for`
//! - `return`, `printf`, blocks, stray semicolons
//! - Assignment-like statements: `x = e`, the compound assignments, and
//!   `x++` / `x--` / `++x` / `--x`, which desugar into `x = x ± 1`
//!
//! # Grammar
//!
//! ```text
//! statement ::= block | decl | return_stmt | if_stmt | while_stmt
//!             | for_stmt | printf_stmt | assignment_like | ';'
//! ```
//!
//! `break` and `continue` lex as keywords but no rule here accepts them,
//! so they surface as syntax errors. All parsing methods are implemented
//! as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse block statements (inside braces, excluding the braces)
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::LBrace(loc)) {
            let statements = self.parse_block_statements()?;
            self.expect_token(
                &Token::RBrace(self.current_location()),
                "Expected '}' after block",
            )?;
            return Ok(Stmt::Block {
                statements,
                location: loc,
            });
        }

        if self.match_token(&Token::Return(loc)) {
            return self.parse_return_statement();
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement();
        }

        if self.match_token(&Token::While(loc)) {
            return self.parse_while_statement();
        }

        if self.match_token(&Token::For(loc)) {
            return self.parse_for_statement();
        }

        if self.is_int_type_keyword() {
            return self.parse_declaration(true);
        }

        if self.match_token(&Token::Semicolon(loc)) {
            return Ok(Stmt::Empty { location: loc });
        }

        // printf call: the identifier 'printf' directly followed by '('
        if let Token::Ident(name, _) = self.peek_token() {
            if name == "printf"
                && self
                    .peek_ahead(1)
                    .map(|t| matches!(t, Token::LParen(_)))
                    .unwrap_or(false)
            {
                return self.parse_printf_statement();
            }
        }

        // Assignment-like statements, including leading ++/--
        if matches!(
            self.peek_token(),
            Token::Ident(_, _) | Token::PlusPlus(_) | Token::MinusMinus(_)
        ) {
            let stmt = self.parse_assignment_like()?;
            self.expect_semicolon("after statement")?;
            return Ok(stmt);
        }

        Err(ParseError::Syntax {
            message: format!("Unexpected token: {}", self.peek()),
            location: loc,
        })
    }

    /// Parse declaration(s): `int x;`, `int x = e;`, `int a = 1, b;`
    ///
    /// A comma-separated list stays one statement node, so the `for`
    /// initializer slot can hold it. With `require_semicolon` false (the
    /// `for` initializer) the terminating `;` is left for the caller.
    pub(crate) fn parse_declaration(&mut self, require_semicolon: bool) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.advance(); // int / long / char

        let mut declarators = Vec::new();
        loop {
            let name = self.expect_identifier()?;

            let init = if self.match_token(&Token::Eq(self.current_location())) {
                Some(self.parse_expression()?)
            } else {
                None
            };

            declarators.push(Declarator { name, init });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        if require_semicolon {
            self.expect_semicolon("after variable declaration")?;
        }

        Ok(Stmt::Declaration {
            declarators,
            location: loc,
        })
    }

    /// Parse an assignment-like statement without its terminating `;`:
    /// `x = e`, `x op= e`, `x++`, `x--`, `++x`, `--x`
    pub(crate) fn parse_assignment_like(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::PlusPlus(loc)) {
            let name = self.expect_identifier()?;
            return Ok(Self::desugar_increment(name, BinOp::Add, loc));
        }
        if self.match_token(&Token::MinusMinus(loc)) {
            let name = self.expect_identifier()?;
            return Ok(Self::desugar_increment(name, BinOp::Sub, loc));
        }

        let name = self.expect_identifier()?;

        if self.match_token(&Token::PlusPlus(self.current_location())) {
            return Ok(Self::desugar_increment(name, BinOp::Add, loc));
        }
        if self.match_token(&Token::MinusMinus(self.current_location())) {
            return Ok(Self::desugar_increment(name, BinOp::Sub, loc));
        }

        let op = if self.match_token(&Token::Eq(self.current_location())) {
            AssignOp::Assign
        } else if self.match_token(&Token::PlusEq(self.current_location())) {
            AssignOp::AddAssign
        } else if self.match_token(&Token::MinusEq(self.current_location())) {
            AssignOp::SubAssign
        } else if self.match_token(&Token::StarEq(self.current_location())) {
            AssignOp::MulAssign
        } else if self.match_token(&Token::SlashEq(self.current_location())) {
            AssignOp::DivAssign
        } else if self.match_token(&Token::PercentEq(self.current_location())) {
            AssignOp::ModAssign
        } else {
            return Err(ParseError::Unsupported {
                message: format!("operator {} after identifier '{}'", self.peek(), name),
            });
        };

        let value = self.parse_expression()?;

        Ok(Stmt::Assignment {
            name,
            op,
            value,
            location: loc,
        })
    }

    /// `x++` / `++x` → `x = x + 1`, `x--` / `--x` → `x = x - 1`
    fn desugar_increment(name: String, op: BinOp, loc: SourceLocation) -> Stmt {
        Stmt::Assignment {
            op: AssignOp::Assign,
            value: Expr::Binary {
                op,
                left: Box::new(Expr::Variable(name.clone(), loc)),
                right: Box::new(Expr::IntLiteral(1, loc)),
                location: loc,
            },
            name,
            location: loc,
        }
    }

    /// Parse printf call: `printf("fmt", e, ...);`
    fn parse_printf_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.advance(); // 'printf'
        self.expect_token(
            &Token::LParen(self.current_location()),
            "Expected '(' after 'printf'",
        )?;

        let format = if let Token::StringLiteral(s, _) = self.peek_token() {
            self.advance();
            s
        } else {
            return Err(ParseError::Syntax {
                message: format!(
                    "Expected string literal as printf format, found {}",
                    self.peek()
                ),
                location: self.current_location(),
            });
        };

        let mut args = Vec::new();
        while self.match_token(&Token::Comma(self.current_location())) {
            args.push(self.parse_expression()?);
        }

        self.expect_token(
            &Token::RParen(self.current_location()),
            "Expected ')' after printf arguments",
        )?;
        self.expect_semicolon("after 'printf'")?;

        Ok(Stmt::Printf {
            format,
            args,
            location: loc,
        })
    }

    /// Parse return statement
    fn parse_return_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        let expr = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_semicolon("after return")?;

        Ok(Stmt::Return {
            expr,
            location: loc,
        })
    }

    /// Parse if statement
    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        self.expect_token(
            &Token::LParen(self.current_location()),
            "Expected '(' after 'if'",
        )?;
        let condition = self.parse_expression()?;
        self.expect_token(
            &Token::RParen(self.current_location()),
            "Expected ')' after if condition",
        )?;

        let then_branch = self.parse_statement_or_block()?;

        let else_branch = if self.match_token(&Token::Else(self.current_location())) {
            Some(self.parse_statement_or_block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        self.expect_token(
            &Token::LParen(self.current_location()),
            "Expected '(' after 'while'",
        )?;
        let condition = self.parse_expression()?;
        self.expect_token(
            &Token::RParen(self.current_location()),
            "Expected ')' after while condition",
        )?;

        let body = self.parse_statement_or_block()?;

        Ok(Stmt::While {
            condition,
            body,
            location: loc,
        })
    }

    /// Parse for statement: `for (init; cond; incr) body`, each of the
    /// three clauses optional
    fn parse_for_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        self.expect_token(
            &Token::LParen(self.current_location()),
            "Expected '(' after 'for'",
        )?;

        let init = if self.check(&Token::Semicolon(self.current_location())) {
            self.advance();
            None
        } else if self.is_int_type_keyword() {
            let decl = self.parse_declaration(false)?;
            self.expect_semicolon("after for initializer")?;
            Some(Box::new(decl))
        } else {
            let stmt = self.parse_assignment_like()?;
            self.expect_semicolon("after for initializer")?;
            Some(Box::new(stmt))
        };

        let condition = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon("after for condition")?;

        let increment = if self.check(&Token::RParen(self.current_location())) {
            None
        } else {
            Some(Box::new(self.parse_assignment_like()?))
        };

        self.expect_token(
            &Token::RParen(self.current_location()),
            "Expected ')' after for clauses",
        )?;

        let body = self.parse_statement_or_block()?;

        Ok(Stmt::For {
            init,
            condition,
            increment,
            body,
            location: loc,
        })
    }

    /// Parse statement or block (for if/while/for bodies)
    pub(crate) fn parse_statement_or_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if self.match_token(&Token::LBrace(self.current_location())) {
            let statements = self.parse_block_statements()?;
            self.expect_token(
                &Token::RBrace(self.current_location()),
                "Expected '}' after block",
            )?;
            Ok(statements)
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }
}
