//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing
//! infrastructure: error types, helper methods, warning accumulation,
//! and the program entry point that locates `main`.
//!
//! # Parser Architecture
//!
//! Recursive descent, with methods split across multiple files using
//! `impl Parser` blocks:
//! - This module: Parser struct, helpers, and `main` discovery
//! - `statements`: statement parsing and desugaring
//! - `expressions`: expression parsing with a precedence cascade
//!
//! # Program entry
//!
//! The parser scans forward through leading tokens for the pattern
//! `<int-type-keyword> main`, then consumes a balanced parenthesized
//! parameter list (contents ignored) and parses one brace-delimited
//! block as the program body. Anything before `main`, such as the
//! remains of declarations the sanitizer's `#`-stripping left behind,
//! is skipped without comment; anything after the body is ignored with
//! a warning.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use std::fmt;

/// Parser error type
///
/// `Syntax` covers everything the token stream can get wrong;
/// `Unsupported` marks constructs the language recognises but
/// deliberately does not implement, and carries no location.
#[derive(Debug, Clone)]
pub enum ParseError {
    Syntax {
        message: String,
        location: SourceLocation,
    },
    Unsupported {
        message: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax { message, location } => write!(
                f,
                "Parse error at line {}, column {}: {}",
                location.line, location.column, message
            ),
            ParseError::Unsupported { message } => {
                write!(f, "Unsupported operation: {}", message)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::Syntax {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for the C subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) warnings: Vec<String>,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            warnings: Vec::new(),
        })
    }

    /// Parse the program: locate `main` and parse its body
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        self.skip_to_main()?;
        self.advance(); // type keyword
        self.advance(); // 'main'

        self.expect_token(
            &Token::LParen(self.current_location()),
            "Expected '(' after 'main'",
        )?;
        self.skip_parameter_list()?;

        self.expect_token(
            &Token::LBrace(self.current_location()),
            "Expected '{' before main body",
        )?;
        let body = self.parse_block_statements()?;
        self.expect_token(
            &Token::RBrace(self.current_location()),
            "Expected '}' after main body",
        )?;

        if !self.is_at_end() {
            self.warnings
                .push("Code after the closing brace of 'main' is ignored".to_string());
        }

        Ok(Program { body })
    }

    /// Warnings accumulated so far, in source order
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Drain the accumulated warnings
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Scan forward for `<int-type-keyword> main`
    fn skip_to_main(&mut self) -> Result<(), ParseError> {
        loop {
            if self.is_at_end() {
                return Err(ParseError::Syntax {
                    message: "No 'main' function found".to_string(),
                    location: self.current_location(),
                });
            }
            if self.is_int_type_keyword()
                && matches!(self.peek_ahead(1), Some(Token::Ident(name, _)) if name == "main")
            {
                return Ok(());
            }
            self.advance();
        }
    }

    /// Consume a balanced parameter list; the opening `(` is already
    /// consumed and the contents are ignored (`void` or anything else)
    fn skip_parameter_list(&mut self) -> Result<(), ParseError> {
        let mut depth = 1usize;
        while depth > 0 {
            if self.is_at_end() {
                return Err(ParseError::Syntax {
                    message: "Unexpected end of input in parameter list of 'main'".to_string(),
                    location: self.current_location(),
                });
            }
            match self.peek() {
                Token::LParen(_) => depth += 1,
                Token::RParen(_) => depth -= 1,
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    // ===== Helper methods =====

    pub(crate) fn is_int_type_keyword(&self) -> bool {
        matches!(
            self.peek_token(),
            Token::Int(_) | Token::Long(_) | Token::Char(_)
        )
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if std::mem::discriminant(&self.peek_token()) == std::mem::discriminant(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(&self.peek_token()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_token(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::Syntax {
                message: format!("{}, found {}", message, self.peek()),
                location: self.current_location(),
            })
        }
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            &format!("Expected ';' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::Syntax {
                message: format!("Expected identifier, found {}", self.peek()),
                location: self.current_location(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::new(source)?.parse_program()
    }

    #[test]
    fn test_parse_simple_main() {
        let program = parse("int main(void) { return 0; }").unwrap();
        assert_eq!(program.body.len(), 1);
        assert!(matches!(program.body[0], Stmt::Return { .. }));
    }

    #[test]
    fn test_leading_tokens_before_main_skipped() {
        // Whatever survives '#'-stripping ahead of main is irrelevant.
        let program = parse("extern int puts(const char *s);\nint main() { return 0; }");
        // 'extern' is not a keyword, 'const' neither; both lex as
        // identifiers and the scan walks straight past them.
        assert!(program.is_ok());
    }

    #[test]
    fn test_long_main_accepted() {
        let program = parse("long main(void) { return 0; }").unwrap();
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_missing_main() {
        let err = parse("int x = 3;").unwrap_err();
        match err {
            ParseError::Syntax { message, .. } => assert!(message.contains("main")),
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_body() {
        let err = parse("int main(void) { int x = 1;").unwrap_err();
        match err {
            ParseError::Syntax { message, .. } => assert!(message.contains("'}'")),
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_code_warns() {
        let mut parser = Parser::new("int main(void) { return 0; } int x = 1;").unwrap();
        parser.parse_program().unwrap();
        assert_eq!(parser.warnings().len(), 1);
        assert!(parser.warnings()[0].contains("ignored"));
    }

    #[test]
    fn test_declaration_list_stays_one_statement() {
        let program = parse("int main(void) { int a = 1, b = 2; }").unwrap();
        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Stmt::Declaration { declarators, .. } => {
                assert_eq!(declarators.len(), 2);
                assert_eq!(declarators[0].name, "a");
                assert!(declarators[0].init.is_some());
                assert_eq!(declarators[1].name, "b");
            }
            other => panic!("Expected declaration list, got {:?}", other),
        }
    }

    #[test]
    fn test_increment_desugars_to_assignment() {
        let program = parse("int main(void) { int i = 0; i++; }").unwrap();
        match &program.body[1] {
            Stmt::Assignment {
                name,
                op: AssignOp::Assign,
                value: Expr::Binary { op: BinOp::Add, .. },
                ..
            } => assert_eq!(name, "i"),
            other => panic!("Expected desugared assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_operator_after_identifier() {
        let err = parse("int main(void) { int x = 1; x < 3; }").unwrap_err();
        assert!(matches!(err, ParseError::Unsupported { .. }));
    }

    #[test]
    fn test_break_is_a_syntax_error() {
        let err = parse("int main(void) { while (1) { break; } }").unwrap_err();
        match err {
            ParseError::Syntax { message, .. } => assert!(message.contains("break")),
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }
}
