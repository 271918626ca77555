//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including diagnostics, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, error recovery
//! - `declarations`: type specifiers, function and variable declarations
//! - `statements`: parsing statements (if, while, for, etc.)
//! - `expressions`: Pratt-style precedence climbing
//!
//! # Error handling
//!
//! Parsing never stops at the first problem. A failed statement records a
//! [`Diagnostic`], the parser skips ahead to a synchronization point, and
//! parsing resumes. [`Parser::parse_program`] fails with a [`ParseError`]
//! carrying every diagnostic if any were recorded. Expressions and statements
//! nested deeper than [`MAX_NESTING_DEPTH`] are reported the same way.

use crate::interpreter::constants::{STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::parser::ast::*;
use crate::parser::lexer::{Lexer, Token, TokenKind};
use log::{debug, info};
use std::fmt;
use thiserror::Error;

/// One structural problem found while parsing
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Token kind the parser was looking for, if a specific one
    pub expected: Option<TokenKind>,
    pub found_kind: TokenKind,
    pub found_literal: String,
    pub location: SourceLocation,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

/// Every diagnostic from a failed parse
#[derive(Debug, Clone, Error)]
#[error("{} parse error(s):\n{}", .diagnostics.len(), render(.diagnostics))]
pub struct ParseError {
    pub diagnostics: Vec<Diagnostic>,
}

fn render(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("  {}", d))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Deepest nesting of expressions and statements the parser accepts
pub const MAX_NESTING_DEPTH: usize = 256;

/// Result of a single production. `Err` aborts the production; the caller
/// records the diagnostic and resynchronizes.
pub(crate) type PResult<T> = Result<T, Diagnostic>;

/// Recursive descent parser for C subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// Current expression and statement nesting
    depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let mut tokens = Vec::new();
        let mut diagnostics = Vec::new();

        for token in Lexer::new(source) {
            if token.kind == TokenKind::Illegal {
                diagnostics.push(Diagnostic {
                    expected: None,
                    found_kind: token.kind,
                    message: format!("unexpected character '{}'", token.literal),
                    found_literal: token.literal,
                    location: token.location,
                });
            } else {
                tokens.push(token);
            }
        }

        debug!("tokenized {} tokens", tokens.len());
        Self {
            tokens,
            position: 0,
            diagnostics,
            depth: 0,
        }
    }

    /// Parse the entire program (top-level declarations)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            if self.check(TokenKind::Semicolon) {
                self.advance();
                continue;
            }
            if !self.peek().kind.is_type_keyword() {
                self.skip_top_level_garbage();
                continue;
            }

            let start = self.position;
            match self.parse_declaration() {
                Ok(decls) => program.declarations.extend(decls),
                Err(diagnostic) => {
                    self.diagnostics.push(diagnostic);
                    self.synchronize(start);
                }
            }
        }

        if self.diagnostics.is_empty() {
            info!(
                "parsed program with {} top-level declarations",
                program.declarations.len()
            );
            Ok(program)
        } else {
            Err(ParseError {
                diagnostics: std::mem::take(&mut self.diagnostics),
            })
        }
    }

    /// Diagnostics recorded so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Only declarations may appear at the top level. A run of anything
    /// else is reported once and skipped up to the next type keyword.
    fn skip_top_level_garbage(&mut self) {
        let diagnostic = self.error_here(None, "expected a declaration");
        self.diagnostics.push(diagnostic);
        while !self.is_at_end() && !self.peek().kind.is_type_keyword() {
            self.advance();
        }
    }

    /// Skip tokens after a failed production.
    ///
    /// Stops just past the next `;`, or before the next `}` or statement
    /// keyword. Always consumes at least one token when nothing was consumed
    /// since `start`.
    pub(crate) fn synchronize(&mut self, start: usize) {
        while !self.is_at_end() {
            let kind = self.peek().kind;
            if kind == TokenKind::Semicolon {
                self.advance();
                return;
            }
            if self.position > start
                && (kind == TokenKind::RBrace || kind.is_statement_keyword())
            {
                return;
            }
            self.advance();
        }
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
            || self.tokens[self.position].kind == TokenKind::Eof
    }

    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.position.min(last)]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    /// Run a recursive production one nesting level deeper, failing once
    /// the nesting limit is reached.
    pub(crate) fn nested<T>(
        &mut self,
        what: &str,
        production: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error_here(None, &format!("{} nested too deeply", what)));
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || production(self));
        self.depth -= 1;
        result
    }

    /// Build a diagnostic against the current token.
    pub(crate) fn error_here(
        &self,
        expected: Option<TokenKind>,
        message: &str,
    ) -> Diagnostic {
        let found = self.peek();
        Diagnostic {
            expected,
            found_kind: found.kind,
            found_literal: found.literal.clone(),
            location: found.location,
            message: format!("{}, found {}", message, found),
        }
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: TokenKind,
        message: &str,
    ) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(self.error_here(Some(kind), message))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> PResult<()> {
        self.expect_token(TokenKind::LParen, &format!("expected '(' {ctx}"))
            .map(|_| ())
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> PResult<()> {
        self.expect_token(TokenKind::RParen, &format!("expected ')' {ctx}"))
            .map(|_| ())
    }

    pub(crate) fn expect_rbracket(&mut self, ctx: &str) -> PResult<()> {
        self.expect_token(TokenKind::RBracket, &format!("expected ']' {ctx}"))
            .map(|_| ())
    }

    /// A missing `;` is recorded but does not abort the statement.
    pub(crate) fn expect_semicolon(&mut self, ctx: &str) {
        if !self.match_token(TokenKind::Semicolon) {
            let diagnostic = self.error_here(
                Some(TokenKind::Semicolon),
                &format!("expected ';' {ctx}"),
            );
            self.diagnostics.push(diagnostic);
        }
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> PResult<String> {
        self.expect_token(
            TokenKind::Ident,
            &format!("expected identifier {ctx}"),
        )
        .map(|token| token.literal)
    }
}

/// Parse source text into a [`Program`].
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::new(source).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_function() {
        let source = "int main() { return 0; }";
        let program = parse(source).unwrap();

        assert_eq!(program.declarations.len(), 1);
        match &program.declarations[0] {
            Stmt::Function(FunctionDecl {
                name,
                params,
                return_type,
                body,
                ..
            }) => {
                assert_eq!(name, "main");
                assert_eq!(params.len(), 0);
                assert_eq!(return_type, "int");
                assert_eq!(body.as_ref().map(|b| b.statements.len()), Some(1));
            }
            _ => panic!("Expected function definition"),
        }
    }

    #[test]
    fn test_missing_paren_is_reported() {
        let source = "int main() { int x = 2; if (x > 1 { x = 0; } return x; }";
        let err = parse(source).unwrap_err();

        let first = &err.diagnostics[0];
        assert_eq!(first.expected, Some(TokenKind::RParen));
        assert_eq!(first.found_kind, TokenKind::LBrace);
        assert_eq!(first.location.line, 1);
    }

    #[test]
    fn test_illegal_character_is_reported() {
        let err = parse("int main() { int x = 1 @ 2; }").unwrap_err();
        assert!(err
            .diagnostics
            .iter()
            .any(|d| d.found_kind == TokenKind::Illegal && d.found_literal == "@"));
    }

    #[test]
    fn test_multiple_errors_accumulate() {
        let source = "int main() {\n  int = 1;\n  return ;;\n  int y = ;\n}";
        let err = parse(source).unwrap_err();

        let lines: Vec<usize> =
            err.diagnostics.iter().map(|d| d.location.line).collect();
        assert!(lines.contains(&2));
        assert!(lines.contains(&4));
    }

    #[test]
    fn test_error_display_lists_every_line() {
        let err = parse("int main() {\n  int = 1;\n  int y = ;\n}").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("line 2"));
        assert!(text.contains("line 3"));
    }

    #[test]
    fn test_deeply_nested_expression_is_a_diagnostic() {
        let depth = 20_000;
        let source = format!(
            "int main() {{\n  return {}1{};\n}}",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        let err = parse(&source).unwrap_err();

        assert_eq!(err.diagnostics.len(), 1);
        assert!(err.diagnostics[0].message.contains("expression nested too deeply"));
        assert_eq!(err.diagnostics[0].location.line, 2);
    }

    #[test]
    fn test_deeply_nested_blocks_are_a_diagnostic() {
        let depth = 20_000;
        let source = format!("int main() {{ {}{} }}", "{".repeat(depth), "}".repeat(depth));
        let err = parse(&source).unwrap_err();

        assert!(err
            .diagnostics
            .iter()
            .any(|d| d.message.contains("statement nested too deeply")));
    }

    #[test]
    fn test_nesting_below_the_limit_parses() {
        let depth = MAX_NESTING_DEPTH - 8;
        let source = format!(
            "int main() {{ return {}1{}; }}",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        assert!(parse(&source).is_ok());
    }

    #[test]
    fn test_top_level_statement_is_rejected() {
        let err = parse("x = 1; int main() { return 0; }").unwrap_err();
        assert_eq!(err.diagnostics.len(), 1);
        assert!(err.diagnostics[0].message.contains("expected a declaration"));
    }
}
