//! Statement parsing implementation
//!
//! This module handles parsing of all C statement types:
//!
//! - Variable declarations: `int x = 42;`
//! - Control flow: `if`/`else`, `while`, `for`
//! - Jump statements: `return`, `break`, `continue`
//! - Compound statements: `{ ... }`
//! - Expression statements: function calls, assignments
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | if_stmt | while_stmt | for_stmt
//!             | return_stmt | break_stmt | continue_stmt
//!             | block | expr_stmt | ";"
//! body      ::= block | statement
//! ```
//!
//! Loop and branch bodies that are a single statement are wrapped in a
//! one-statement [`Block`], so the evaluator only ever sees blocks there.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{PResult, Parser};

impl Parser {
    /// Parse a braced block. Failed statements inside are recorded and
    /// skipped so the rest of the block still parses.
    pub(crate) fn parse_block(&mut self) -> PResult<Block> {
        let loc = self.current_location();
        self.expect_token(TokenKind::LBrace, "expected '{'")?;

        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let start = self.position;
            match self.parse_statement() {
                Ok(parsed) => statements.extend(parsed),
                Err(diagnostic) => {
                    self.diagnostics.push(diagnostic);
                    self.synchronize(start);
                }
            }
        }

        self.expect_token(TokenKind::RBrace, "expected '}' to close block")?;
        Ok(Block::new(statements, loc))
    }

    /// Braced block, or a single statement wrapped in one
    fn parse_body(&mut self) -> PResult<Block> {
        if self.check(TokenKind::LBrace) {
            return self.parse_block();
        }
        let loc = self.current_location();
        let statements = self.parse_statement()?;
        Ok(Block::new(statements, loc))
    }

    /// Parse a statement. Declarations with several declarators yield
    /// several statements, an empty `;` yields none.
    pub(crate) fn parse_statement(&mut self) -> PResult<Vec<Stmt>> {
        self.nested("statement", Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> PResult<Vec<Stmt>> {
        let loc = self.current_location();
        let kind = self.peek().kind;

        if kind.is_type_keyword() {
            return self.parse_local_declaration();
        }

        let stmt = match kind {
            TokenKind::Semicolon => {
                self.advance();
                return Ok(Vec::new());
            }
            TokenKind::LBrace => Stmt::Block(self.parse_block()?),
            TokenKind::If => self.parse_if_statement()?,
            TokenKind::While => self.parse_while_statement()?,
            TokenKind::For => self.parse_for_statement()?,
            TokenKind::Return => self.parse_return_statement()?,
            TokenKind::Break => {
                self.advance();
                self.expect_semicolon("after 'break'");
                Stmt::Break { location: loc }
            }
            TokenKind::Continue => {
                self.advance();
                self.expect_semicolon("after 'continue'");
                Stmt::Continue { location: loc }
            }
            TokenKind::Else => {
                return Err(self.error_here(None, "'else' without a matching 'if'"));
            }
            TokenKind::Do
            | TokenKind::Switch
            | TokenKind::Case
            | TokenKind::Default
            | TokenKind::Goto
            | TokenKind::Struct
            | TokenKind::Union
            | TokenKind::Enum
            | TokenKind::Typedef
            | TokenKind::Sizeof
            | TokenKind::Auto
            | TokenKind::Extern
            | TokenKind::Register
            | TokenKind::Static
            | TokenKind::Volatile => {
                return Err(self.error_here(None, "unsupported keyword"));
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect_semicolon("after expression");
                Stmt::Expression {
                    expr,
                    location: loc,
                }
            }
        };

        Ok(vec![stmt])
    }

    /// Parse return statement
    fn parse_return_statement(&mut self) -> PResult<Stmt> {
        let loc = self.current_location();
        self.advance(); // 'return'

        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_semicolon("after return");
        Ok(Stmt::Return {
            value,
            location: loc,
        })
    }

    /// Parse if statement (`else if` chains nest through the alternative)
    fn parse_if_statement(&mut self) -> PResult<Stmt> {
        let loc = self.current_location();
        self.advance(); // 'if'

        self.expect_lparen("after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let consequence = self.parse_body()?;
        let alternative = if self.match_token(TokenKind::Else) {
            Some(self.parse_body()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            consequence,
            alternative,
            location: loc,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> PResult<Stmt> {
        let loc = self.current_location();
        self.advance(); // 'while'

        self.expect_lparen("after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after while condition")?;
        let body = self.parse_body()?;

        Ok(Stmt::While {
            condition,
            body,
            location: loc,
        })
    }

    /// Parse for statement: for (init; condition; post) body
    fn parse_for_statement(&mut self) -> PResult<Stmt> {
        let loc = self.current_location();
        self.advance(); // 'for'

        self.expect_lparen("after 'for'")?;

        // Init: declaration, expression, or empty
        let init = if self.match_token(TokenKind::Semicolon) {
            None
        } else if self.peek().kind.is_type_keyword() {
            let mut decls = self.parse_local_declaration()?;
            if decls.len() != 1 {
                return Err(self.error_here(
                    None,
                    "for-loop initializer declares more than one variable",
                ));
            }
            decls.pop().map(Box::new)
        } else {
            let init_loc = self.current_location();
            let expr = self.parse_expression()?;
            self.expect_token(
                TokenKind::Semicolon,
                "expected ';' after for initializer",
            )?;
            Some(Box::new(Stmt::Expression {
                expr,
                location: init_loc,
            }))
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_token(
            TokenKind::Semicolon,
            "expected ';' after for condition",
        )?;

        let post = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_rparen("after for clauses")?;

        let body = self.parse_body()?;

        Ok(Stmt::For {
            init,
            condition,
            post,
            body,
            location: loc,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse;

    fn main_body(source: &str) -> Vec<Stmt> {
        let program = parse(source).unwrap();
        let (_, main) = program
            .functions()
            .find(|(_, f)| f.name == "main")
            .unwrap();
        main.body.clone().unwrap().statements
    }

    #[test]
    fn test_if_statement_single_statement_branches() {
        let body = main_body("int main() { if (x > 0) return 1; else return 0; }");

        match &body[0] {
            Stmt::If {
                consequence,
                alternative: Some(alternative),
                ..
            } => {
                assert_eq!(consequence.statements.len(), 1);
                assert!(matches!(alternative.statements[0], Stmt::Return { .. }));
            }
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_else_if_chain() {
        let body = main_body(
            "int main() { if (x == 1) { y = 1; } else if (x == 2) { y = 2; } else { y = 3; } }",
        );

        let Stmt::If {
            alternative: Some(alternative),
            ..
        } = &body[0]
        else {
            panic!("Expected if statement");
        };
        match &alternative.statements[0] {
            Stmt::If {
                alternative: Some(last),
                ..
            } => assert_eq!(last.statements.len(), 1),
            other => panic!("Expected nested if, got {:?}", other),
        }
    }

    #[test]
    fn test_for_statement_parts() {
        let body = main_body("int main() { for (int i = 0; i < 5; i++) { sum += i; } }");

        match &body[0] {
            Stmt::For {
                init: Some(init),
                condition: Some(_),
                post: Some(_),
                body,
                ..
            } => {
                assert!(matches!(**init, Stmt::VarDecl { .. }));
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("Expected for statement, got {:?}", other),
        }
    }

    #[test]
    fn test_for_with_empty_clauses() {
        let body = main_body("int main() { for (;;) break; }");

        assert!(matches!(
            &body[0],
            Stmt::For {
                init: None,
                condition: None,
                post: None,
                ..
            }
        ));
    }

    #[test]
    fn test_nested_block_and_empty_statement() {
        let body = main_body("int main() { ; { int x = 1; } return 0; }");

        assert_eq!(body.len(), 2);
        assert!(matches!(&body[0], Stmt::Block(b) if b.statements.len() == 1));
    }

    #[test]
    fn test_unsupported_keyword_is_diagnosed() {
        assert!(parse("int main() { do { x = 1; } while (x); return 0; }").is_err());
    }
}
