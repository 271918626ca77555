//! Expression parsing implementation
//!
//! Expressions are parsed with Pratt-style precedence climbing over a fixed
//! table, lowest to highest:
//!
//! ```text
//! assignment < ternary < || < && < | < ^ < & < == != < < <= > >=
//!   < << >> < + - < * / % < prefix < postfix ++ -- < call < index
//! ```
//!
//! Binary operators parse their right operand at their own level, which makes
//! them left-associative. Assignment and the ternary alternative parse one
//! level lower, which makes them right-associative. Calls, indexing and
//! postfix `++`/`--` are infix entries in the same loop, so chains like
//! `f(x)[i]++` compose without separate grammar rules.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{char_literal_value, TokenKind};
use crate::parser::parse::{PResult, Parser};

/// Binding power of an operator, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
    Lowest,
    Assign,
    Conditional,
    LogOr,
    LogAnd,
    BitOr,
    BitXor,
    BitAnd,
    Equals,
    LessGreater,
    Shift,
    Sum,
    Product,
    Prefix,
    Postfix,
    Call,
    Index,
}

impl Precedence {
    /// Binding power of `kind` in infix or postfix position.
    fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Eq
            | TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq
            | TokenKind::AmpEq
            | TokenKind::PipeEq
            | TokenKind::CaretEq
            | TokenKind::LtLtEq
            | TokenKind::GtGtEq => Precedence::Assign,
            TokenKind::Question => Precedence::Conditional,
            TokenKind::OrOr => Precedence::LogOr,
            TokenKind::AndAnd => Precedence::LogAnd,
            TokenKind::Pipe => Precedence::BitOr,
            TokenKind::Caret => Precedence::BitXor,
            TokenKind::Amp => Precedence::BitAnd,
            TokenKind::EqEq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => {
                Precedence::LessGreater
            }
            TokenKind::LtLt | TokenKind::GtGt => Precedence::Shift,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => {
                Precedence::Product
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => Precedence::Postfix,
            TokenKind::LParen => Precedence::Call,
            TokenKind::LBracket => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

fn binary_op(kind: TokenKind) -> Option<BinOp> {
    let op = match kind {
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::Percent => BinOp::Mod,
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::NotEq => BinOp::Ne,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::Le => BinOp::Le,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::Ge => BinOp::Ge,
        TokenKind::AndAnd => BinOp::And,
        TokenKind::OrOr => BinOp::Or,
        TokenKind::Amp => BinOp::BitAnd,
        TokenKind::Pipe => BinOp::BitOr,
        TokenKind::Caret => BinOp::BitXor,
        TokenKind::LtLt => BinOp::Shl,
        TokenKind::GtGt => BinOp::Shr,
        _ => return None,
    };
    Some(op)
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Mod,
        TokenKind::AmpEq => AssignOp::BitAnd,
        TokenKind::PipeEq => AssignOp::BitOr,
        TokenKind::CaretEq => AssignOp::BitXor,
        TokenKind::LtLtEq => AssignOp::Shl,
        TokenKind::GtGtEq => AssignOp::Shr,
        _ => return None,
    };
    Some(op)
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> PResult<Expr> {
        self.parse_precedence(Precedence::Lowest)
    }

    /// Parse while the next operator binds tighter than `min`
    pub(crate) fn parse_precedence(&mut self, min: Precedence) -> PResult<Expr> {
        self.nested("expression", |parser| {
            let mut left = parser.parse_prefix()?;

            while min < Precedence::of(parser.peek().kind) {
                left = parser.parse_infix(left)?;
            }

            Ok(left)
        })
    }

    /// Literals, identifiers, prefix operators, grouping and casts
    fn parse_prefix(&mut self) -> PResult<Expr> {
        let loc = self.current_location();
        let kind = self.peek().kind;

        let prefix_op = match kind {
            TokenKind::Minus => Some(PrefixOp::Neg),
            TokenKind::Bang => Some(PrefixOp::Not),
            TokenKind::Tilde => Some(PrefixOp::BitNot),
            TokenKind::PlusPlus => Some(PrefixOp::Inc),
            TokenKind::MinusMinus => Some(PrefixOp::Dec),
            TokenKind::Star => Some(PrefixOp::Deref),
            TokenKind::Amp => Some(PrefixOp::AddrOf),
            _ => None,
        };
        if let Some(op) = prefix_op {
            self.advance();
            let operand = self.parse_precedence(Precedence::Prefix)?;
            return Ok(Expr::Prefix {
                op,
                operand: Box::new(operand),
                location: loc,
            });
        }

        match kind {
            TokenKind::Plus => {
                // Unary plus is a no-op
                self.advance();
                self.parse_precedence(Precedence::Prefix)
            }
            TokenKind::Ident => {
                let name = self.advance().literal.clone();
                Ok(Expr::Identifier(name, loc))
            }
            TokenKind::IntLiteral => self.parse_int_literal(),
            TokenKind::FloatLiteral => {
                let text = self.peek().literal.clone();
                let value = text.parse::<f64>().map_err(|_| {
                    self.error_here(None, "invalid floating-point literal")
                })?;
                self.advance();
                Ok(Expr::FloatLiteral(value, loc))
            }
            TokenKind::StringLiteral => {
                let text = self.advance().literal.clone();
                Ok(Expr::StringLiteral(text, loc))
            }
            TokenKind::CharLiteral => {
                let value = char_literal_value(&self.advance().literal);
                Ok(Expr::CharLiteral(value, loc))
            }
            TokenKind::LParen => {
                let is_cast = self
                    .peek_ahead(1)
                    .is_some_and(|t| t.kind.is_type_keyword());
                self.advance();

                if is_cast {
                    let target_type = self.parse_type()?;
                    self.expect_rparen("after cast type")?;
                    let expr = self.parse_precedence(Precedence::Prefix)?;
                    return Ok(Expr::Cast {
                        target_type,
                        expr: Box::new(expr),
                        location: loc,
                    });
                }

                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                Ok(expr)
            }
            _ => Err(self.error_here(None, "expected expression")),
        }
    }

    fn parse_int_literal(&mut self) -> PResult<Expr> {
        let loc = self.current_location();
        let text = self.peek().literal.clone();

        // Literals above i64::MAX wrap, as an unsigned constant would
        let value = match text.parse::<i64>() {
            Ok(v) => v,
            Err(_) => text
                .parse::<u64>()
                .map(|v| v as i64)
                .map_err(|_| self.error_here(None, "integer literal out of range"))?,
        };

        self.advance();
        Ok(Expr::IntLiteral(value, loc))
    }

    /// Binary, assignment, ternary and postfix forms with `left` already parsed
    fn parse_infix(&mut self, left: Expr) -> PResult<Expr> {
        let kind = self.peek().kind;
        let loc = self.current_location();
        let precedence = Precedence::of(kind);

        if let Some(op) = binary_op(kind) {
            self.advance();
            let right = self.parse_precedence(precedence)?;
            return Ok(Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            });
        }

        if let Some(op) = assign_op(kind) {
            self.advance();
            let value = self.parse_precedence(Precedence::Lowest)?;
            return Ok(Expr::Assign {
                target: Box::new(left),
                op,
                value: Box::new(value),
                location: loc,
            });
        }

        match kind {
            TokenKind::Question => {
                self.advance();
                let consequence = self.parse_precedence(Precedence::Lowest)?;
                self.expect_token(
                    TokenKind::Colon,
                    "expected ':' in conditional expression",
                )?;
                let alternative = self.parse_precedence(Precedence::Assign)?;
                Ok(Expr::Ternary {
                    condition: Box::new(left),
                    consequence: Box::new(consequence),
                    alternative: Box::new(alternative),
                    location: loc,
                })
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                self.advance();
                let op = if kind == TokenKind::PlusPlus {
                    PostfixOp::Inc
                } else {
                    PostfixOp::Dec
                };
                Ok(Expr::Postfix {
                    op,
                    operand: Box::new(left),
                    location: loc,
                })
            }
            TokenKind::LParen => self.parse_call(left),
            TokenKind::LBracket => {
                self.advance();
                let index = self.parse_expression()?;
                self.expect_rbracket("after index")?;
                Ok(Expr::Index {
                    base: Box::new(left),
                    index: Box::new(index),
                    location: loc,
                })
            }
            _ => Err(self.error_here(None, "unexpected token in expression")),
        }
    }

    /// Parse call arguments: callee(arg, arg, ...)
    fn parse_call(&mut self, callee: Expr) -> PResult<Expr> {
        let (name, loc) = match callee {
            Expr::Identifier(name, loc) => (name, loc),
            _ => {
                return Err(self.error_here(
                    None,
                    "only named functions can be called",
                ))
            }
        };
        self.advance(); // '('

        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect_rparen("after arguments")?;

        Ok(Expr::Call {
            callee: name,
            args,
            location: loc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn expr(source: &str) -> String {
        let mut parser = Parser::new(source);
        let expr = parser.parse_expression().expect("expression parses");
        expr.to_string()
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        assert_eq!(expr("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(expr("1 * 2 + 3"), "((1 * 2) + 3)");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(expr("1 - 2 - 3"), "((1 - 2) - 3)");
        assert_eq!(expr("a / b % c"), "((a / b) % c)");
        assert_eq!(expr("a << 1 << 2"), "((a << 1) << 2)");
    }

    #[test]
    fn test_precedence_ladder() {
        assert_eq!(expr("a || b && c"), "(a || (b && c))");
        assert_eq!(expr("a && b | c"), "(a && (b | c))");
        assert_eq!(expr("a | b ^ c"), "(a | (b ^ c))");
        assert_eq!(expr("a ^ b & c"), "(a ^ (b & c))");
        assert_eq!(expr("a & b == c"), "(a & (b == c))");
        assert_eq!(expr("a == b < c"), "(a == (b < c))");
        assert_eq!(expr("a < b << c"), "(a < (b << c))");
        assert_eq!(expr("a << b + c"), "(a << (b + c))");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(expr("a = b = 3"), "(a = (b = 3))");
        assert_eq!(expr("x += y -= 2"), "(x += (y -= 2))");
        assert_eq!(expr("a = b + 1"), "(a = (b + 1))");
    }

    #[test]
    fn test_ternary_is_right_associative() {
        assert_eq!(expr("a ? b : c ? d : e"), "(a ? b : (c ? d : e))");
        assert_eq!(expr("x = a > b ? a : b"), "(x = ((a > b) ? a : b))");
    }

    #[test]
    fn test_ternary_requires_colon() {
        let mut parser = Parser::new("a ? b c");
        let err = parser.parse_expression().unwrap_err();
        assert_eq!(err.expected, Some(TokenKind::Colon));
    }

    #[test]
    fn test_prefix_and_postfix() {
        assert_eq!(expr("-a * b"), "((-a) * b)");
        assert_eq!(expr("!a && ~b"), "((!a) && (~b))");
        assert_eq!(expr("i++ + ++j"), "((i++) + (++j))");
        assert_eq!(expr("-x++"), "(-(x++))");
        assert_eq!(expr("*p"), "(*p)");
    }

    #[test]
    fn test_call_and_index_postfixes() {
        assert_eq!(expr("f(1, g(2) + 3)"), "f(1, (g(2) + 3))");
        assert_eq!(expr("a[i + 1] * 2"), "(a[(i + 1)] * 2)");
        assert_eq!(expr("arr[i]++"), "(arr[i]++)");
    }

    #[test]
    fn test_grouping_and_cast() {
        assert_eq!(expr("(1 + 2) * 3"), "((1 + 2) * 3)");
        assert_eq!(expr("(float) a / 2"), "(((float) a) / 2)");
    }

    #[test]
    fn test_call_location_points_at_name() {
        let mut parser = Parser::new("  foo(1)");
        let expr = parser.parse_expression().unwrap();
        assert_eq!(expr.location(), SourceLocation::new(1, 3));
    }

    #[test]
    fn test_literals() {
        assert_eq!(expr("'a'"), "'a'");
        assert_eq!(expr("2.5"), "2.5");
        assert_eq!(expr("\"hi\""), "\"hi\"");
    }
}
