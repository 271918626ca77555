//! Expression evaluation implementation
//!
//! This module dispatches over every C expression type:
//!
//! - Literals (integers, floats, characters, strings)
//! - Variables and identifiers
//! - Operators (delegated to [`super::ops`])
//! - Function calls (including built-ins)
//! - Ternary conditionals and casts
//!
//! Indexing, dereference and address-of parse but have no runtime model; they
//! evaluate to [`RuntimeError::UnsupportedOperation`].

use crate::interpreter::constants::{STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{ScopeId, Value};
use crate::parser::ast::Expr;
use crate::parser::lexer::unescape;

impl Interpreter {
    /// Evaluate an expression in `scope` and return its value.
    ///
    /// Built-ins use this to evaluate the argument expressions they receive.
    pub fn evaluate(&mut self, expr: &Expr, scope: ScopeId) -> Result<Value, RuntimeError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.evaluate_expr(expr, scope)
        })
    }

    fn evaluate_expr(&mut self, expr: &Expr, scope: ScopeId) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Identifier(name, location) => {
                self.scopes.get(scope, name).cloned().ok_or_else(|| {
                    RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        location: *location,
                    }
                })
            }

            Expr::IntLiteral(n, _) => Ok(Value::Int(*n)),

            Expr::FloatLiteral(x, _) => Ok(Value::Float(*x)),

            Expr::StringLiteral(raw, _) => Ok(Value::Str(unescape(raw))),

            Expr::CharLiteral(c, _) => Ok(Value::Char(i64::from(*c))),

            Expr::Prefix {
                op,
                operand,
                location,
            } => self.evaluate_prefix_op(*op, operand, scope, *location),

            Expr::Postfix {
                op,
                operand,
                location,
            } => self.evaluate_postfix_op(*op, operand, scope, *location),

            Expr::Binary {
                op,
                left,
                right,
                location,
            } => self.evaluate_binary_op(*op, left, right, scope, *location),

            Expr::Assign {
                target,
                op,
                value,
                location,
            } => self.evaluate_assignment(target, *op, value, scope, *location),

            Expr::Call {
                callee,
                args,
                location,
            } => self.call_function(callee, args, scope, *location),

            Expr::Index { location, .. } => Err(RuntimeError::UnsupportedOperation {
                message: "array indexing".to_string(),
                location: *location,
            }),

            Expr::Ternary {
                condition,
                consequence,
                alternative,
                ..
            } => {
                if self.evaluate(condition, scope)?.is_truthy() {
                    self.evaluate(consequence, scope)
                } else {
                    self.evaluate(alternative, scope)
                }
            }

            Expr::Cast {
                target_type, expr, ..
            } => Ok(self.evaluate(expr, scope)?.convert_to(target_type)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::{Interpreter, RuntimeError};
    use crate::memory::Value;
    use crate::parser::ast::SourceLocation;

    fn run(source: &str) -> Result<Value, RuntimeError> {
        Interpreter::from_source(source).expect("parse failed").run()
    }

    #[test]
    fn test_literals() {
        assert_eq!(run("int main() { return 'A'; }"), Ok(Value::Char(65)));
        assert_eq!(run("int main() { return 2.5; }"), Ok(Value::Float(2.5)));
        assert_eq!(
            run(r#"int main() { char *s = "a\tb"; return s; }"#),
            Ok(Value::Str("a\tb".to_string()))
        );
    }

    #[test]
    fn test_undefined_variable() {
        assert_eq!(
            run("int main() {\n  return y;\n}"),
            Err(RuntimeError::UndefinedVariable {
                name: "y".to_string(),
                location: SourceLocation::new(2, 10),
            })
        );
    }

    #[test]
    fn test_ternary_evaluates_one_branch() {
        let source = "
            int main() {
                int hits = 0;
                int r = 1 ? 7 : hits++;
                return r * 10 + hits;
            }
        ";
        assert_eq!(run(source), Ok(Value::Int(70)));
    }

    #[test]
    fn test_casts() {
        assert_eq!(run("int main() { return (int) 3.99; }"), Ok(Value::Int(3)));
        assert_eq!(run("int main() { return (float) 7 / 2; }"), Ok(Value::Float(3.5)));
        assert_eq!(run("int main() { return (char) 66; }"), Ok(Value::Char(66)));
    }

    #[test]
    fn test_index_is_unsupported() {
        let result = run("int main() { int a[3]; return a[1]; }");
        assert!(matches!(
            result,
            Err(RuntimeError::UnsupportedOperation { .. })
        ));
    }
}
