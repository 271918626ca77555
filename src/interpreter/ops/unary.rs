//! Unary operator evaluation

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{ScopeId, Value};
use crate::parser::ast::{Expr, PostfixOp, PrefixOp, SourceLocation};

impl Interpreter {
    pub(crate) fn evaluate_prefix_op(
        &mut self,
        op: PrefixOp,
        operand: &Expr,
        scope: ScopeId,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            PrefixOp::Neg => {
                let value = self.evaluate(operand, scope)?;
                negate(value, location)
            }
            PrefixOp::Not => {
                let value = self.evaluate(operand, scope)?;
                Ok(Value::from(!value.is_truthy()))
            }
            PrefixOp::BitNot => match self.evaluate(operand, scope)? {
                Value::Int(n) | Value::Char(n) => Ok(Value::Int(!n)),
                other => Err(RuntimeError::TypeError {
                    expected: "integer operand for '~'".to_string(),
                    got: other.type_name().to_string(),
                    location,
                }),
            },
            PrefixOp::Inc | PrefixOp::Dec => {
                let delta = if op == PrefixOp::Inc { 1 } else { -1 };
                let (_, new) = self.increment(operand, delta, scope, location)?;
                Ok(new)
            }
            PrefixOp::Deref | PrefixOp::AddrOf => Err(RuntimeError::UnsupportedOperation {
                message: format!("pointer operator '{}'", op.symbol()),
                location,
            }),
        }
    }

    /// Postfix `++`/`--` yield the value from before the update
    pub(crate) fn evaluate_postfix_op(
        &mut self,
        op: PostfixOp,
        operand: &Expr,
        scope: ScopeId,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let delta = match op {
            PostfixOp::Inc => 1,
            PostfixOp::Dec => -1,
        };
        let (old, _) = self.increment(operand, delta, scope, location)?;
        Ok(old)
    }

    /// Add `delta` to a named variable and return `(old, new)`.
    ///
    /// Only a plain identifier is updated. Any other operand is evaluated and
    /// its value returned as both old and new, with nothing written.
    fn increment(
        &mut self,
        operand: &Expr,
        delta: i64,
        scope: ScopeId,
        location: SourceLocation,
    ) -> Result<(Value, Value), RuntimeError> {
        let old = self.evaluate(operand, scope)?;
        let Expr::Identifier(name, _) = operand else {
            return Ok((old.clone(), old));
        };

        let new = match &old {
            Value::Int(n) => Value::Int(n.wrapping_add(delta)),
            Value::Char(c) => Value::Char(c.wrapping_add(delta)),
            Value::Float(x) => Value::Float(x + delta as f64),
            Value::Str(_) => {
                return Err(RuntimeError::TypeError {
                    expected: "numeric operand for increment".to_string(),
                    got: old.type_name().to_string(),
                    location,
                })
            }
        };
        self.scopes.assign(scope, name, new.clone());
        Ok((old, new))
    }
}

fn negate(value: Value, location: SourceLocation) -> Result<Value, RuntimeError> {
    match value {
        Value::Int(n) | Value::Char(n) => Ok(Value::Int(n.wrapping_neg())),
        Value::Float(x) => Ok(Value::Float(-x)),
        Value::Str(_) => Err(RuntimeError::TypeError {
            expected: "numeric operand for '-'".to_string(),
            got: value.type_name().to_string(),
            location,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::{Interpreter, RuntimeError};
    use crate::memory::Value;

    fn run(source: &str) -> Result<Value, RuntimeError> {
        Interpreter::from_source(source).expect("parse failed").run()
    }

    #[test]
    fn test_prefix_and_postfix_increment() {
        let source = "
            int main() {
                int i = 5;
                int a = i++;
                int b = ++i;
                int c = i--;
                return a * 10000 + b * 100 + c * 1 + i * 0;
            }
        ";
        assert_eq!(run(source), Ok(Value::Int(5 * 10000 + 7 * 100 + 7)));
    }

    #[test]
    fn test_increment_keeps_kind() {
        assert_eq!(
            run("int main() { float f = 1.5; f++; return f; }"),
            Ok(Value::Float(2.5))
        );
        assert_eq!(
            run("int main() { char c = 'a'; ++c; return c; }"),
            Ok(Value::Char(98))
        );
    }

    #[test]
    fn test_increment_of_non_identifier_does_not_mutate() {
        let source = "int main() { int x = 3; int y = (x + 1)++; return x * 10 + y; }";
        assert_eq!(run(source), Ok(Value::Int(34)));
    }

    #[test]
    fn test_negation_not_and_bitnot() {
        assert_eq!(run("int main() { return -(2 + 3); }"), Ok(Value::Int(-5)));
        assert_eq!(run("int main() { return !0 + !7; }"), Ok(Value::Int(1)));
        assert_eq!(run("int main() { return ~5; }"), Ok(Value::Int(-6)));
        assert!(matches!(
            run("int main() { return ~1.5; }"),
            Err(RuntimeError::TypeError { .. })
        ));
        assert!(matches!(
            run(r#"int main() { return -"s"; }"#),
            Err(RuntimeError::TypeError { .. })
        ));
    }

    #[test]
    fn test_pointer_operators_are_unsupported() {
        assert!(matches!(
            run("int main() { int x = 1; return *x; }"),
            Err(RuntimeError::UnsupportedOperation { .. })
        ));
        assert!(matches!(
            run("int main() { int x = 1; int y = &x; return 0; }"),
            Err(RuntimeError::UnsupportedOperation { .. })
        ));
    }
}
