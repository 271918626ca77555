//! Assignment evaluation (`=` and the compound forms)

use super::binary::apply_binary_op;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{ScopeId, Value};
use crate::parser::ast::{AssignOp, Expr, SourceLocation};

impl Interpreter {
    /// Evaluate an assignment and return the stored value.
    ///
    /// The right-hand side is evaluated first. Plain `=` stores the value as
    /// is, binding it in the current scope if the name is not yet defined.
    /// Compound forms require an existing binding and keep its numeric kind.
    pub(crate) fn evaluate_assignment(
        &mut self,
        target: &Expr,
        op: AssignOp,
        value: &Expr,
        scope: ScopeId,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let rhs = self.evaluate(value, scope)?;

        let Expr::Identifier(name, name_location) = target else {
            return Err(RuntimeError::InvalidAssignmentTarget {
                target: target.to_string(),
                location,
            });
        };

        let new_value = match op.binary_op() {
            None => rhs,
            Some(bin_op) => {
                let current = self.scopes.get(scope, name).cloned().ok_or_else(|| {
                    RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        location: *name_location,
                    }
                })?;
                let combined = apply_binary_op(bin_op, &current, &rhs, location)?;
                keep_kind(&current, combined)
            }
        };

        self.scopes.assign(scope, name, new_value.clone());
        Ok(new_value)
    }
}

/// Convert a compound-assignment result back to the target's kind
fn keep_kind(current: &Value, result: Value) -> Value {
    match current {
        Value::Int(_) => Value::Int(result.as_int().unwrap_or(0)),
        Value::Char(_) => Value::Char(result.as_int().unwrap_or(0)),
        Value::Float(_) => Value::Float(result.as_float().unwrap_or(0.0)),
        Value::Str(_) => result,
    }
}
